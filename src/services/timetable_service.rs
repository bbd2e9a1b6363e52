use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;
use tracing::debug;

use crate::clock::Clock;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    AdminSlotView, Lab, SlotStatus, SlotView, WeekendConfigResponse, WeekendDayConfig,
    WeekendGlobalResponse, WeekendOverrideSummary,
};
use crate::services::weekend::LabRules;
use crate::week::{Day, date_for, week_dates};

pub struct TimetableService {
    db: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl TimetableService {
    pub fn new(db: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// The upcoming week of one lab. Past bookings are purged first.
    pub async fn lab_week(&self, lab_id: i64) -> Result<Vec<SlotView>, AppError> {
        let today = self.clock.today();
        let purged = repository::delete_bookings_before(&self.db, today).await?;
        if purged > 0 {
            debug!("Released {} past bookings", purged);
        }

        repository::find_lab(&self.db, lab_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lab not found".to_string()))?;

        self.resolve_week(lab_id, today).await
    }

    /// Every lab's week anchored on `anchor`, tagged with the lab name.
    pub async fn all_labs_week(&self, anchor: NaiveDate) -> Result<Vec<AdminSlotView>, AppError> {
        let mut out = Vec::new();
        for Lab { id, name } in repository::fetch_labs(&self.db).await? {
            let slots = self.resolve_week(id, anchor).await?;
            out.extend(slots.into_iter().map(|slot| AdminSlotView {
                lab_name: name.clone(),
                slot,
            }));
        }
        Ok(out)
    }

    async fn resolve_week(&self, lab_id: i64, anchor: NaiveDate) -> Result<Vec<SlotView>, AppError> {
        let rules = LabRules::load(&self.db, lab_id).await?;
        let dates: HashMap<Day, NaiveDate> = week_dates(anchor).into_iter().collect();

        let bookings: HashMap<_, _> =
            repository::fetch_lab_bookings(&self.db, lab_id, anchor, anchor + Duration::days(6))
                .await?
                .into_iter()
                .map(|b| ((b.timetable_id, b.date), b))
                .collect();

        let views = rules
            .slots()
            .into_iter()
            .map(|slot| {
                let date = dates[&slot.day];
                match bookings.get(&(slot.id, date)) {
                    Some(booking) => SlotView {
                        id: slot.id,
                        lab_id: slot.lab_id,
                        day: slot.day,
                        period: slot.period,
                        status: SlotStatus::Booked,
                        class_info: booking.class_info.clone(),
                        faculty_id: Some(booking.user_id),
                        faculty_name: booking.user_name.clone(),
                        date,
                    },
                    None => {
                        let resolved = rules.resolve(slot, date);
                        SlotView {
                            id: slot.id,
                            lab_id: slot.lab_id,
                            day: slot.day,
                            period: slot.period,
                            status: resolved.status(),
                            class_info: resolved.class_info().map(str::to_string),
                            faculty_id: None,
                            faculty_name: None,
                            date,
                        }
                    }
                }
            })
            .collect();

        Ok(views)
    }

    pub async fn weekend_config(&self, lab_id: i64) -> Result<WeekendConfigResponse, AppError> {
        repository::find_lab(&self.db, lab_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lab not found".to_string()))?;

        let rules = LabRules::load(&self.db, lab_id).await?;
        let today = self.clock.today();

        let day_config = |day: Day| {
            let date = date_for(today, day);
            let override_ = rules.override_for(day, date);
            WeekendDayConfig {
                default_text: rules.default_for(day).and_then(|d| d.custom_text.clone()),
                override_: WeekendOverrideSummary {
                    exists: override_.is_some(),
                    source_day: override_.and_then(|o| o.source_day),
                    target_date: override_.map(|o| o.target_date),
                },
            }
        };

        Ok(WeekendConfigResponse {
            saturday: day_config(Day::Saturday),
            sunday: day_config(Day::Sunday),
        })
    }

    pub async fn weekend_global(&self) -> Result<WeekendGlobalResponse, AppError> {
        let saturday = repository::find_weekend_default(&self.db, None, Day::Saturday).await?;
        let sunday = repository::find_weekend_default(&self.db, None, Day::Sunday).await?;
        Ok(WeekendGlobalResponse {
            saturday: saturday.and_then(|d| d.custom_text),
            sunday: sunday.and_then(|d| d.custom_text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::connect_in_memory;

    // Saturday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    async fn setup() -> (SqlitePool, TimetableService, Lab) {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let lab = repository::insert_lab(&pool, "Lab A").await.unwrap();
        let service = TimetableService::new(pool.clone(), Arc::new(FixedClock::new(today())));
        (pool, service, lab)
    }

    fn find(views: &[SlotView], day: Day, period: i64) -> &SlotView {
        views
            .iter()
            .find(|v| v.day == day && v.period == period)
            .expect("slot missing")
    }

    #[tokio::test]
    async fn test_lab_week_dates_and_booking() {
        let (pool, service, lab) = setup().await;
        let user = repository::insert_user(&pool, "Asha", "f1", "x", false).await.unwrap();
        let slots = repository::fetch_lab_slots(&pool, lab.id).await.unwrap();
        let mon1 = slots.iter().find(|s| s.day == Day::Monday && s.period == 1).unwrap();
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        repository::insert_booking(&pool, mon1.id, monday, user, Some("CSE-A")).await.unwrap();
        // stale booking from last week is purged on read
        let last_monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        repository::insert_booking(&pool, mon1.id, last_monday, user, None).await.unwrap();

        let views = service.lab_week(lab.id).await.expect("Failed to load week");
        assert_eq!(views.len(), 56);

        let booked = find(&views, Day::Monday, 1);
        assert_eq!(booked.status, SlotStatus::Booked);
        assert_eq!(booked.date, monday);
        assert_eq!(booked.faculty_id, Some(user));
        assert_eq!(booked.faculty_name.as_deref(), Some("Asha"));
        assert_eq!(booked.class_info.as_deref(), Some("CSE-A"));

        assert_eq!(find(&views, Day::Saturday, 3).date, today());
        assert_eq!(find(&views, Day::Friday, 3).status, SlotStatus::Free);

        assert!(repository::find_booking(&pool, mon1.id, last_monday).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lab_week_applies_weekend_rules() {
        let (pool, service, lab) = setup().await;
        let slots = repository::fetch_lab_slots(&pool, lab.id).await.unwrap();
        let tue2 = slots.iter().find(|s| s.day == Day::Tuesday && s.period == 2).unwrap();
        repository::set_slot_status(&pool, tue2.id, SlotStatus::Regular, Some("ECE-B"), today())
            .await
            .unwrap();
        repository::upsert_weekend_default(&pool, None, Day::Sunday, Some("Closed")).await.unwrap();
        repository::upsert_follow_override(&pool, lab.id, Day::Saturday, today(), Day::Tuesday, None)
            .await
            .unwrap();

        let views = service.lab_week(lab.id).await.unwrap();

        let sat2 = find(&views, Day::Saturday, 2);
        assert_eq!(sat2.status, SlotStatus::Regular);
        assert_eq!(sat2.class_info.as_deref(), Some("ECE-B"));
        assert_eq!(find(&views, Day::Saturday, 1).status, SlotStatus::Free);

        let sun5 = find(&views, Day::Sunday, 5);
        assert_eq!(sun5.status, SlotStatus::Regular);
        assert_eq!(sun5.class_info.as_deref(), Some("Closed"));
    }

    #[tokio::test]
    async fn test_lab_week_unknown_lab() {
        let (_pool, service, _lab) = setup().await;
        assert!(matches!(service.lab_week(999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_all_labs_week() {
        let (pool, service, _lab) = setup().await;
        repository::insert_lab(&pool, "Lab B").await.unwrap();

        let views = service.all_labs_week(today()).await.unwrap();
        assert_eq!(views.len(), 112);
        assert_eq!(views[0].lab_name, "Lab A");
        assert_eq!(views[111].lab_name, "Lab B");
    }

    #[tokio::test]
    async fn test_weekend_config_falls_back_to_global() {
        let (pool, service, lab) = setup().await;
        repository::upsert_weekend_default(&pool, None, Day::Saturday, Some("Closed")).await.unwrap();
        repository::upsert_weekend_default(&pool, Some(lab.id), Day::Sunday, Some("Lab only")).await.unwrap();
        repository::upsert_follow_override(&pool, lab.id, Day::Sunday, today() + Duration::days(1), Day::Monday, None)
            .await
            .unwrap();

        let config = service.weekend_config(lab.id).await.unwrap();
        assert_eq!(config.saturday.default_text.as_deref(), Some("Closed"));
        assert!(!config.saturday.override_.exists);
        assert_eq!(config.sunday.default_text.as_deref(), Some("Lab only"));
        assert!(config.sunday.override_.exists);
        assert_eq!(config.sunday.override_.source_day, Some(Day::Monday));

        let global = service.weekend_global().await.unwrap();
        assert_eq!(global.saturday.as_deref(), Some("Closed"));
        assert_eq!(global.sunday, None);
    }
}

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;
use tracing::info;

use crate::clock::Clock;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{BlockRequest, BookRequest, ReleaseRequest, SlotStatus, int_from_value};
use crate::services::admin::require_admin;
use crate::services::weekend::{LabRules, Resolution};
use crate::week::{Day, parse_iso_date};

pub struct BookingService {
    db: SqlitePool,
    clock: Arc<dyn Clock>,
}

fn slot_id(value: &serde_json::Value) -> Result<i64, AppError> {
    int_from_value(value).ok_or_else(|| AppError::BadRequest("Invalid slot id".to_string()))
}

fn required_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => parse_iso_date(d),
        None => Err(AppError::BadRequest("Missing date".to_string())),
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

impl BookingService {
    pub fn new(db: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Book template slot `req.id` on `req.date`; returns the booking id.
    pub async fn book(&self, req: BookRequest) -> Result<i64, AppError> {
        let slot_id = slot_id(&req.id)?;
        let date = required_date(req.date.as_deref())?;
        if date < self.clock.today() {
            return Err(AppError::BadRequest("Cannot book past date".to_string()));
        }

        let slot = repository::find_slot(&self.db, slot_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))?;
        if Day::from_weekday(date.weekday()) != slot.day {
            return Err(AppError::BadRequest(
                "Date does not fall on the slot's day".to_string(),
            ));
        }

        let user = match int_from_value(&req.faculty_id) {
            Some(id) => repository::find_user_by_id(&self.db, id).await?,
            None => None,
        }
        .ok_or_else(|| AppError::BadRequest("Unknown faculty".to_string()))?;

        let rules = LabRules::load(&self.db, slot.lab_id).await?;
        if let Resolution::Regular { reason, .. } = rules.resolve(&slot, date) {
            return Err(AppError::BadRequest(reason.message().to_string()));
        }

        if repository::find_booking(&self.db, slot.id, date).await?.is_some() {
            return Err(AppError::Conflict("Slot already booked for that date".to_string()));
        }

        let booking_id = repository::insert_booking(
            &self.db,
            slot.id,
            date,
            user.id,
            non_empty(req.class_info.as_deref()),
        )
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Slot already booked for that date".to_string())
            }
            other => AppError::Database(other),
        })?;

        info!(
            "{} booked lab {} {} period {} on {}",
            user.faculty_id, slot.lab_id, slot.day, slot.period, date
        );
        Ok(booking_id)
    }

    /// Cancel a booking. Its owner or any admin may release it.
    pub async fn release(&self, req: ReleaseRequest) -> Result<(), AppError> {
        let slot_id = slot_id(&req.id)?;
        let date = required_date(req.date.as_deref())?;

        let booking = repository::find_booking(&self.db, slot_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound("No booking found for that slot/date".to_string()))?;

        let requester = match int_from_value(&req.faculty_id) {
            Some(id) => repository::find_user_by_id(&self.db, id).await?,
            None => None,
        };
        let allowed = requester
            .as_ref()
            .is_some_and(|u| u.id == booking.user_id || u.is_admin);
        if !allowed {
            return Err(AppError::Forbidden("Not authorized to release".to_string()));
        }

        repository::delete_booking(&self.db, booking.id).await?;
        info!("Released booking {} (slot {} on {})", booking.id, slot_id, date);
        Ok(())
    }

    /// Toggle a template slot between Free and Regular; returns how many
    /// upcoming bookings were dropped.
    pub async fn block(&self, req: BlockRequest) -> Result<u64, AppError> {
        if req.requester_faculty_id.is_some() {
            require_admin(&self.db, req.requester_faculty_id.as_deref()).await?;
        }

        // missing or non-numeric ids are unknown slots
        let slot = match req.slot_id.as_ref().and_then(int_from_value) {
            Some(id) => repository::find_slot(&self.db, id).await?,
            None => None,
        }
        .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))?;

        let status = match req.status.as_deref() {
            Some("Free") => SlotStatus::Free,
            Some("Regular") => SlotStatus::Regular,
            _ => return Err(AppError::BadRequest("Invalid status".to_string())),
        };
        let class_info = match status {
            SlotStatus::Regular => non_empty(req.class_info.as_deref()),
            _ => None,
        };

        let removed = repository::set_slot_status(
            &self.db,
            slot.id,
            status,
            class_info,
            self.clock.today(),
        )
        .await?;

        info!(
            "Slot {} (lab {} {} period {}) set to {:?}, {} bookings removed",
            slot.id, slot.lab_id, slot.day, slot.period, status, removed
        );
        Ok(removed)
    }

    pub async fn cleanup_past_bookings(&self) -> Result<u64, AppError> {
        let deleted = repository::delete_bookings_before(&self.db, self.clock.today()).await?;
        if deleted > 0 {
            info!("Deleted {} past bookings", deleted);
        }
        Ok(deleted)
    }
}

//! Weekend default/override resolution.
//!
//! A template slot on a weekday shows its own status. On Saturday and Sunday
//! the status for a concrete date comes from, in order:
//!
//! 1. a `follow` override for (lab, day, date), which copies the Regular
//!    blocks of a weekday for the same period,
//! 2. the lab's own weekend default, else the global one, whose non-empty
//!    text blocks every period of the day,
//! 3. the template slot itself.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::db::repository;
use crate::models::{SlotStatus, TemplateSlot, WeekendDefault, WeekendOverride};
use crate::week::Day;

/// Why a slot is not bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Template,
    Override,
    WeekendDefault,
}

impl BlockReason {
    pub fn message(self) -> &'static str {
        match self {
            BlockReason::Template => "This period is marked Regular by admin",
            BlockReason::Override => "This period is marked Regular by admin (override)",
            BlockReason::WeekendDefault => "This weekend period is blocked by default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Free,
    Regular {
        class_info: Option<String>,
        reason: BlockReason,
    },
}

impl Resolution {
    pub fn status(&self) -> SlotStatus {
        match self {
            Resolution::Free => SlotStatus::Free,
            Resolution::Regular { .. } => SlotStatus::Regular,
        }
    }

    pub fn class_info(&self) -> Option<&str> {
        match self {
            Resolution::Free => None,
            Resolution::Regular { class_info, .. } => class_info.as_deref(),
        }
    }

    fn from_template(slot: &TemplateSlot, reason: BlockReason) -> Self {
        match slot.status {
            SlotStatus::Regular => Resolution::Regular {
                class_info: slot.class_info.clone(),
                reason,
            },
            _ => Resolution::Free,
        }
    }
}

/// Everything needed to resolve any slot of one lab.
#[derive(Debug, Default)]
pub struct LabRules {
    template: HashMap<(Day, i64), TemplateSlot>,
    overrides: HashMap<(Day, NaiveDate), WeekendOverride>,
    lab_defaults: HashMap<Day, WeekendDefault>,
    global_defaults: HashMap<Day, WeekendDefault>,
}

impl LabRules {
    pub fn new(
        slots: Vec<TemplateSlot>,
        overrides: Vec<WeekendOverride>,
        lab_defaults: Vec<WeekendDefault>,
        global_defaults: Vec<WeekendDefault>,
    ) -> Self {
        Self {
            template: slots.into_iter().map(|s| ((s.day, s.period), s)).collect(),
            overrides: overrides
                .into_iter()
                .map(|o| ((o.day, o.target_date), o))
                .collect(),
            lab_defaults: lab_defaults.into_iter().map(|d| (d.day, d)).collect(),
            global_defaults: global_defaults.into_iter().map(|d| (d.day, d)).collect(),
        }
    }

    /// Load the template, overrides and defaults for `lab_id`.
    pub async fn load(db: &SqlitePool, lab_id: i64) -> Result<Self, sqlx::Error> {
        let slots = repository::fetch_lab_slots(db, lab_id).await?;
        let overrides = repository::fetch_lab_overrides(db, lab_id).await?;
        let lab_defaults = repository::fetch_weekend_defaults(db, Some(lab_id)).await?;
        let global_defaults = repository::fetch_weekend_defaults(db, None).await?;
        Ok(Self::new(slots, overrides, lab_defaults, global_defaults))
    }

    /// Template slots ordered by day, then period.
    pub fn slots(&self) -> Vec<&TemplateSlot> {
        let mut slots: Vec<_> = self.template.values().collect();
        slots.sort_by_key(|s| (s.day, s.period));
        slots
    }

    pub fn default_for(&self, day: Day) -> Option<&WeekendDefault> {
        self.lab_defaults
            .get(&day)
            .or_else(|| self.global_defaults.get(&day))
    }

    pub fn override_for(&self, day: Day, date: NaiveDate) -> Option<&WeekendOverride> {
        self.overrides.get(&(day, date))
    }

    /// Status of `slot` on `date`, ignoring bookings.
    pub fn resolve(&self, slot: &TemplateSlot, date: NaiveDate) -> Resolution {
        if !slot.day.is_weekend() {
            return Resolution::from_template(slot, BlockReason::Template);
        }

        if let Some(source_day) = self
            .override_for(slot.day, date)
            .and_then(WeekendOverride::follow_source)
        {
            return match self.template.get(&(source_day, slot.period)) {
                Some(source) => Resolution::from_template(source, BlockReason::Override),
                None => Resolution::Free,
            };
        }

        if let Some(text) = self.default_for(slot.day).and_then(WeekendDefault::blocking_text) {
            return Resolution::Regular {
                class_info: Some(text.to_string()),
                reason: BlockReason::WeekendDefault,
            };
        }

        Resolution::from_template(slot, BlockReason::Template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OverrideType;

    fn sat() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn slot(id: i64, day: Day, period: i64, regular: Option<&str>) -> TemplateSlot {
        TemplateSlot {
            id,
            lab_id: 1,
            day,
            period,
            status: if regular.is_some() { SlotStatus::Regular } else { SlotStatus::Free },
            class_info: regular.map(str::to_string),
        }
    }

    fn default(lab_id: Option<i64>, day: Day, text: Option<&str>) -> WeekendDefault {
        WeekendDefault {
            id: 0,
            lab_id,
            day,
            custom_text: text.map(str::to_string),
        }
    }

    fn follow(day: Day, date: NaiveDate, source: Day) -> WeekendOverride {
        WeekendOverride {
            id: 0,
            lab_id: 1,
            day,
            target_date: date,
            override_type: OverrideType::Follow,
            source_day: Some(source),
            created_by: None,
        }
    }

    fn template() -> Vec<TemplateSlot> {
        vec![
            slot(1, Day::Wednesday, 1, Some("II-Sec-E")),
            slot(2, Day::Wednesday, 2, None),
            slot(3, Day::Saturday, 1, None),
            slot(4, Day::Saturday, 2, None),
            slot(5, Day::Sunday, 1, Some("Maintenance")),
        ]
    }

    #[test]
    fn test_weekday_uses_template() {
        let rules = LabRules::new(template(), vec![], vec![], vec![default(None, Day::Saturday, Some("Closed"))]);
        let wed = rules.template[&(Day::Wednesday, 1)].clone();
        let res = rules.resolve(&wed, sat());
        assert_eq!(res.status(), SlotStatus::Regular);
        assert_eq!(res.class_info(), Some("II-Sec-E"));

        let free = rules.template[&(Day::Wednesday, 2)].clone();
        assert_eq!(rules.resolve(&free, sat()), Resolution::Free);
    }

    #[test]
    fn test_override_copies_source_day_regulars() {
        let rules = LabRules::new(
            template(),
            vec![follow(Day::Saturday, sat(), Day::Wednesday)],
            vec![],
            vec![default(None, Day::Saturday, Some("Closed"))],
        );
        let p1 = rules.template[&(Day::Saturday, 1)].clone();
        let p2 = rules.template[&(Day::Saturday, 2)].clone();

        assert_eq!(
            rules.resolve(&p1, sat()),
            Resolution::Regular {
                class_info: Some("II-Sec-E".to_string()),
                reason: BlockReason::Override,
            }
        );
        // the override wins over the blocking global default
        assert_eq!(rules.resolve(&p2, sat()), Resolution::Free);
    }

    #[test]
    fn test_override_only_applies_to_its_date() {
        let next_sat = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        let rules = LabRules::new(
            template(),
            vec![follow(Day::Saturday, next_sat, Day::Wednesday)],
            vec![],
            vec![],
        );
        let p1 = rules.template[&(Day::Saturday, 1)].clone();
        assert_eq!(rules.resolve(&p1, sat()), Resolution::Free);
        assert_eq!(rules.resolve(&p1, next_sat).status(), SlotStatus::Regular);
    }

    #[test]
    fn test_lab_default_beats_global_default() {
        let rules = LabRules::new(
            template(),
            vec![],
            vec![default(Some(1), Day::Saturday, Some("Lab exam"))],
            vec![default(None, Day::Saturday, Some("Closed"))],
        );
        let p1 = rules.template[&(Day::Saturday, 1)].clone();
        let res = rules.resolve(&p1, sat());
        assert_eq!(res.class_info(), Some("Lab exam"));
        assert_eq!(
            res,
            Resolution::Regular {
                class_info: Some("Lab exam".to_string()),
                reason: BlockReason::WeekendDefault,
            }
        );
    }

    #[test]
    fn test_empty_lab_default_falls_through_to_template() {
        let rules = LabRules::new(
            template(),
            vec![],
            vec![default(Some(1), Day::Sunday, Some(""))],
            vec![default(None, Day::Sunday, Some("Closed"))],
        );
        let sun = rules.template[&(Day::Sunday, 1)].clone();
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        // lab default exists but is empty: it shadows the global one
        assert_eq!(
            rules.resolve(&sun, sunday),
            Resolution::Regular {
                class_info: Some("Maintenance".to_string()),
                reason: BlockReason::Template,
            }
        );
    }

    #[test]
    fn test_slots_are_ordered() {
        let rules = LabRules::new(template(), vec![], vec![], vec![]);
        let ids: Vec<i64> = rules.slots().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::week::Day;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OverrideType {
    /// Take the Regular blocks of `source_day` for the target weekend date.
    Follow,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeekendDefault {
    pub id: i64,
    /// `None` is the global default.
    pub lab_id: Option<i64>,
    pub day: Day,
    pub custom_text: Option<String>,
}

impl WeekendDefault {
    /// Non-empty text blocks the whole day.
    pub fn blocking_text(&self) -> Option<&str> {
        self.custom_text.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeekendOverride {
    pub id: i64,
    pub lab_id: i64,
    pub day: Day,
    pub target_date: NaiveDate,
    pub override_type: OverrideType,
    pub source_day: Option<Day>,
    pub created_by: Option<i64>,
}

impl WeekendOverride {
    pub fn follow_source(&self) -> Option<Day> {
        match self.override_type {
            OverrideType::Follow => self.source_day,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeekendDefaultRequest {
    #[serde(default, alias = "requester")]
    pub requester_faculty_id: Option<String>,
    /// `"global"`, null, or a lab id.
    #[serde(default)]
    pub lab_id: Value,
    pub day: Option<String>,
    pub custom_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeekendOverrideRequest {
    #[serde(default, alias = "requester")]
    pub requester_faculty_id: Option<String>,
    #[serde(default)]
    pub lab_id: Value,
    pub day: Option<String>,
    pub source_day: Option<String>,
    pub target_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekendOverrideSummary {
    pub exists: bool,
    pub source_day: Option<Day>,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekendDayConfig {
    pub default_text: Option<String>,
    #[serde(rename = "override")]
    pub override_: WeekendOverrideSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekendConfigResponse {
    pub saturday: WeekendDayConfig,
    pub sunday: WeekendDayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekendGlobalResponse {
    pub saturday: Option<String>,
    pub sunday: Option<String>,
}

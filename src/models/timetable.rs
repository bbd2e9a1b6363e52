use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::week::Day;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum SlotStatus {
    Free,
    Booked,
    Regular,
}

/// One (day, period) cell of a lab's recurring weekly template.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateSlot {
    pub id: i64,
    pub lab_id: i64,
    pub day: Day,
    pub period: i64,
    pub status: SlotStatus,
    pub class_info: Option<String>,
}

/// A template slot resolved for a concrete date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotView {
    pub id: i64,
    pub lab_id: i64,
    pub day: Day,
    pub period: i64,
    pub status: SlotStatus,
    pub class_info: Option<String>,
    /// Numeric id of the booking user, kept under the name the front end reads.
    pub faculty_id: Option<i64>,
    pub faculty_name: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSlotView {
    pub lab_name: String,
    #[serde(flatten)]
    pub slot: SlotView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockRequest {
    pub slot_id: Option<serde_json::Value>,
    pub status: Option<String>,
    pub class_info: Option<String>,
    #[serde(default, alias = "requester")]
    pub requester_faculty_id: Option<String>,
}

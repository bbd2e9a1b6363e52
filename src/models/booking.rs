use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub timetable_id: i64,
    pub date: NaiveDate,
    pub user_id: i64,
    pub class_info: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct BookingWithUser {
    pub id: i64,
    pub timetable_id: i64,
    pub date: NaiveDate,
    pub user_id: i64,
    pub class_info: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub id: Value,
    pub date: Option<String>,
    #[serde(default)]
    pub faculty_id: Value,
    pub class_info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseRequest {
    #[serde(default)]
    pub id: Value,
    pub date: Option<String>,
    #[serde(default)]
    pub faculty_id: Value,
    /// Sent by the front end; authorization is decided from the stored user instead.
    #[serde(default)]
    pub is_admin: Option<bool>,
}

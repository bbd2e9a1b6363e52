use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lab {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabRequest {
    #[serde(default, alias = "requester")]
    pub requester_faculty_id: Option<String>,
    pub name: Option<String>,
}

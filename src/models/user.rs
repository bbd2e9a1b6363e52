use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub faculty_id: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub faculty_id: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub faculty_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user_id: i64,
    pub faculty_id: String,
    pub name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub faculty_id: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Body carried by admin-only requests that have nothing else to say.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequesterBody {
    #[serde(default, alias = "requester")]
    pub requester_faculty_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUserRequest {
    #[serde(default, alias = "requester")]
    pub requester_faculty_id: Option<String>,
    pub name: Option<String>,
    pub faculty_id: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, alias = "requester")]
    pub requester_faculty_id: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

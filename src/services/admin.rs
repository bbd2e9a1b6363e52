use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::models::User;

/// Resolve the requesting faculty id to an admin user, or fail with 403.
pub async fn require_admin(db: &SqlitePool, requester: Option<&str>) -> Result<User, AppError> {
    let requester = requester
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Forbidden("Missing requester faculty id".to_string()))?;

    let user = repository::find_user_by_faculty_id(db, requester)
        .await?
        .ok_or_else(|| AppError::Forbidden("Requester not found".to_string()))?;

    if !user.is_admin {
        return Err(AppError::Forbidden("Requester is not admin".to_string()));
    }
    Ok(user)
}

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::password::{hash_password, verify_password};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;
    let (Some(faculty_id), Some(password)) = (
        req.faculty_id.filter(|f| !f.is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest("Missing credentials".to_string()));
    };

    let user = repository::find_user_by_faculty_id(&state.db, &faculty_id)
        .await?
        .filter(|u| verify_password(&password, &u.password_hash));

    match user {
        Some(user) => {
            info!("{} logged in", user.faculty_id);
            Ok(Json(LoginResponse {
                success: true,
                user_id: user.id,
                faculty_id: user.faculty_id,
                name: user.name,
                is_admin: user.is_admin,
            }))
        }
        None => {
            warn!("failed login for {}", faculty_id);
            Err(AppError::Unauthorized("Invalid credentials".to_string()))
        }
    }
}

pub async fn change_password(
    State(state): State<AppState>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let (Some(faculty_id), Some(old_password), Some(new_password)) = (
        req.faculty_id.filter(|f| !f.is_empty()),
        req.old_password.filter(|p| !p.is_empty()),
        req.new_password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "faculty_id, old_password and new_password required".to_string(),
        ));
    };

    let mut user = repository::find_user_by_faculty_id(&state.db, &faculty_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if !verify_password(&old_password, &user.password_hash) {
        return Err(AppError::Unauthorized("Old password is incorrect".to_string()));
    }

    user.password_hash = hash_password(&new_password);
    repository::update_user(&state.db, &user).await?;
    info!("{} changed their password", user.faculty_id);

    Ok(Json(json!({ "success": true })))
}

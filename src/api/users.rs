use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde_json::{Value, json};
use tracing::info;

use super::RequesterQuery;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{NewUserRequest, RequesterBody, UpdateUserRequest, UserSummary};
use crate::password::hash_password;
use crate::services::require_admin;
use crate::state::AppState;

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let Query(query) = query?;
    require_admin(&state.db, query.or_body(None)).await?;
    let users = repository::fetch_users(&state.db).await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<NewUserRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let Json(req) = payload?;
    require_admin(&state.db, query.or_body(req.requester_faculty_id.as_deref())).await?;

    let (Some(name), Some(faculty_id), Some(password)) = (
        trimmed(req.name.as_deref()),
        trimmed(req.faculty_id.as_deref()),
        req.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "name, faculty_id and password required".to_string(),
        ));
    };

    if repository::find_user_by_faculty_id(&state.db, faculty_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("faculty_id already exists".to_string()));
    }

    let id = repository::insert_user(
        &state.db,
        name,
        faculty_id,
        &hash_password(password),
        req.is_admin,
    )
    .await?;
    info!("Created user {} (admin: {})", faculty_id, req.is_admin);

    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    let Query(query) = query?;
    let Json(req) = payload?;
    require_admin(&state.db, query.or_body(req.requester_faculty_id.as_deref())).await?;

    let mut user = repository::find_user_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(name) = trimmed(req.name.as_deref()) {
        user.name = name.to_string();
    }
    if let Some(password) = req.password.as_deref().filter(|p| !p.is_empty()) {
        user.password_hash = hash_password(password);
    }
    if let Some(is_admin) = req.is_admin {
        if user.is_admin && !is_admin && repository::count_admins(&state.db).await? <= 1 {
            return Err(AppError::BadRequest(
                "Cannot remove admin rights from the last admin".to_string(),
            ));
        }
        user.is_admin = is_admin;
    }

    repository::update_user(&state.db, &user).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<RequesterBody>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    let Query(query) = query?;
    let body = payload.map(|Json(b)| b).unwrap_or_default();
    let admin = require_admin(&state.db, query.or_body(body.requester_faculty_id.as_deref())).await?;

    let user = repository::find_user_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.is_admin && repository::count_admins(&state.db).await? <= 1 {
        return Err(AppError::BadRequest("Cannot delete the last admin".to_string()));
    }
    if admin.id == user.id {
        return Err(AppError::BadRequest("Admin cannot delete themselves".to_string()));
    }

    repository::delete_user(&state.db, user.id).await?;
    info!("{} deleted user {}", admin.faculty_id, user.faculty_id);
    Ok(Json(json!({ "success": true })))
}

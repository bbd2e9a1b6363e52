use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde_json::{Value, json};
use tracing::info;

use super::RequesterQuery;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{NewNotificationRequest, Notification, NotificationQuery, RequesterBody};
use crate::services::require_admin;
use crate::state::AppState;

pub async fn list_notifications(
    State(state): State<AppState>,
    params: Result<Query<NotificationQuery>, QueryRejection>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let Query(params) = params?;
    let notifications = repository::fetch_notifications(&state.db, params.active).await?;
    Ok(Json(notifications))
}

pub async fn create_notification(
    State(state): State<AppState>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<NewNotificationRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let Json(req) = payload?;
    let admin = require_admin(&state.db, query.or_body(req.requester_faculty_id.as_deref())).await?;

    let title = req.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let message = req.message.as_deref().map(str::trim).filter(|m| !m.is_empty());
    let id = repository::insert_notification(
        &state.db,
        title,
        message,
        req.active,
        state.clock.now(),
        Some(admin.id),
    )
    .await?;
    info!("{} posted notification {} (active: {})", admin.faculty_id, id, req.active);

    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<RequesterBody>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    let Query(query) = query?;
    let body = payload.map(|Json(b)| b).unwrap_or_default();
    require_admin(&state.db, query.or_body(body.requester_faculty_id.as_deref())).await?;

    if !repository::delete_notification(&state.db, id).await? {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

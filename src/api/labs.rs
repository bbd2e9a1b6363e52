use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde_json::{Value, json};
use tracing::info;

use super::RequesterQuery;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{Lab, LabRequest, RequesterBody};
use crate::services::require_admin;
use crate::state::AppState;

fn lab_name(req: &LabRequest) -> Result<&str, AppError> {
    req.name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing name".to_string()))
}

pub async fn list_labs(State(state): State<AppState>) -> Result<Json<Vec<Lab>>, AppError> {
    let labs = repository::fetch_labs(&state.db).await?;
    Ok(Json(labs))
}

pub async fn create_lab(
    State(state): State<AppState>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<LabRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let Json(req) = payload?;
    require_admin(&state.db, query.or_body(req.requester_faculty_id.as_deref())).await?;
    let name = lab_name(&req)?;

    let lab = repository::insert_lab(&state.db, name).await?;
    info!("Created lab {} ({})", lab.id, lab.name);

    Ok(Json(json!({ "success": true, "id": lab.id, "name": lab.name })))
}

pub async fn update_lab(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<LabRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    let Query(query) = query?;
    let Json(req) = payload?;
    require_admin(&state.db, query.or_body(req.requester_faculty_id.as_deref())).await?;
    let name = lab_name(&req)?;

    if !repository::rename_lab(&state.db, id, name).await? {
        return Err(AppError::NotFound("Lab not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn delete_lab(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<RequesterBody>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    let Query(query) = query?;
    // DELETE bodies are optional
    let body = payload.map(|Json(b)| b).unwrap_or_default();
    require_admin(&state.db, query.or_body(body.requester_faculty_id.as_deref())).await?;

    if !repository::delete_lab(&state.db, id).await? {
        return Err(AppError::NotFound("Lab not found".to_string()));
    }
    info!("Deleted lab {}", id);
    Ok(Json(json!({ "success": true })))
}

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use chrono::Datelike;
use serde_json::{Value, json};
use tracing::info;

use super::RequesterQuery;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    WeekendConfigResponse, WeekendDefaultRequest, WeekendGlobalResponse, WeekendOverrideRequest,
    int_from_value,
};
use crate::services::{TimetableService, require_admin};
use crate::state::AppState;
use crate::week::{Day, date_for, parse_iso_date};

fn weekend_day(raw: Option<&str>) -> Result<Day, AppError> {
    raw.and_then(|d| d.parse::<Day>().ok())
        .filter(|d| d.is_weekend())
        .ok_or_else(|| AppError::BadRequest("Invalid day".to_string()))
}

async fn existing_lab(state: &AppState, lab_id: i64) -> Result<(), AppError> {
    repository::find_lab(&state.db, lab_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lab not found".to_string()))?;
    Ok(())
}

pub async fn global_defaults(
    State(state): State<AppState>,
) -> Result<Json<WeekendGlobalResponse>, AppError> {
    let service = TimetableService::new(state.db.clone(), state.clock.clone());
    Ok(Json(service.weekend_global().await?))
}

pub async fn lab_config(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<WeekendConfigResponse>, AppError> {
    let Path(lab_id) = path?;
    let service = TimetableService::new(state.db.clone(), state.clock.clone());
    Ok(Json(service.weekend_config(lab_id).await?))
}

pub async fn set_default(
    State(state): State<AppState>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<WeekendDefaultRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let Json(req) = payload?;
    let admin = require_admin(&state.db, query.or_body(req.requester_faculty_id.as_deref())).await?;
    let day = weekend_day(req.day.as_deref())?;

    let lab_id = match &req.lab_id {
        Value::Null => None,
        Value::String(s) if s == "global" => None,
        other => Some(
            int_from_value(other)
                .ok_or_else(|| AppError::BadRequest("Invalid lab_id".to_string()))?,
        ),
    };
    if let Some(id) = lab_id {
        existing_lab(&state, id).await?;
    }

    let text = req.custom_text.as_deref().map(str::trim).filter(|t| !t.is_empty());
    repository::upsert_weekend_default(&state.db, lab_id, day, text).await?;
    info!(
        "{} set {} default for {} to {:?}",
        admin.faculty_id,
        day,
        lab_id.map_or_else(|| "all labs".to_string(), |id| format!("lab {}", id)),
        text
    );

    Ok(Json(json!({ "success": true })))
}

pub async fn set_override(
    State(state): State<AppState>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<WeekendOverrideRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let Json(req) = payload?;
    let admin = require_admin(&state.db, query.or_body(req.requester_faculty_id.as_deref())).await?;
    let day = weekend_day(req.day.as_deref())?;
    let lab_id = int_from_value(&req.lab_id)
        .ok_or_else(|| AppError::BadRequest("Invalid lab_id".to_string()))?;
    existing_lab(&state, lab_id).await?;

    let today = state.clock.today();
    let target_date = match req.target_date.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(raw) => {
            let date = parse_iso_date(raw)?;
            if Day::from_weekday(date.weekday()) != day {
                return Err(AppError::BadRequest(format!("Target date is not a {}", day)));
            }
            if date < today {
                return Err(AppError::BadRequest("Cannot override a past date".to_string()));
            }
            date
        }
        None => date_for(today, day),
    };

    let Some(source) = req.source_day.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        let removed = repository::delete_override(&state.db, lab_id, day, target_date).await?;
        if removed > 0 {
            info!("{} cleared {} override for lab {}", admin.faculty_id, target_date, lab_id);
        }
        return Ok(Json(json!({ "success": true, "message": "Override cleared" })));
    };

    let source_day = Day::WEEKDAYS
        .into_iter()
        .find(|d| d.as_str() == source)
        .ok_or_else(|| AppError::BadRequest("Invalid source day".to_string()))?;

    repository::upsert_follow_override(&state.db, lab_id, day, target_date, source_day, Some(admin.id))
        .await?;
    info!(
        "{} set lab {} {} ({}) to follow {}",
        admin.faculty_id, lab_id, day, target_date, source_day
    );

    Ok(Json(json!({ "success": true })))
}

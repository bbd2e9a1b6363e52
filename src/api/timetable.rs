use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{AdminSlotView, SlotView};
use crate::services::TimetableService;
use crate::state::AppState;
use crate::week::parse_iso_date;

#[derive(Debug, Deserialize)]
pub struct AdminTimetableQuery {
    date: Option<String>,
}

pub async fn lab_timetable(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<SlotView>>, AppError> {
    let Path(lab_id) = path?;
    let service = TimetableService::new(state.db.clone(), state.clock.clone());
    let slots = service.lab_week(lab_id).await?;
    Ok(Json(slots))
}

pub async fn admin_timetable(
    State(state): State<AppState>,
    params: Result<Query<AdminTimetableQuery>, QueryRejection>,
) -> Result<Json<Vec<AdminSlotView>>, AppError> {
    let Query(params) = params?;
    let anchor = match params.date.as_deref().filter(|d| !d.is_empty()) {
        Some(d) => parse_iso_date(d)?,
        None => state.clock.today(),
    };
    let service = TimetableService::new(state.db.clone(), state.clock.clone());
    let slots = service.all_labs_week(anchor).await?;
    Ok(Json(slots))
}

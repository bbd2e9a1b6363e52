use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde_json::{Value, json};

use super::RequesterQuery;
use crate::error::AppError;
use crate::models::{BlockRequest, BookRequest, ReleaseRequest, RequesterBody};
use crate::services::{BookingService, require_admin};
use crate::state::AppState;

fn service(state: &AppState) -> BookingService {
    BookingService::new(state.db.clone(), state.clock.clone())
}

pub async fn book(
    State(state): State<AppState>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let booking_id = service(&state).book(req).await?;
    Ok(Json(json!({ "success": true, "booking_id": booking_id })))
}

pub async fn release(
    State(state): State<AppState>,
    payload: Result<Json<ReleaseRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    service(&state).release(req).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn block(
    State(state): State<AppState>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<BlockRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let Json(mut req) = payload?;
    if req.requester_faculty_id.is_none() {
        req.requester_faculty_id = query.requester;
    }
    let removed = service(&state).block(req).await?;
    Ok(Json(json!({ "success": true, "removed_bookings": removed })))
}

pub async fn cleanup_bookings(
    State(state): State<AppState>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
    payload: Result<Json<RequesterBody>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let body = payload.map(|Json(b)| b).unwrap_or_default();
    require_admin(&state.db, query.or_body(body.requester_faculty_id.as_deref())).await?;

    let deleted = service(&state).cleanup_past_bookings().await?;
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}

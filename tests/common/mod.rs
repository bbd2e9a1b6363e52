#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::NaiveDate;
use lab_timetable::clock::FixedClock;
use lab_timetable::db;
use lab_timetable::routes::app;
use lab_timetable::state::AppState;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const ORIGIN: &str = "http://localhost:8000";

/// Saturday 2026-10-17.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to create database");
    db::seed(&pool, 2).await.expect("Failed to seed database");

    let state = AppState {
        db: pool.clone(),
        clock: Arc::new(FixedClock::new(today())),
    };
    (app(state, &[ORIGIN.to_string()]), pool)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// Find a slot in a timetable response by day and period.
pub fn slot<'a>(timetable: &'a Value, day: &str, period: i64) -> &'a Value {
    timetable
        .as_array()
        .expect("timetable is not an array")
        .iter()
        .find(|s| s["day"] == day && s["period"] == period)
        .expect("slot missing")
}

/// Create a non-admin user through the API and return their numeric id.
pub async fn create_faculty(app: &Router, faculty_id: &str, name: &str) -> i64 {
    let (status, body) = post(
        app,
        "/api/users",
        serde_json::json!({
            "requester_faculty_id": "admin",
            "name": name,
            "faculty_id": faculty_id,
            "password": "pw",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["id"].as_i64().unwrap()
}

mod auth;
mod booking;
mod labs;
mod notifications;
mod timetable;
mod users;
mod weekend;

use axum::routing::{delete, post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// `?requester=<faculty id>`, accepted on every admin endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RequesterQuery {
    pub requester: Option<String>,
}

impl RequesterQuery {
    /// Body value first, query string second.
    pub fn or_body<'a>(&'a self, body: Option<&'a str>) -> Option<&'a str> {
        body.or(self.requester.as_deref())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/login", post(auth::login))
        .route("/api/change_password", post(auth::change_password))
        .route("/api/labs", get(labs::list_labs).post(labs::create_lab))
        .route("/api/labs/{id}", put(labs::update_lab).delete(labs::delete_lab))
        .route("/api/timetable/{lab_id}", get(timetable::lab_timetable))
        .route("/api/admin/timetable", get(timetable::admin_timetable))
        .route("/api/book", post(booking::book))
        .route("/api/release", post(booking::release))
        .route("/api/block", post(booking::block))
        .route("/api/cleanup_bookings", post(booking::cleanup_bookings))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/{id}", put(users::update_user).delete(users::delete_user))
        .route("/api/weekend/global", get(weekend::global_defaults))
        .route("/api/weekend/default", post(weekend::set_default))
        .route("/api/weekend/override", post(weekend::set_override))
        .route("/api/weekend/{lab_id}", get(weekend::lab_config))
        .route(
            "/api/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route("/api/notifications/{id}", delete(notifications::delete_notification))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

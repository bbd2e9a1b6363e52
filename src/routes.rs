use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api;
use crate::state::AppState;

/// The API router wrapped with CORS for the configured front-end origins and
/// request tracing.
pub fn app(state: AppState, frontend_origins: &[String]) -> Router {
    api::router(state)
        .layer(cors_layer(frontend_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(frontend_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = frontend_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("ignoring invalid origin {:?}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

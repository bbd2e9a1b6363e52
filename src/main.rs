use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lab_timetable::clock::{Clock, SystemClock};
use lab_timetable::config::AppConfig;
use lab_timetable::db;
use lab_timetable::routes::app;
use lab_timetable::services::{BookingService, CleanupScheduler};
use lab_timetable::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "lab_timetable=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let pool = db::connect(&config.database_url, config.db_max_connections).await?;
    db::migrate(&pool).await?;
    db::seed(&pool, config.seed_lab_count).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let deleted = BookingService::new(pool.clone(), clock.clone())
        .cleanup_past_bookings()
        .await?;
    info!("Startup cleanup removed {} past bookings", deleted);

    if config.cleanup_interval_secs > 0 {
        let scheduler = CleanupScheduler::new(pool.clone(), clock.clone(), config.cleanup_interval_secs);
        tokio::spawn(scheduler.start());
    }

    let state = AppState { db: pool, clock };
    let app = app(state, &config.frontend_origins);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

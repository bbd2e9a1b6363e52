use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::AppError;
use crate::services::booking_service::BookingService;

/// Periodically deletes bookings dated before today.
pub struct CleanupScheduler {
    db: SqlitePool,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl CleanupScheduler {
    pub fn new(db: SqlitePool, clock: Arc<dyn Clock>, interval_secs: u64) -> Self {
        Self {
            db,
            clock,
            interval: Duration::from_secs(interval_secs),
        }
    }

    pub async fn start(self) {
        info!("Starting booking cleanup scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.run_once().await {
                Ok(deleted) => info!("Scheduled cleanup removed {} past bookings", deleted),
                // keep going; the next tick retries
                Err(e) => warn!("Scheduled cleanup failed: {:?}", e),
            }
        }
    }

    pub async fn run_once(&self) -> Result<u64, AppError> {
        let service = BookingService::new(self.db.clone(), self.clock.clone());
        service.cleanup_past_bookings().await
    }
}

//! Periodic cleanup of old stored host metrics.
//!
//! Deletes rows from `system_metrics` older than the configured retention
//! period, once an hour.

use std::time::Duration;

use chrono::Utc;
use pulse_db::repositories::SystemMetricRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the metrics retention cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, retention_hours: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_hours,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Metrics retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Metrics retention job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::hours(retention_hours);
                match SystemMetricRepo::delete_older_than(&pool, cutoff).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Metrics retention: purged old rows");
                        } else {
                            tracing::debug!("Metrics retention: no rows to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Metrics retention: cleanup failed");
                    }
                }
            }
        }
    }
}

//! Periodic storage of host snapshots in `system_metrics`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pulse_agent::MetricsSource;
use pulse_db::models::system_metric::CreateSystemMetric;
use pulse_db::repositories::SystemMetricRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::{sample, ticker};

/// Sample and insert one row every `period` until `cancel` fires.
/// Sampling and insert failures are logged; the loop keeps going.
pub async fn run(
    pool: PgPool,
    source: Arc<dyn MetricsSource>,
    period: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = period.as_secs(), "Metrics persistence started");

    let mut interval = ticker(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(snapshot) = sample(&source).await else {
                    continue;
                };

                let row = CreateSystemMetric::from_snapshot(&snapshot, Utc::now());
                match SystemMetricRepo::insert(&pool, &row).await {
                    Ok(stored) => tracing::trace!(id = stored.id, "Stored host metrics"),
                    Err(e) => tracing::error!(error = %e, "Failed to store host metrics"),
                }
            }
        }
    }

    tracing::info!("Metrics persistence stopped");
}

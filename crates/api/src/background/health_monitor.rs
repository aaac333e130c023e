//! Periodic health log line: pool load, hub fan-out and database reachability.

use std::sync::Arc;
use std::time::Duration;

use pulse_events::HubHandle;
use pulse_worker::JobPool;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::ticker;

pub async fn run(
    pool: PgPool,
    jobs: Arc<JobPool>,
    hub: HubHandle,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = ticker(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let db_healthy = pulse_db::health_check(&pool).await.is_ok();
                let pool_stats = jobs.stats();
                let hub_stats = hub.stats();

                tracing::info!(
                    db_healthy,
                    active_jobs = pool_stats.active,
                    queued_jobs = pool_stats.queued,
                    dropped_jobs = pool_stats.dropped,
                    completed_jobs = pool_stats.completed,
                    subscribers = hub_stats.subscribers,
                    published = hub_stats.published,
                    evicted = hub_stats.evicted,
                    "Health check",
                );
                if !db_healthy {
                    tracing::warn!("Database unreachable");
                }
            }
        }
    }

    tracing::debug!("Health monitor stopped");
}

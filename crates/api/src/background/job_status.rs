//! Periodic broadcast of the job pool's active count.

use std::sync::Arc;
use std::time::Duration;

use pulse_core::status::StatusMessage;
use pulse_events::HubHandle;
use pulse_worker::JobPool;
use tokio_util::sync::CancellationToken;

use super::{publish_status, ticker};

/// Publish `{"type":"job_status","active_jobs":N}` every `period` until
/// `cancel` fires or the hub stops.
pub async fn run(jobs: Arc<JobPool>, hub: HubHandle, period: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = period.as_secs_f64(), "Job status producer started");

    let mut interval = ticker(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let message = StatusMessage::JobStatus {
                    active_jobs: jobs.active_job_count(),
                };
                if publish_status(&hub, &message).await.is_err() {
                    tracing::warn!("Broadcast hub stopped; job status producer exiting");
                    break;
                }
            }
        }
    }

    tracing::info!("Job status producer stopped");
}

//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All tasks accept a [`CancellationToken`]
//! for graceful shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod demo_jobs;
pub mod health_monitor;
pub mod job_status;
pub mod metrics_persistence;
pub mod metrics_retention;
pub mod system_metrics;

use std::sync::Arc;
use std::time::Duration;

use pulse_agent::MetricsSource;
use pulse_core::metrics::SystemSnapshot;
use pulse_core::status::StatusMessage;
use pulse_events::{HubClosed, HubHandle};
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// A ticker whose first tick fires one full `period` from now.
fn ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Serialize and publish a status message.
///
/// Encoding failures are logged and swallowed; only a stopped hub is
/// reported to the caller.
async fn publish_status(hub: &HubHandle, message: &StatusMessage) -> Result<(), HubClosed> {
    match message.to_json_bytes() {
        Ok(bytes) => hub.publish(bytes).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode status message");
            Ok(())
        }
    }
}

/// Take a host sample off the async runtime. `None` when sampling failed;
/// the failure is already logged.
async fn sample(source: &Arc<dyn MetricsSource>) -> Option<SystemSnapshot> {
    let source = Arc::clone(source);
    match tokio::task::spawn_blocking(move || source.sample()).await {
        Ok(Ok(snapshot)) => Some(snapshot),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Host sampling failed");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Host sampling task panicked");
            None
        }
    }
}

//! Periodic broadcast of host resource usage with threshold alerts.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pulse_agent::MetricsSource;
use pulse_core::alert;
use pulse_core::status::StatusMessage;
use pulse_events::HubHandle;
use tokio_util::sync::CancellationToken;

use super::{publish_status, sample, ticker};

/// Sample the host every `period` and publish a `system_metrics` message.
///
/// A failed sample skips that tick; nothing is published for it.
pub async fn run(
    source: Arc<dyn MetricsSource>,
    hub: HubHandle,
    period: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = period.as_secs_f64(), "System metrics producer started");

    let mut interval = ticker(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(snapshot) = sample(&source).await else {
                    continue;
                };

                let alert = alert::evaluate(&snapshot);
                if let Some(text) = &alert {
                    tracing::warn!(
                        alert = %text,
                        cpu_usage = snapshot.cpu_usage,
                        memory_ratio = snapshot.memory_ratio(),
                        "Host threshold exceeded",
                    );
                }

                let message = StatusMessage::system_metrics(Utc::now(), snapshot, alert);
                if publish_status(&hub, &message).await.is_err() {
                    tracing::warn!("Broadcast hub stopped; system metrics producer exiting");
                    break;
                }
            }
        }
    }

    tracing::info!("System metrics producer stopped");
}

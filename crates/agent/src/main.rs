//! `pulse-agent` -- prints host metrics snapshots.
//!
//! Samples the local host on a fixed interval and writes one JSON
//! `system_metrics` message per line to stdout, in the same shape the API
//! server broadcasts to live viewers.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default | Description                   |
//! |------------------------|----------|---------|-------------------------------|
//! | `METRICS_INTERVAL_SECS`| no       | `5`     | Seconds between samples       |

use std::time::Duration;

use pulse_agent::{MetricsSource, SystemCollector};
use pulse_core::alert;
use pulse_core::status::StatusMessage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default interval between samples.
const DEFAULT_INTERVAL_SECS: u64 = 5;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only snapshots.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let interval_secs: u64 = std::env::var("METRICS_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Starting pulse-agent");

    let collector = SystemCollector::new();
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, stopping");
                break;
            }
            _ = interval.tick() => {
                let snapshot = match collector.sample() {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        tracing::warn!(error = %e, "Sampling failed; skipping");
                        continue;
                    }
                };

                let message = StatusMessage::system_metrics(
                    chrono::Utc::now(),
                    snapshot,
                    alert::evaluate(&snapshot),
                );
                match serde_json::to_string(&message) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::error!(error = %e, "Failed to encode snapshot"),
                }
            }
        }
    }
}

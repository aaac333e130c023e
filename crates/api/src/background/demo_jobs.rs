//! Startup feeder that exercises the job pool with synthetic work.

use std::sync::Arc;
use std::time::Duration;

use pulse_worker::{Job, JobIdSequence, JobPool, Submission};
use tokio_util::sync::CancellationToken;

/// Payload carried by every demo job.
pub const DEMO_PAYLOAD: &str = "Processing AI task";

/// Submit `count` demo jobs spaced `spacing` apart.
///
/// Jobs the pool drops are not retried. Stops early on cancellation or once
/// the pool reports it is closed.
pub async fn run(
    jobs: Arc<JobPool>,
    ids: JobIdSequence,
    count: u32,
    spacing: Duration,
    cancel: CancellationToken,
) {
    let mut accepted = 0u32;
    let mut dropped = 0u32;

    for _ in 0..count {
        match jobs.submit(Job::new(ids.next_id(), DEMO_PAYLOAD)) {
            Submission::Accepted => accepted += 1,
            Submission::Dropped => dropped += 1,
            Submission::Closed => break,
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(spacing) => {}
        }
    }

    tracing::info!(accepted, dropped, "Demo job feeder finished");
}

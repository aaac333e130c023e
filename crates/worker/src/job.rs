use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a job by its submitter.
pub type JobId = i64;

/// One unit of work. Immutable once created; the worker that dequeues it
/// takes ownership and drops it when execution finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub payload: String,
}

impl Job {
    pub fn new(id: JobId, payload: impl Into<String>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }
}

/// Shared monotonically increasing source of job ids, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct JobIdSequence(Arc<AtomicI64>);

impl JobIdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> JobId {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

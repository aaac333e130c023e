//! The side effect a worker performs for each job.

use std::time::Duration;

use async_trait::async_trait;

use crate::job::Job;

/// Executes a single job on behalf of a pool worker.
///
/// Handlers are shared by every worker, so they must be `Send + Sync`.
/// Execution is infallible from the pool's point of view: a handler that can
/// fail is expected to log the failure itself. Jobs are never retried.
#[async_trait]
pub trait JobHandler: Send + Sync + 'static {
    async fn handle(&self, job: Job);
}

/// Default handler: holds the worker for a fixed duration, standing in for
/// real work whose payload semantics the pool does not know about.
#[derive(Debug, Clone)]
pub struct SimulatedWork {
    duration: Duration,
}

impl SimulatedWork {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Default for SimulatedWork {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl JobHandler for SimulatedWork {
    async fn handle(&self, job: Job) {
        tracing::debug!(job_id = job.id, payload = %job.payload, "Processing job");
        tokio::time::sleep(self.duration).await;
    }
}

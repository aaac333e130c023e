//! Fixed-size worker pool over a bounded job queue.
//!
//! Lifecycle: [`JobPool::new`] -> [`JobPool::start`] -> any number of
//! [`JobPool::submit`] calls -> [`JobPool::stop`]. Workers are plain Tokio
//! tasks sharing one receiver; each waits for either the next job or the
//! shutdown token.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::handler::{JobHandler, SimulatedWork};
use crate::job::Job;

/// Outcome of a [`JobPool::submit`] call.
///
/// Purely informational: a dropped job is a normal backpressure event and
/// has already been logged by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The job is queued and will be executed exactly once.
    Accepted,
    /// The queue was at capacity; the job was discarded.
    Dropped,
    /// The pool has been stopped; the job was discarded.
    Closed,
}

/// Point-in-time counters for a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub worker_count: usize,
    pub capacity: usize,
    pub queued: usize,
    pub active: usize,
    pub accepted: u64,
    pub dropped: u64,
    pub completed: u64,
}

/// State shared between the pool handle and its workers.
struct Shared {
    queue: tokio::sync::Mutex<mpsc::Receiver<Job>>,
    /// Jobs currently executing. Locked only around increment/decrement.
    active: Mutex<usize>,
    handler: Arc<dyn JobHandler>,
    shutdown: CancellationToken,
    completed: AtomicU64,
}

impl Shared {
    /// Wait for the next queued job. `None` once the queue is closed and
    /// drained.
    async fn next_job(&self) -> Option<Job> {
        self.queue.lock().await.recv().await
    }

    fn begin_job(&self) -> ActiveGuard<'_> {
        *lock(&self.active) += 1;
        ActiveGuard { shared: self }
    }
}

/// Decrements the active count when a job finishes, including when the
/// handler panics.
struct ActiveGuard<'a> {
    shared: &'a Shared,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        *lock(&self.shared.active) -= 1;
    }
}

/// Bounded, non-blocking job dispatch pool.
pub struct JobPool {
    worker_count: usize,
    capacity: usize,
    /// `None` once [`stop`](Self::stop) has closed the queue.
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    accepted: AtomicU64,
    dropped: AtomicU64,
}

impl JobPool {
    /// Create a pool whose workers run [`SimulatedWork`] with its default
    /// duration. Workers are not started.
    ///
    /// # Panics
    ///
    /// Panics if `worker_count` or `capacity` is zero.
    pub fn new(worker_count: usize, capacity: usize) -> Self {
        Self::with_handler(worker_count, capacity, SimulatedWork::default())
    }

    /// Create a pool that executes jobs with the given handler.
    ///
    /// # Panics
    ///
    /// Panics if `worker_count` or `capacity` is zero.
    pub fn with_handler(worker_count: usize, capacity: usize, handler: impl JobHandler) -> Self {
        assert!(worker_count > 0, "job pool needs at least one worker");
        assert!(capacity > 0, "job queue capacity must be non-zero");

        let (tx, rx) = mpsc::channel(capacity);
        Self {
            worker_count,
            capacity,
            sender: Mutex::new(Some(tx)),
            shared: Arc::new(Shared {
                queue: tokio::sync::Mutex::new(rx),
                active: Mutex::new(0),
                handler: Arc::new(handler),
                shutdown: CancellationToken::new(),
                completed: AtomicU64::new(0),
            }),
            workers: Mutex::new(Vec::with_capacity(worker_count)),
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Spawn exactly `worker_count` worker tasks on the current runtime.
    ///
    /// Calling `start` on a running or stopped pool is a no-op.
    pub fn start(&self) {
        let mut workers = lock(&self.workers);
        if !workers.is_empty() || self.shared.shutdown.is_cancelled() {
            tracing::warn!("Job pool already started or stopped; ignoring start");
            return;
        }

        for worker in 0..self.worker_count {
            workers.push(tokio::spawn(run_worker(worker, Arc::clone(&self.shared))));
        }

        tracing::info!(
            workers = self.worker_count,
            capacity = self.capacity,
            "Job pool started",
        );
    }

    /// Enqueue a job without waiting.
    ///
    /// A full queue drops the job and logs a warning; the caller is never
    /// blocked. Jobs submitted after [`stop`](Self::stop) are never executed.
    pub fn submit(&self, job: Job) -> Submission {
        let sender = lock(&self.sender);
        let Some(sender) = sender.as_ref() else {
            tracing::warn!(job_id = job.id, "Job pool is stopped; rejecting job");
            return Submission::Closed;
        };

        match sender.try_send(job) {
            Ok(()) => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
                Submission::Accepted
            }
            Err(TrySendError::Full(job)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    job_id = job.id,
                    capacity = self.capacity,
                    "Job queue full; dropping job",
                );
                Submission::Dropped
            }
            Err(TrySendError::Closed(job)) => {
                tracing::warn!(job_id = job.id, "Job queue closed; rejecting job");
                Submission::Closed
            }
        }
    }

    /// Number of jobs executing right now.
    pub fn active_job_count(&self) -> usize {
        *lock(&self.shared.active)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        let queued = lock(&self.sender)
            .as_ref()
            .map(|tx| tx.max_capacity() - tx.capacity())
            .unwrap_or(0);

        PoolStats {
            worker_count: self.worker_count,
            capacity: self.capacity,
            queued,
            active: self.active_job_count(),
            accepted: self.accepted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            completed: self.shared.completed.load(Ordering::Relaxed),
        }
    }

    /// Close the queue, signal shutdown and wait for every worker to exit.
    ///
    /// Workers finish the job they are executing; jobs still queued are
    /// discarded. There is no internal deadline: callers that need one wrap
    /// this future in `tokio::time::timeout`. A second call is a no-op.
    pub async fn stop(&self) {
        let Some(sender) = lock(&self.sender).take() else {
            tracing::warn!("Job pool already stopped");
            return;
        };
        drop(sender);
        self.shared.shutdown.cancel();

        let workers = std::mem::take(&mut *lock(&self.workers));
        for handle in workers {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Job worker terminated abnormally");
            }
        }

        let mut discarded = 0usize;
        {
            let mut queue = self.shared.queue.lock().await;
            while queue.try_recv().is_ok() {
                discarded += 1;
            }
        }

        tracing::info!(discarded, "Job pool stopped");
    }
}

async fn run_worker(worker: usize, shared: Arc<Shared>) {
    tracing::debug!(worker, "Job worker started");

    loop {
        let next = tokio::select! {
            biased;
            () = shared.shutdown.cancelled() => None,
            job = shared.next_job() => job,
        };
        let Some(job) = next else {
            break;
        };

        let job_id = job.id;
        {
            let _active = shared.begin_job();
            tracing::debug!(worker, job_id, "Job started");
            shared.handler.handle(job).await;
        }
        shared.completed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(worker, job_id, "Job finished");
    }

    tracing::debug!(worker, "Job worker shutting down");
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Behavioural tests for `JobPool`: acceptance, drop-on-full backpressure,
//! the active-count bound and ordered shutdown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use pulse_worker::{Job, JobHandler, JobPool, Submission};
use tokio::sync::Semaphore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Handler that blocks each job until the test releases a permit, then
/// records the job id.
#[derive(Clone)]
struct GatedHandler {
    gate: Arc<Semaphore>,
    executed: Arc<Mutex<Vec<i64>>>,
}

impl GatedHandler {
    fn new() -> Self {
        Self {
            gate: Arc::new(Semaphore::new(0)),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn open() -> Self {
        let handler = Self::new();
        handler.release(1 << 20);
        handler
    }

    fn release(&self, permits: usize) {
        self.gate.add_permits(permits);
    }

    fn executed(&self) -> Vec<i64> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobHandler for GatedHandler {
    async fn handle(&self, job: Job) {
        self.gate.acquire().await.unwrap().forget();
        self.executed.lock().unwrap().push(job.id);
    }
}

/// Handler that records the highest number of jobs it saw running at once.
#[derive(Clone, Default)]
struct ConcurrencyProbe {
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

#[async_trait]
impl JobHandler for ConcurrencyProbe {
    async fn handle(&self, _job: Job) {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.running.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

/// Poll `condition` until it holds, failing the test after five seconds.
async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}

fn count(outcomes: &[Submission], wanted: Submission) -> usize {
    outcomes.iter().filter(|o| **o == wanted).count()
}

// ---------------------------------------------------------------------------
// Test: two workers, capacity three, six instant submissions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn excess_submissions_are_dropped_while_workers_are_busy() {
    let handler = GatedHandler::new();
    let pool = JobPool::with_handler(2, 3, handler.clone());
    pool.start();

    // No await between submissions: the workers have not dequeued anything.
    let outcomes: Vec<_> = (1..=6).map(|id| pool.submit(Job::new(id, "work"))).collect();

    assert_eq!(count(&outcomes, Submission::Accepted), 3);
    assert_eq!(count(&outcomes, Submission::Dropped), 3);

    wait_until(|| pool.active_job_count() == 2).await;
    assert_eq!(pool.active_job_count(), 2);

    handler.release(3);
    wait_until(|| handler.executed().len() == 3).await;
    wait_until(|| pool.active_job_count() == 0).await;

    let mut executed = handler.executed();
    executed.sort_unstable();
    assert_eq!(executed, vec![1, 2, 3]);

    let stats = pool.stats();
    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.dropped, 3);
    assert_eq!(stats.completed, 3);

    pool.stop().await;
}

// ---------------------------------------------------------------------------
// Test: submit never waits on a full queue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_returns_immediately_when_queue_is_full() {
    // Workers are never started, so nothing drains the queue.
    let pool = JobPool::with_handler(1, 2, GatedHandler::open());

    assert_matches!(pool.submit(Job::new(1, "a")), Submission::Accepted);
    assert_matches!(pool.submit(Job::new(2, "b")), Submission::Accepted);
    for id in 3..10 {
        assert_matches!(pool.submit(Job::new(id, "overflow")), Submission::Dropped);
    }

    let stats = pool.stats();
    assert_eq!(stats.queued, 2);
    assert_eq!(stats.dropped, 7);
}

// ---------------------------------------------------------------------------
// Test: every accepted job runs exactly once
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_accepted_job_executes_exactly_once() {
    let handler = GatedHandler::open();
    let pool = JobPool::with_handler(4, 64, handler.clone());
    pool.start();

    for id in 1..=64 {
        assert_eq!(pool.submit(Job::new(id, "batch")), Submission::Accepted);
    }

    wait_until(|| handler.executed().len() == 64).await;

    let mut executed = handler.executed();
    executed.sort_unstable();
    assert_eq!(executed, (1..=64).collect::<Vec<_>>());

    pool.stop().await;
}

// ---------------------------------------------------------------------------
// Test: active count never exceeds the worker count
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn active_count_is_bounded_by_worker_count() {
    let probe = ConcurrencyProbe::default();
    let pool = JobPool::with_handler(3, 40, probe.clone());
    pool.start();

    for id in 1..=40 {
        pool.submit(Job::new(id, "probe"));
    }

    while probe.finished.load(Ordering::SeqCst) < 40 {
        assert!(pool.active_job_count() <= pool.worker_count());
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert!(probe.peak.load(Ordering::SeqCst) <= 3);
    wait_until(|| pool.active_job_count() == 0).await;

    pool.stop().await;
}

// ---------------------------------------------------------------------------
// Test: stop() lets the running job finish and discards the rest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stop_waits_for_running_job_and_discards_queue() {
    let handler = GatedHandler::new();
    let pool = Arc::new(JobPool::with_handler(1, 5, handler.clone()));
    pool.start();

    for id in 1..=3 {
        pool.submit(Job::new(id, "slow"));
    }
    wait_until(|| pool.active_job_count() == 1).await;

    let stopping = tokio::spawn({
        let pool = Arc::clone(&pool);
        async move { pool.stop().await }
    });

    // Let the stop task raise the shutdown signal before the job completes.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!stopping.is_finished(), "stop must wait for the running job");

    handler.release(10);
    stopping.await.unwrap();

    assert_eq!(handler.executed(), vec![1]);
    assert_eq!(pool.active_job_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: nothing runs after stop(), even if submit is misused
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_after_stop_is_rejected_and_never_runs() {
    let handler = GatedHandler::open();
    let pool = JobPool::with_handler(2, 4, handler.clone());
    pool.start();

    pool.submit(Job::new(1, "before"));
    wait_until(|| handler.executed().len() == 1).await;

    pool.stop().await;

    assert_matches!(pool.submit(Job::new(2, "after")), Submission::Closed);
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(handler.executed(), vec![1]);
    assert_eq!(pool.stats().completed, 1);
}

// ---------------------------------------------------------------------------
// Test: lifecycle misuse is tolerated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_stop_and_restart_are_noops() {
    let pool = JobPool::with_handler(1, 1, GatedHandler::open());
    pool.start();
    pool.start();

    pool.stop().await;
    pool.stop().await;
    pool.start();

    assert_matches!(pool.submit(Job::new(1, "late")), Submission::Closed);
    assert_eq!(pool.active_job_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: the default handler simulates work with a delay
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn default_pool_runs_simulated_work() {
    let pool = JobPool::new(2, 10);
    pool.start();

    pool.submit(Job::new(1, "Processing AI task"));
    pool.submit(Job::new(2, "Processing AI task"));

    wait_until(|| pool.active_job_count() == 2).await;
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(pool.active_job_count(), 0);
    assert_eq!(pool.stats().completed, 2);

    pool.stop().await;
}

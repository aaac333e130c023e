//! Bounded job dispatch pool.
//!
//! A fixed set of Tokio worker tasks drains a bounded FIFO of [`Job`]s.
//! Submission never waits: when the queue is full the job is dropped and the
//! event is logged, so a slow pool can never build an unbounded backlog.

pub mod handler;
pub mod job;
pub mod pool;

pub use handler::{JobHandler, SimulatedWork};
pub use job::{Job, JobId, JobIdSequence};
pub use pool::{JobPool, PoolStats, Submission};

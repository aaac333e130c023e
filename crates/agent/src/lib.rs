//! `pulse-agent` library crate.
//!
//! Host metrics sampling shared by the API server's producers and the
//! standalone `pulse-agent` binary.

pub mod collector;

pub use collector::{MetricsSource, SampleError, SystemCollector};

//! Shared domain types for the Pulse status backend.
//!
//! Kept free of runtime and I/O dependencies so every other crate in the
//! workspace (pool, hub, agent, db, api) can depend on it.

pub mod alert;
pub mod error;
pub mod metrics;
pub mod status;
pub mod types;

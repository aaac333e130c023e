//! Messages broadcast to live viewers.
//!
//! The hub treats payloads as opaque bytes; this module owns the JSON shape
//! the dashboard expects. Every message carries a `type` discriminator.

use serde::{Deserialize, Serialize};

use crate::metrics::SystemSnapshot;
use crate::types::Timestamp;

/// A status update pushed to every subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusMessage {
    /// Number of jobs currently executing in the dispatch pool.
    JobStatus { active_jobs: usize },

    /// Host resource usage. `alert` is empty when no threshold is exceeded.
    SystemMetrics {
        timestamp: Timestamp,
        #[serde(flatten)]
        snapshot: SystemSnapshot,
        alert: String,
    },
}

impl StatusMessage {
    /// Build a metrics message, attaching the alert text (if any).
    pub fn system_metrics(
        timestamp: Timestamp,
        snapshot: SystemSnapshot,
        alert: Option<String>,
    ) -> Self {
        Self::SystemMetrics {
            timestamp,
            snapshot,
            alert: alert.unwrap_or_default(),
        }
    }

    /// Serialize to the JSON bytes sent over the wire.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

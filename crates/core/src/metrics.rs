//! Host metrics snapshot shared by the collector, the producers and the
//! persistence layer.

use serde::{Deserialize, Serialize};

/// One point-in-time reading of the host's resource usage.
///
/// Memory and disk figures are in bytes. `cpu_usage` is a percentage in
/// `0.0..=100.0` averaged across all cores; `load_avg` is the 1-minute
/// load average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub cpu_usage: f64,
    pub memory_used: u64,
    pub memory_total: u64,
    pub load_avg: f64,
    pub disk_used: u64,
    pub disk_total: u64,
}

impl SystemSnapshot {
    /// Fraction of memory in use, or `0.0` when the total is unknown.
    pub fn memory_ratio(&self) -> f64 {
        if self.memory_total == 0 {
            return 0.0;
        }
        self.memory_used as f64 / self.memory_total as f64
    }

    /// Fraction of the root filesystem in use, or `0.0` when unknown.
    pub fn disk_ratio(&self) -> f64 {
        if self.disk_total == 0 {
            return 0.0;
        }
        self.disk_used as f64 / self.disk_total as f64
    }
}

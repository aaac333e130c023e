//! Stored host metric snapshots (append-only time-series).

use pulse_core::metrics::SystemSnapshot;
use pulse_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `system_metrics` table.
///
/// Byte counts are stored as `BIGINT`; Postgres has no unsigned types.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemMetric {
    pub id: DbId,
    pub cpu_usage: f64,
    pub memory_used: i64,
    pub memory_total: i64,
    pub load_avg: f64,
    pub disk_used: i64,
    pub disk_total: i64,
    pub recorded_at: Timestamp,
}

/// DTO for inserting a new metric row.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSystemMetric {
    pub cpu_usage: f64,
    pub memory_used: i64,
    pub memory_total: i64,
    pub load_avg: f64,
    pub disk_used: i64,
    pub disk_total: i64,
    pub recorded_at: Timestamp,
}

impl CreateSystemMetric {
    /// Convert a collector snapshot, saturating byte counts at `i64::MAX`.
    pub fn from_snapshot(snapshot: &SystemSnapshot, recorded_at: Timestamp) -> Self {
        Self {
            cpu_usage: snapshot.cpu_usage,
            memory_used: to_bigint(snapshot.memory_used),
            memory_total: to_bigint(snapshot.memory_total),
            load_avg: snapshot.load_avg,
            disk_used: to_bigint(snapshot.disk_used),
            disk_total: to_bigint(snapshot.disk_total),
            recorded_at,
        }
    }
}

fn to_bigint(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}

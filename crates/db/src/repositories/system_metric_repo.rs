//! Repository for the `system_metrics` table (append-only time-series).

use pulse_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::system_metric::{CreateSystemMetric, SystemMetric};

/// Column list for `system_metrics` SELECT queries.
const COLUMNS: &str = "\
    id, cpu_usage, memory_used, memory_total, \
    load_avg, disk_used, disk_total, recorded_at";

/// Column list for INSERT statements (excludes the generated `id`).
const INSERT_COLUMNS: &str = "\
    cpu_usage, memory_used, memory_total, \
    load_avg, disk_used, disk_total, recorded_at";

/// Provides query operations for stored host metrics.
pub struct SystemMetricRepo;

impl SystemMetricRepo {
    /// Insert a single snapshot.
    pub async fn insert(
        pool: &PgPool,
        metric: &CreateSystemMetric,
    ) -> Result<SystemMetric, sqlx::Error> {
        let query = format!(
            "INSERT INTO system_metrics ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemMetric>(&query)
            .bind(metric.cpu_usage)
            .bind(metric.memory_used)
            .bind(metric.memory_total)
            .bind(metric.load_avg)
            .bind(metric.disk_used)
            .bind(metric.disk_total)
            .bind(metric.recorded_at)
            .fetch_one(pool)
            .await
    }

    /// The most recent `limit` rows, returned oldest first so they can be
    /// plotted directly.
    pub async fn get_recent(pool: &PgPool, limit: i64) -> Result<Vec<SystemMetric>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                SELECT {COLUMNS} FROM system_metrics \
                ORDER BY recorded_at DESC, id DESC \
                LIMIT $1 \
             ) recent \
             ORDER BY recorded_at ASC, id ASC"
        );
        sqlx::query_as::<_, SystemMetric>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete rows recorded before `cutoff`. Returns the number removed.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM system_metrics WHERE recorded_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

//! Integration tests for the `system_metrics` repository.
//!
//! Exercises insert, the "last N, oldest first" history query and the
//! retention purge against a real database.

use chrono::{Duration, TimeZone, Utc};
use pulse_core::types::Timestamp;
use pulse_db::models::system_metric::CreateSystemMetric;
use pulse_db::repositories::SystemMetricRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base_time() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
}

fn new_metric(recorded_at: Timestamp, cpu_usage: f64) -> CreateSystemMetric {
    CreateSystemMetric {
        cpu_usage,
        memory_used: 2048,
        memory_total: 8192,
        load_avg: 0.75,
        disk_used: 100,
        disk_total: 1000,
        recorded_at,
    }
}

async fn count_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM system_metrics")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: insert returns the stored row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_returns_stored_row(pool: PgPool) {
    let input = new_metric(base_time(), 42.5);

    let stored = SystemMetricRepo::insert(&pool, &input).await.unwrap();

    assert!(stored.id > 0);
    assert_eq!(stored.cpu_usage, 42.5);
    assert_eq!(stored.memory_used, 2048);
    assert_eq!(stored.memory_total, 8192);
    assert_eq!(stored.load_avg, 0.75);
    assert_eq!(stored.disk_used, 100);
    assert_eq!(stored.disk_total, 1000);
    assert_eq!(stored.recorded_at, base_time());
    assert_eq!(count_rows(&pool).await, 1);
}

// ---------------------------------------------------------------------------
// Test: get_recent keeps the newest rows and returns them oldest first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_recent_returns_latest_rows_ascending(pool: PgPool) {
    // Insert newest first so insertion order and time order disagree.
    for minute in (0..10).rev() {
        let at = base_time() + Duration::minutes(minute);
        SystemMetricRepo::insert(&pool, &new_metric(at, minute as f64))
            .await
            .unwrap();
    }

    let recent = SystemMetricRepo::get_recent(&pool, 4).await.unwrap();

    let minutes: Vec<f64> = recent.iter().map(|m| m.cpu_usage).collect();
    assert_eq!(minutes, vec![6.0, 7.0, 8.0, 9.0]);
    assert!(recent.windows(2).all(|w| w[0].recorded_at < w[1].recorded_at));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_recent_with_fewer_rows_than_limit_returns_all(pool: PgPool) {
    for minute in 0..3 {
        let at = base_time() + Duration::minutes(minute);
        SystemMetricRepo::insert(&pool, &new_metric(at, 1.0)).await.unwrap();
    }

    let recent = SystemMetricRepo::get_recent(&pool, 50).await.unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].recorded_at, base_time());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_recent_breaks_timestamp_ties_by_insertion(pool: PgPool) {
    let first = SystemMetricRepo::insert(&pool, &new_metric(base_time(), 1.0))
        .await
        .unwrap();
    let second = SystemMetricRepo::insert(&pool, &new_metric(base_time(), 2.0))
        .await
        .unwrap();

    let recent = SystemMetricRepo::get_recent(&pool, 1).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, second.id);

    let both = SystemMetricRepo::get_recent(&pool, 2).await.unwrap();
    let ids: Vec<i64> = both.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

// ---------------------------------------------------------------------------
// Test: delete_older_than removes only rows before the cutoff
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_older_than_respects_cutoff(pool: PgPool) {
    let cutoff = base_time() + Duration::hours(24);

    SystemMetricRepo::insert(&pool, &new_metric(cutoff - Duration::hours(2), 1.0))
        .await
        .unwrap();
    SystemMetricRepo::insert(&pool, &new_metric(cutoff - Duration::seconds(1), 2.0))
        .await
        .unwrap();
    // Exactly at the cutoff is kept.
    SystemMetricRepo::insert(&pool, &new_metric(cutoff, 3.0))
        .await
        .unwrap();
    SystemMetricRepo::insert(&pool, &new_metric(cutoff + Duration::hours(1), 4.0))
        .await
        .unwrap();

    let deleted = SystemMetricRepo::delete_older_than(&pool, cutoff).await.unwrap();
    assert_eq!(deleted, 2);

    let remaining = SystemMetricRepo::get_recent(&pool, 50).await.unwrap();
    let cpu: Vec<f64> = remaining.iter().map(|m| m.cpu_usage).collect();
    assert_eq!(cpu, vec![3.0, 4.0]);

    // A second purge finds nothing.
    assert_eq!(
        SystemMetricRepo::delete_older_than(&pool, cutoff).await.unwrap(),
        0
    );
}

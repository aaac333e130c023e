//! Handlers for stored host metrics.

use axum::extract::State;
use axum::Json;
use chrono::SecondsFormat;
use pulse_db::models::system_metric::SystemMetric;
use pulse_db::repositories::SystemMetricRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Rows returned by the history endpoint.
pub const HISTORY_LIMIT: i64 = 50;

/// One point of the CPU history chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    /// RFC 3339, whole seconds, UTC (`2025-03-01T12:00:00Z`).
    pub timestamp: String,
    pub cpu_usage: f64,
}

impl From<SystemMetric> for MetricPoint {
    fn from(metric: SystemMetric) -> Self {
        Self {
            timestamp: metric.recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            cpu_usage: metric.cpu_usage,
        }
    }
}

/// GET /api/metrics
///
/// The most recent stored snapshots, oldest first.
pub async fn recent_metrics(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<MetricPoint>>>> {
    let points = SystemMetricRepo::get_recent(&state.pool, HISTORY_LIMIT)
        .await?
        .into_iter()
        .map(MetricPoint::from)
        .collect();
    Ok(Json(ApiResponse::ok(
        "Historical system metrics fetched successfully",
        points,
    )))
}

pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// GET  /jobs/status     active job count
/// POST /jobs            submit a job
/// GET  /metrics         stored host metrics (last 50, ascending)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(handlers::jobs::submit_job))
        .route("/jobs/status", get(handlers::jobs::job_status))
        .route("/metrics", get(handlers::metrics::recent_metrics))
}

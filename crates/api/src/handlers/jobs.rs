//! Handlers for the job pool.
//!
//! Submission mirrors the pool's policy: the request never waits for queue
//! space. A full queue is reported as 503 so callers can retry later.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pulse_core::error::CoreError;
use pulse_worker::{Job, JobId, Submission};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub active_jobs: usize,
}

#[derive(Debug, Deserialize)]
pub struct SubmitJobRequest {
    pub payload: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub job_id: JobId,
}

/// GET /api/jobs/status
pub async fn job_status(State(state): State<AppState>) -> Json<ApiResponse<JobStatusResponse>> {
    Json(ApiResponse::ok(
        "Job status fetched successfully",
        JobStatusResponse {
            active_jobs: state.jobs.active_job_count(),
        },
    ))
}

/// POST /api/jobs
///
/// Returns 202 once the job is queued. Execution happens asynchronously.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(input): Json<SubmitJobRequest>,
) -> AppResult<impl IntoResponse> {
    if input.payload.trim().is_empty() {
        return Err(CoreError::Validation("payload must not be empty".into()).into());
    }

    let job_id = state.job_ids.next_id();
    match state.jobs.submit(Job::new(job_id, input.payload)) {
        Submission::Accepted => {
            tracing::info!(job_id, "Job accepted");
            Ok((
                StatusCode::ACCEPTED,
                Json(ApiResponse::ok("Job accepted", SubmitJobResponse { job_id })),
            ))
        }
        Submission::Dropped => Err(AppError::ServiceUnavailable(
            "Job queue is full; job dropped".into(),
        )),
        Submission::Closed => Err(AppError::ServiceUnavailable(
            "Job pool is shutting down".into(),
        )),
    }
}

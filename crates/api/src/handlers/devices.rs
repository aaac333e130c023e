//! Handlers for the `/devices` resource.

use axum::extract::State;
use axum::Json;
use pulse_db::models::device::Device;
use pulse_db::repositories::DeviceRepo;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /devices
pub async fn list_devices(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Device>>>> {
    let devices = DeviceRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok("Devices fetched successfully", devices)))
}

//! Shared response envelope for JSON endpoints.
//!
//! Every JSON response (success or failure) uses the same shape:
//! `{ "success": bool, "message": string, "data"?: T, "error"?: string }`.

use serde::Serialize;

/// Standard response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::ok("Devices fetched successfully", devices)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// A failure envelope carrying a machine-readable error code.
    pub fn failure(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(code.into()),
        }
    }
}

//! Message service error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse`
//! impl. Backend error details are logged server-side and replaced with a
//! generic message to avoid leaking internal details to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message service error type.
///
/// Maps to appropriate HTTP status codes:
/// - Validation, InvalidId: 400 Bad Request
/// - NotFound: 404 Not Found
/// - Backend: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum MsError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl MsError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            MsError::Validation(_) | MsError::InvalidId(_) => 400,
            MsError::NotFound(_) => 404,
            MsError::Backend(_) => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for MsError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            MsError::Validation(reason) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", reason.clone())
            }
            MsError::NotFound(resource) => (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone()),
            MsError::InvalidId(reason) => (StatusCode::BAD_REQUEST, "INVALID_ID", reason.clone()),
            MsError::Backend(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "ms.backend", error = %err, "Backend operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BACKEND_ERROR",
                    "An internal storage error occurred".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

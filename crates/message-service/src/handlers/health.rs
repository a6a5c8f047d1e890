//! Health check handler.
//!
//! Reports the aggregate health of every monitored subsystem, as last
//! observed by the health scanner task.

use crate::models::HealthResponse;
use crate::routes::AppState;
use crate::services::HealthStatus;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /v1/health
///
/// Returns the aggregate service health. A registry with no monitors is
/// vacuously healthy.
///
/// ## Response
///
/// - 200 with `{"status": "healthy"}` when every monitored subsystem is
///   healthy
/// - 500 with `{"status": "unhealthy"}` when any subsystem is unhealthy
#[instrument(skip_all, name = "ms.handlers.health")]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let status = state.health.aggregate_status().await;

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.as_str().to_string(),
        }),
    )
}

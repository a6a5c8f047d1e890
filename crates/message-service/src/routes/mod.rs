//! HTTP routes for the message service.
//!
//! Defines the Axum router and application state.

use crate::handlers;
use crate::repositories::MessageRepository;
use crate::services::HealthRegistry;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Message store selected at startup.
    pub repository: Arc<dyn MessageRepository>,

    /// Health registry polled by the health scanner task.
    pub health: Arc<HealthRegistry>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/v1/messages` - Message resource endpoints
/// - `/v1/health` - Aggregate health endpoint
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route(
            "/v1/messages",
            post(handlers::create_message).get(handlers::list_messages),
        )
        .route(
            "/v1/messages/:id",
            get(handlers::get_message_by_id)
                .put(handlers::update_message_by_id)
                .delete(handlers::delete_message_by_id),
        )
        .route("/v1/health", get(handlers::health_check))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    routes
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

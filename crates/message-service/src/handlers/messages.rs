//! Message resource handlers.
//!
//! Implements the message CRUD endpoints:
//!
//! - `POST /v1/messages` - Create a message
//! - `GET /v1/messages` - List all messages
//! - `GET /v1/messages/{id}` - Get a message by id
//! - `PUT /v1/messages/{id}` - Partially update a message by id
//! - `DELETE /v1/messages/{id}` - Delete a message by id
//!
//! Update requests merge field by field: a field missing from the body
//! is left unchanged, `null` (or an empty string) clears it, and a value
//! overwrites it.

use crate::errors::MsError;
use crate::models::{MessageRecord, MessageRequest};
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Handler for POST /v1/messages
///
/// Creates a new message and returns the created record, including the
/// backend-assigned id and the derived palindrome flag.
#[instrument(skip_all, name = "ms.handlers.messages.create")]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageRecord>, MsError> {
    request.validate().map_err(MsError::Validation)?;

    let record = state.repository.create_message(request).await?;

    info!(
        target: "ms.handlers.messages",
        id = %record.id,
        palindrome = record.palindrome,
        "Created message"
    );

    Ok(Json(record))
}

/// Handler for GET /v1/messages
///
/// Returns a list of all available messages. An empty repository yields
/// an empty JSON array.
#[instrument(skip_all, name = "ms.handlers.messages.list")]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageRecord>>, MsError> {
    let records = state.repository.list_messages().await?;

    Ok(Json(records))
}

/// Handler for GET /v1/messages/{id}
///
/// Returns a single message by id, or 404 if the id is unknown.
#[instrument(skip_all, name = "ms.handlers.messages.find", fields(id = %id))]
pub async fn get_message_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageRecord>, MsError> {
    let record = state.repository.find_message_by_id(&id).await?;

    Ok(Json(record))
}

/// Handler for PUT /v1/messages/{id}
///
/// Merges the request into an existing message and returns the new
/// record. The palindrome flag is recomputed when the content changed.
#[instrument(skip_all, name = "ms.handlers.messages.update", fields(id = %id))]
pub async fn update_message_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageRecord>, MsError> {
    request.validate().map_err(MsError::Validation)?;

    let record = state.repository.update_message_by_id(&id, request).await?;

    info!(
        target: "ms.handlers.messages",
        id = %record.id,
        palindrome = record.palindrome,
        "Updated message"
    );

    Ok(Json(record))
}

/// Handler for DELETE /v1/messages/{id}
///
/// Deletes a message by id. Returns 204 No Content on success, 404 if
/// the id is unknown.
#[instrument(skip_all, name = "ms.handlers.messages.delete", fields(id = %id))]
pub async fn delete_message_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, MsError> {
    state.repository.delete_message_by_id(&id).await?;

    info!(
        target: "ms.handlers.messages",
        id = %id,
        "Deleted message"
    );

    Ok(StatusCode::NO_CONTENT)
}

//! Message service models.
//!
//! Contains the message resource types, the tri-state field-update type
//! used for partial updates, and the palindrome calculator feeding the
//! derived `palindrome` attribute.

pub mod field;
pub mod message;
pub mod palindrome;

pub use field::FieldUpdate;
pub use message::{MessageRecord, MessageRequest, MAX_CONTENT_LENGTH, MIN_CONTENT_LENGTH};
pub use palindrome::is_palindrome;

use serde::{Deserialize, Serialize};

/// Health check response.
///
/// Returned by the `/v1/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Aggregate service health ("healthy" or "unhealthy").
    pub status: String,
}

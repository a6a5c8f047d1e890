//! Message resource models.
//!
//! A message is a word, sentence or phrase written by an author on a
//! specific date and time. The stored record carries a derived
//! `palindrome` flag computed from the content; neither the id nor the
//! flag is client-settable.

use crate::models::field::{string_update, time_update, FieldUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum content length in characters.
pub const MIN_CONTENT_LENGTH: usize = 1;

/// Maximum content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 256;

/// A message record as persisted and returned to clients.
///
/// Absent optional fields are omitted from JSON output, never rendered
/// as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Backend-assigned identifier; immutable once created.
    pub id: String,

    /// The content of the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// The author of the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// The date and time when the message was created.
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Whether the content is a palindrome. Derived from the content,
    /// never client-settable.
    pub palindrome: bool,
}

/// A create or partial-update request for a message.
///
/// Every field is tri-state: missing from the body leaves the stored
/// value alone, `null` (or the empty string for string fields) clears
/// it, and a value overwrites it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageRequest {
    /// The content of the message; 1-256 characters when supplied.
    #[serde(default, deserialize_with = "string_update")]
    pub content: FieldUpdate<String>,

    /// The author of the message.
    #[serde(default, deserialize_with = "string_update")]
    pub author: FieldUpdate<String>,

    /// The date and time when the message was created.
    #[serde(rename = "createdAt", default, deserialize_with = "time_update")]
    pub created_at: FieldUpdate<DateTime<Utc>>,
}

impl MessageRequest {
    /// Validate the request.
    ///
    /// A supplied content value must be 1-256 characters long; clearing
    /// or omitting content is not a validation concern at this level.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(content) = self.content.as_set() {
            let length = content.chars().count();
            if !(MIN_CONTENT_LENGTH..=MAX_CONTENT_LENGTH).contains(&length) {
                return Err(format!(
                    "Content must be between {} and {} characters long. Got {} instead",
                    MIN_CONTENT_LENGTH, MAX_CONTENT_LENGTH, length
                ));
            }
        }

        Ok(())
    }
}

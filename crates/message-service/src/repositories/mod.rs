//! Repository layer for the message store.
//!
//! Message records live behind the `MessageRepository` trait with two
//! implementations selected once at startup: an in-process map and a
//! MongoDB collection. Both apply the same tri-state merge and
//! palindrome recomputation rule through [`apply_update`].

pub mod memory;
pub mod mongo;

pub use memory::MemoryRepository;
pub use mongo::MongoRepository;

use crate::errors::MsError;
use crate::models::{is_palindrome, MessageRecord, MessageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository abstraction implemented by each storage backend.
///
/// All operations surface errors to the caller without internal retries.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Adds a new message record to the repository.
    async fn create_message(&self, request: MessageRequest) -> Result<MessageRecord, MsError>;

    /// Returns an existing message record, or `NotFound`.
    async fn find_message_by_id(&self, id: &str) -> Result<MessageRecord, MsError>;

    /// Returns all message records; an empty repository yields an empty
    /// collection, not an error.
    async fn list_messages(&self) -> Result<Vec<MessageRecord>, MsError>;

    /// Merges the request into an existing record, or `NotFound`.
    async fn update_message_by_id(
        &self,
        id: &str,
        request: MessageRequest,
    ) -> Result<MessageRecord, MsError>;

    /// Removes an existing message record, or `NotFound`.
    async fn delete_message_by_id(&self, id: &str) -> Result<(), MsError>;
}

/// Field values of a record after merging an update request, shared by
/// both backends.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MergedMessage {
    pub content: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub palindrome: bool,
}

/// Merges a request against the previously stored record (or against an
/// all-absent record on create) and recomputes the palindrome flag when
/// the content changed.
///
/// The flag is recomputed exactly when the record is new or the merged
/// content differs from the stored content; author- or createdAt-only
/// updates keep the stored flag. Cleared content yields the vacuous
/// `true` so the flag always reflects the content at rest.
pub(crate) fn apply_update(old: Option<&MessageRecord>, request: &MessageRequest) -> MergedMessage {
    let old_content = old.and_then(|record| record.content.as_ref());

    let content = request.content.merge(old_content);
    let author = request.author.merge(old.and_then(|r| r.author.as_ref()));
    let created_at = request.created_at.merge(old.and_then(|r| r.created_at.as_ref()));

    let palindrome = if old.is_none() || content.as_deref() != old_content.map(String::as_str) {
        // Content got a new value, calculating new palindrome state
        is_palindrome(content.as_deref().unwrap_or(""))
    } else {
        old.map(|record| record.palindrome).unwrap_or(false)
    };

    MergedMessage {
        content,
        author,
        created_at,
        palindrome,
    }
}

/// Rejects a create whose merged content is absent.
///
/// Content is required on create; an explicit clear (or no content at
/// all) fails fast here instead of computing a derived value from
/// nothing.
pub(crate) fn require_content(merged: &MergedMessage) -> Result<(), MsError> {
    if merged.content.is_none() {
        return Err(MsError::Validation("Content is required".to_string()));
    }

    Ok(())
}

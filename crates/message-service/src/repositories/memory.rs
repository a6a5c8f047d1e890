//! In-memory repository for use with demos and tests, mocking out a real
//! database. All records are lost when the instance restarts.

use crate::errors::MsError;
use crate::models::{MessageRecord, MessageRequest};
use crate::repositories::{apply_update, require_content, MessageRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::instrument;

/// In-memory message repository.
///
/// Identifiers are decimal renderings of an atomically incremented
/// counter, so concurrent creates always receive distinct sequential
/// ids. Record mutations happen under the map's write lock so each
/// merge-and-store is atomic per record.
pub struct MemoryRepository {
    message_id_counter: AtomicI64,
    messages: RwLock<HashMap<String, MessageRecord>>,
}

impl MemoryRepository {
    /// Initialize an empty repository.
    pub fn new() -> Self {
        Self {
            message_id_counter: AtomicI64::new(1),
            messages: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for MemoryRepository {
    #[instrument(skip_all, name = "ms.repository.memory.create")]
    async fn create_message(&self, request: MessageRequest) -> Result<MessageRecord, MsError> {
        let merged = apply_update(None, &request);
        require_content(&merged)?;

        let id = self
            .message_id_counter
            .fetch_add(1, Ordering::SeqCst)
            .to_string();

        let record = MessageRecord {
            id: id.clone(),
            content: merged.content,
            author: merged.author,
            created_at: merged.created_at,
            palindrome: merged.palindrome,
        };

        let mut messages = self.messages.write().await;
        messages.insert(id, record.clone());

        Ok(record)
    }

    #[instrument(skip_all, name = "ms.repository.memory.find", fields(id = %id))]
    async fn find_message_by_id(&self, id: &str) -> Result<MessageRecord, MsError> {
        let messages = self.messages.read().await;

        messages
            .get(id)
            .cloned()
            .ok_or_else(|| MsError::NotFound(format!("Message {} not found", id)))
    }

    #[instrument(skip_all, name = "ms.repository.memory.list")]
    async fn list_messages(&self) -> Result<Vec<MessageRecord>, MsError> {
        let messages = self.messages.read().await;

        Ok(messages.values().cloned().collect())
    }

    #[instrument(skip_all, name = "ms.repository.memory.update", fields(id = %id))]
    async fn update_message_by_id(
        &self,
        id: &str,
        request: MessageRequest,
    ) -> Result<MessageRecord, MsError> {
        // Write lock held across merge-and-store so the record mutates
        // atomically under concurrent updates.
        let mut messages = self.messages.write().await;

        let old = messages
            .get(id)
            .ok_or_else(|| MsError::NotFound(format!("Message {} not found", id)))?;

        let merged = apply_update(Some(old), &request);

        let record = MessageRecord {
            id: id.to_string(),
            content: merged.content,
            author: merged.author,
            created_at: merged.created_at,
            palindrome: merged.palindrome,
        };

        messages.insert(id.to_string(), record.clone());

        Ok(record)
    }

    #[instrument(skip_all, name = "ms.repository.memory.delete", fields(id = %id))]
    async fn delete_message_by_id(&self, id: &str) -> Result<(), MsError> {
        let mut messages = self.messages.write().await;

        messages
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MsError::NotFound(format!("Message {} not found", id)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::FieldUpdate;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn create_request(content: &str) -> MessageRequest {
        MessageRequest {
            content: FieldUpdate::Set(content.to_string()),
            ..MessageRequest::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_find_round_trip() {
        let repository = MemoryRepository::new();

        let created = repository
            .create_message(MessageRequest {
                content: FieldUpdate::Set("madam".to_string()),
                author: FieldUpdate::Set("anonymous".to_string()),
                ..MessageRequest::default()
            })
            .await
            .expect("create should succeed");

        assert_eq!(created.id, "1");
        assert!(created.palindrome);

        let found = repository
            .find_message_by_id(&created.id)
            .await
            .expect("find should succeed");

        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_requires_content() {
        let repository = MemoryRepository::new();

        let result = repository.create_message(MessageRequest::default()).await;
        assert!(matches!(result, Err(MsError::Validation(_))));

        let result = repository
            .create_message(MessageRequest {
                content: FieldUpdate::Clear,
                ..MessageRequest::default()
            })
            .await;
        assert!(matches!(result, Err(MsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_find_unknown_id_is_not_found() {
        let repository = MemoryRepository::new();

        let result = repository.find_message_by_id("42").await;
        assert!(matches!(result, Err(MsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_empty_repository_is_empty_collection() {
        let repository = MemoryRepository::new();

        let messages = repository.list_messages().await.expect("list should succeed");
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_list_returns_every_record() {
        let repository = MemoryRepository::new();

        repository
            .create_message(create_request("madam"))
            .await
            .expect("create should succeed");
        repository
            .create_message(create_request("racecar"))
            .await
            .expect("create should succeed");

        let messages = repository.list_messages().await.expect("list should succeed");
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_update_author_only_keeps_content_and_palindrome() {
        let repository = MemoryRepository::new();

        let created = repository
            .create_message(create_request("racecar"))
            .await
            .expect("create should succeed");

        let updated = repository
            .update_message_by_id(
                &created.id,
                MessageRequest {
                    author: FieldUpdate::Set("anonymous".to_string()),
                    ..MessageRequest::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.content.as_deref(), Some("racecar"));
        assert!(updated.palindrome);
        assert_eq!(updated.author.as_deref(), Some("anonymous"));
    }

    #[tokio::test]
    async fn test_update_content_flips_palindrome() {
        let repository = MemoryRepository::new();

        let created = repository
            .create_message(create_request("this is not a palindrome"))
            .await
            .expect("create should succeed");
        assert!(!created.palindrome);

        let updated = repository
            .update_message_by_id(&created.id, create_request("A man, a plan, a canal, Panama!"))
            .await
            .expect("update should succeed");

        assert!(updated.palindrome);

        let stored = repository
            .find_message_by_id(&created.id)
            .await
            .expect("find should succeed");
        assert!(stored.palindrome);
    }

    #[tokio::test]
    async fn test_update_clearing_content_removes_field() {
        let repository = MemoryRepository::new();

        let created = repository
            .create_message(create_request("this is not a palindrome"))
            .await
            .expect("create should succeed");

        let updated = repository
            .update_message_by_id(
                &created.id,
                MessageRequest {
                    content: FieldUpdate::Clear,
                    ..MessageRequest::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.content, None);
        assert!(updated.palindrome);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let repository = MemoryRepository::new();

        let result = repository
            .update_message_by_id("42", create_request("madam"))
            .await;
        assert!(matches!(result, Err(MsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let repository = MemoryRepository::new();

        let created = repository
            .create_message(create_request("madam"))
            .await
            .expect("create should succeed");

        repository
            .delete_message_by_id(&created.id)
            .await
            .expect("delete should succeed");

        let result = repository.find_message_by_id(&created.id).await;
        assert!(matches!(result, Err(MsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let repository = MemoryRepository::new();

        let result = repository.delete_message_by_id("42").await;
        assert!(matches!(result, Err(MsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_distinct_sequential_ids() {
        let repository = Arc::new(MemoryRepository::new());
        let caller_count = 32;

        let mut handles = Vec::with_capacity(caller_count);
        for _ in 0..caller_count {
            let repository = Arc::clone(&repository);
            handles.push(tokio::spawn(async move {
                repository
                    .create_message(create_request("madam"))
                    .await
                    .expect("create should succeed")
                    .id
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            let id = handle.await.expect("task should not panic");
            assert!(ids.insert(id), "ids must be unique");
        }

        // Sequential with no gaps: exactly 1..=N.
        for expected in 1..=caller_count {
            assert!(ids.contains(expected.to_string().as_str()));
        }
    }
}

//! MongoDB repository persisting message documents.
//!
//! Updates are a single atomic `findOneAndUpdate` round trip built from
//! per-field `$set`/`$unset` operators, so concurrent writers to the
//! same document cannot lose updates to a read-modify-write race. Every
//! driver call is bounded by the configured database timeout.

use crate::config::Config;
use crate::errors::MsError;
use crate::models::{MessageRecord, MessageRequest};
use crate::repositories::{apply_update, require_content, MergedMessage, MessageRepository};
use crate::services::HealthMonitor;
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::future::IntoFuture;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Name of the collection holding message documents.
const COLLECTION_NAME: &str = "messages";

/// A message as stored in the collection.
///
/// Absent optional fields are omitted from the document so that `$unset`
/// and "never set" are indistinguishable at rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageDocument {
    #[serde(rename = "_id")]
    id: ObjectId,

    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,

    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    created_at: Option<bson::DateTime>,

    palindrome: bool,
}

impl From<MessageDocument> for MessageRecord {
    fn from(document: MessageDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            content: document.content,
            author: document.author,
            created_at: document.created_at.map(bson::DateTime::to_chrono),
            palindrome: document.palindrome,
        }
    }
}

/// MongoDB-backed message repository.
pub struct MongoRepository {
    client: Client,
    database_name: String,
    operation_timeout: Duration,
}

impl MongoRepository {
    /// Connect to the database and verify the connection with a ping.
    ///
    /// A connection or ping failure here is a startup-fatal condition in
    /// the surrounding process; the repository does not retry.
    pub async fn connect(config: &Config) -> Result<Self, MsError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| MsError::Backend("Database URL is not configured".to_string()))?;

        let options = ClientOptions::parse(url)
            .await
            .map_err(|e| MsError::Backend(format!("Could not parse database URL: {}", e)))?;

        let client = Client::with_options(options)
            .map_err(|e| MsError::Backend(format!("Could not create database client: {}", e)))?;

        let repository = Self {
            client,
            database_name: config.database_name.clone(),
            operation_timeout: config.database_timeout(),
        };

        repository
            .bounded(async {
                repository
                    .client
                    .database(&repository.database_name)
                    .run_command(doc! { "ping": 1 })
                    .await
                    .map(|_| ())
            })
            .await?;

        info!(
            target: "ms.repository.mongo",
            database = %repository.database_name,
            "Database connection established"
        );

        Ok(repository)
    }

    /// Health monitor probing the database with a ping.
    pub fn health_monitor(&self, system_id: impl Into<String>) -> MongoHealthMonitor {
        MongoHealthMonitor {
            system_id: system_id.into(),
            client: self.client.clone(),
            database_name: self.database_name.clone(),
            operation_timeout: self.operation_timeout,
        }
    }

    fn collection(&self) -> Collection<MessageDocument> {
        self.client
            .database(&self.database_name)
            .collection(COLLECTION_NAME)
    }

    /// Run a driver call bounded by the configured database timeout.
    async fn bounded<T, F>(&self, operation: F) -> Result<T, MsError>
    where
        F: IntoFuture<Output = Result<T, mongodb::error::Error>>,
    {
        match tokio::time::timeout(self.operation_timeout, operation).await {
            Ok(result) => result.map_err(|e| MsError::Backend(e.to_string())),
            Err(_) => Err(MsError::Backend(
                "Database operation timed out".to_string(),
            )),
        }
    }
}

/// Parse a client-supplied identifier into an `ObjectId`.
///
/// A malformed id is a distinct error from a well-formed id that does
/// not exist.
fn parse_object_id(id: &str) -> Result<ObjectId, MsError> {
    ObjectId::parse_str(id)
        .map_err(|_| MsError::InvalidId(format!("Malformed message id: {}", id)))
}

/// Build the atomic update document for a merged record.
///
/// `palindrome` is always `$set`; the other fields are `$set` when the
/// merged value is present and `$unset` when it is absent. This is the
/// only shape a single-round-trip atomic update supports.
fn build_update_document(merged: &MergedMessage) -> Document {
    let mut set = doc! { "palindrome": merged.palindrome };
    let mut unset = Document::new();

    match &merged.content {
        Some(content) => set.insert("content", content.clone()),
        None => unset.insert("content", ""),
    };

    match &merged.author {
        Some(author) => set.insert("author", author.clone()),
        None => unset.insert("author", ""),
    };

    match merged.created_at {
        Some(created_at) => set.insert("createdAt", bson::DateTime::from_chrono(created_at)),
        None => unset.insert("createdAt", ""),
    };

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }

    update
}

#[async_trait]
impl MessageRepository for MongoRepository {
    #[instrument(skip_all, name = "ms.repository.mongo.create")]
    async fn create_message(&self, request: MessageRequest) -> Result<MessageRecord, MsError> {
        let merged = apply_update(None, &request);
        require_content(&merged)?;

        let document = MessageDocument {
            id: ObjectId::new(),
            content: merged.content,
            author: merged.author,
            created_at: merged.created_at.map(bson::DateTime::from_chrono),
            palindrome: merged.palindrome,
        };

        let collection = self.collection();
        self.bounded(async { collection.insert_one(&document).await.map(|_| ()) })
            .await?;

        debug!(
            target: "ms.repository.mongo",
            id = %document.id,
            "Created message"
        );

        Ok(document.into())
    }

    #[instrument(skip_all, name = "ms.repository.mongo.find", fields(id = %id))]
    async fn find_message_by_id(&self, id: &str) -> Result<MessageRecord, MsError> {
        let object_id = parse_object_id(id)?;

        let collection = self.collection();
        let document = self
            .bounded(collection.find_one(doc! { "_id": object_id }))
            .await?;

        document
            .map(MessageRecord::from)
            .ok_or_else(|| MsError::NotFound(format!("Message {} not found", id)))
    }

    #[instrument(skip_all, name = "ms.repository.mongo.list")]
    async fn list_messages(&self) -> Result<Vec<MessageRecord>, MsError> {
        let collection = self.collection();
        let documents: Vec<MessageDocument> = self
            .bounded(async {
                let cursor = collection.find(doc! {}).await?;
                cursor.try_collect().await
            })
            .await?;

        Ok(documents.into_iter().map(MessageRecord::from).collect())
    }

    #[instrument(skip_all, name = "ms.repository.mongo.update", fields(id = %id))]
    async fn update_message_by_id(
        &self,
        id: &str,
        request: MessageRequest,
    ) -> Result<MessageRecord, MsError> {
        let object_id = parse_object_id(id)?;

        // The stored record is needed to merge tri-state fields; the
        // write itself stays a single atomic command.
        let old = self.find_message_by_id(id).await?;
        let merged = apply_update(Some(&old), &request);
        let update = build_update_document(&merged);

        let collection = self.collection();
        let updated = self
            .bounded(
                collection
                    .find_one_and_update(doc! { "_id": object_id }, update)
                    .return_document(ReturnDocument::After),
            )
            .await?;

        updated
            .map(MessageRecord::from)
            .ok_or_else(|| MsError::NotFound(format!("Message {} not found", id)))
    }

    #[instrument(skip_all, name = "ms.repository.mongo.delete", fields(id = %id))]
    async fn delete_message_by_id(&self, id: &str) -> Result<(), MsError> {
        let object_id = parse_object_id(id)?;

        let collection = self.collection();
        let result = self
            .bounded(collection.delete_one(doc! { "_id": object_id }))
            .await?;

        if result.deleted_count == 0 {
            return Err(MsError::NotFound(format!("Message {} not found", id)));
        }

        Ok(())
    }
}

/// Health monitor for the MongoDB connection.
pub struct MongoHealthMonitor {
    system_id: String,
    client: Client,
    database_name: String,
    operation_timeout: Duration,
}

#[async_trait]
impl HealthMonitor for MongoHealthMonitor {
    fn system_id(&self) -> &str {
        &self.system_id
    }

    async fn is_healthy(&self) -> bool {
        let db = self.client.database(&self.database_name);
        let ping = db.run_command(doc! { "ping": 1 });

        match tokio::time::timeout(self.operation_timeout, ping).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(
                    target: "ms.health",
                    system_id = %self.system_id,
                    error = %e,
                    "Could not ping database"
                );
                false
            }
            Err(_) => {
                debug!(
                    target: "ms.health",
                    system_id = %self.system_id,
                    "Database ping timed out"
                );
                false
            }
        }
    }
}

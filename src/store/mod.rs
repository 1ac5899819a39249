//! Record store adapters.
//!
//! [`RecordStore`] is the seam between the services and persistence. Two
//! adapters ship with the crate: [`FileRecordStore`] keeps one JSON file per
//! document, [`MemoryRecordStore`] keeps everything in process memory.

pub mod document_store;
pub mod hash;
pub mod memory;
pub mod storage;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

pub use document_store::FileRecordStore;
pub use hash::new_document_id;
pub use memory::MemoryRecordStore;
pub use storage::LocalFileStorage;

/// A schema-less stored document.
pub type Document = Map<String, Value>;

/// Equality filter: every key must be present in the document with an equal value.
pub type Filter = Map<String, Value>;

pub const ID_FIELD: &str = "_id";
pub const CREATED_AT_FIELD: &str = "created_at";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid collection name: {0:?}")]
    InvalidCollection(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store name, as configured by `DATABASE_NAME`.
    fn name(&self) -> &str;

    /// Insert `document` into `collection` and return the assigned id.
    async fn create(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    /// Return at most `limit` documents of `collection` matching `filter`.
    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Names of the collections currently holding documents, sorted.
    async fn collections(&self) -> Result<Vec<String>, StoreError>;
}

pub fn matches_filter(document: &Document, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

pub fn validate_collection(collection: &str) -> Result<(), StoreError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(collection.to_string()))
    }
}

/// Assign `_id` and stamp `created_at` unless the caller already set one.
pub(crate) fn stamp_document(document: &mut Document, id: &str, now: DateTime<Utc>) {
    document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    if !document.contains_key(CREATED_AT_FIELD) {
        document.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
    }
}

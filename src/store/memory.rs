use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::store::{
    Document, Filter, RecordStore, StoreError, matches_filter, new_document_id, stamp_document,
    validate_collection,
};

/// Process-local store selected with `DATABASE_URL=memory://`. Contents are lost on exit.
pub struct MemoryRecordStore {
    name: String,
    collections: RwLock<HashMap<String, Vec<Document>>>,
    sequence: AtomicU64,
}

impl MemoryRecordStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        validate_collection(collection)?;
        let now = Utc::now();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let id = new_document_id(collection, now, sequence, &document);
        stamp_document(&mut document, &id, now);
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        validate_collection(collection)?;
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(documents
            .iter()
            .rev()
            .filter(|document| matches_filter(document, filter))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn collections(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

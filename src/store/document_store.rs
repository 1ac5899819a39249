use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::store::{
    Document, Filter, LocalFileStorage, RecordStore, StoreError, matches_filter, new_document_id,
    stamp_document, validate_collection,
};

const DOCUMENT_EXT: &str = "json";

/// One pretty-printed JSON file per document under
/// `<root>/<name>/<collection>/<timestamp>_<sequence>_<id>.json`.
pub struct FileRecordStore {
    storage: LocalFileStorage,
    name: String,
    sequence: AtomicU64,
}

impl FileRecordStore {
    pub fn new(root: PathBuf, name: impl Into<String>) -> Self {
        Self {
            storage: LocalFileStorage::new(root),
            name: name.into(),
            sequence: AtomicU64::new(0),
        }
    }

    fn collection_dir(&self, collection: &str) -> String {
        format!("{}/{}", self.name, collection)
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        validate_collection(collection)?;
        let now = Utc::now();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let id = new_document_id(collection, now, sequence, &document);
        stamp_document(&mut document, &id, now);

        // Fixed-width timestamp prefix keeps file names in insertion order.
        let stamp = now.format("%Y%m%dT%H%M%S%.9fZ");
        let key = format!(
            "{}/{stamp}_{sequence:020}_{id}.{DOCUMENT_EXT}",
            self.collection_dir(collection)
        );
        let payload = serde_json::to_vec_pretty(&document)?;
        self.storage.put(&key, &payload).await?;
        debug!(collection, id = %id, "document written");
        Ok(id)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        validate_collection(collection)?;
        let dir = self.collection_dir(collection);
        let mut names = self.storage.list_files(&dir, DOCUMENT_EXT).await?;
        names.sort_by(|a, b| b.cmp(a));

        let mut documents = Vec::new();
        for name in names {
            if documents.len() >= limit {
                break;
            }
            let key = format!("{dir}/{name}");
            let Some(bytes) = self.storage.get(&key).await? else {
                continue;
            };
            match serde_json::from_slice::<Document>(&bytes) {
                Ok(document) if matches_filter(&document, filter) => documents.push(document),
                Ok(_) => {}
                Err(err) => warn!(file = %name, error = %err, "skipping unreadable document"),
            }
        }
        Ok(documents)
    }

    async fn collections(&self) -> Result<Vec<String>, StoreError> {
        let mut names = self.storage.list_dirs(&self.name).await?;
        names.retain(|name| validate_collection(name).is_ok());
        names.sort();
        Ok(names)
    }
}

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::generation::record::StoredGeneration;
use crate::generation::{GENERATION_COLLECTION, GenerationRecord};
use crate::store::{Filter, ID_FIELD, RecordStore, StoreError};

pub const DEFAULT_LIST_LIMIT: usize = 20;

pub struct ListingService {
    store: Arc<dyn RecordStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` stored generations in store order. Zero is treated as one.
    ///
    /// A document that cannot be mapped to a [`GenerationRecord`] fails the
    /// whole listing with a storage error.
    pub async fn list(&self, limit: usize) -> Result<Vec<GenerationRecord>, ServiceError> {
        let limit = limit.max(1);
        let documents = self
            .store
            .query(GENERATION_COLLECTION, &Filter::new(), limit)
            .await?;

        let now = Utc::now();
        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            let id = document
                .get(ID_FIELD)
                .and_then(|value| value.as_str())
                .unwrap_or("?")
                .to_string();
            let stored = StoredGeneration::from_document(document).map_err(|err| {
                warn!(id = %id, error = %err, "malformed generation document");
                StoreError::Serialization(err)
            })?;
            records.push(stored.into_record(now));
        }
        debug!(count = records.len(), limit, "generations listed");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{DEFAULT_IMAGE_BASE_URL, GenerationService, ImageUrlTemplate};
    use crate::store::{Document, MemoryRecordStore};
    use crate::test_support::{FailingStore, FixedStore};
    use serde_json::{Value, json};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn seeded(count: usize) -> Arc<MemoryRecordStore> {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let generator = GenerationService::new(
            store.clone(),
            ImageUrlTemplate::new(DEFAULT_IMAGE_BASE_URL).unwrap(),
        );
        for index in 0..count {
            generator
                .generate(Some(&format!("prompt number {index}")), None, None)
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn limit_caps_the_result() {
        let store = seeded(5).await;
        let records = ListingService::new(store).list(2).await.unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(!record.id.is_empty());
            assert!(record.prompt.starts_with("prompt number"));
            assert_eq!((record.width, record.height), (1024, 1024));
        }
    }

    #[tokio::test]
    async fn zero_limit_returns_one() {
        let store = seeded(3).await;
        let records = ListingService::new(store).list(0).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn generated_record_round_trips() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let generator = GenerationService::new(
            store.clone(),
            ImageUrlTemplate::new(DEFAULT_IMAGE_BASE_URL).unwrap(),
        );
        let created = generator
            .generate(Some("a cat in space"), Some("watercolor"), Some("portrait"))
            .await
            .unwrap();

        let listed = ListingService::new(store).list(DEFAULT_LIST_LIMIT).await.unwrap();
        let found = listed.iter().find(|record| record.id == created.id).unwrap();
        assert_eq!(found.prompt, created.prompt);
        assert_eq!(found.style, created.style);
        assert_eq!(found.size, created.size);
        assert_eq!(found.image_url, created.image_url);
        assert_eq!((found.width, found.height), (created.width, created.height));
    }

    #[tokio::test]
    async fn missing_created_at_falls_back_to_now() {
        let store = Arc::new(FixedStore(vec![
            doc(json!({"_id": "a", "prompt": "new", "image_url": "u"})),
            doc(json!({"_id": "b", "prompt": "old", "image_url": "u", "created_at": "2020-01-01T00:00:00Z"})),
        ]));
        let before = Utc::now();
        let records = ListingService::new(store).list(10).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].created_at >= before);
        assert_eq!(records[1].created_at.to_rfc3339(), "2020-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn malformed_newest_document_fails_the_listing() {
        let store = seeded(2).await;
        store
            .create(GENERATION_COLLECTION, doc(json!({"prompt": "no url"})))
            .await
            .unwrap();
        let err = ListingService::new(store).list(2).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn unparseable_created_at_falls_back_to_now() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        store
            .create(
                GENERATION_COLLECTION,
                doc(json!({"prompt": "sun", "image_url": "u", "created_at": 1714564800})),
            )
            .await
            .unwrap();
        let before = Utc::now();
        let records = ListingService::new(store).list(5).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prompt, "sun");
        assert!(records[0].created_at >= before);
    }

    #[tokio::test]
    async fn query_failure_is_storage_error() {
        let err = ListingService::new(Arc::new(FailingStore))
            .list(DEFAULT_LIST_LIMIT)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }
}

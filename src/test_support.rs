//! Record store doubles shared by unit tests.

use async_trait::async_trait;

use crate::store::{Document, Filter, RecordStore, StoreError};

/// Fails every call.
pub struct FailingStore;

#[async_trait]
impl RecordStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn create(&self, _collection: &str, _document: Document) -> Result<String, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn query(
        &self,
        _collection: &str,
        _filter: &Filter,
        _limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn collections(&self) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Returns its documents verbatim from every query, without stamping.
pub struct FixedStore(pub Vec<Document>);

#[async_trait]
impl RecordStore for FixedStore {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn create(&self, _collection: &str, _document: Document) -> Result<String, StoreError> {
        Err(StoreError::Unavailable("read only".into()))
    }

    async fn query(
        &self,
        _collection: &str,
        _filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }

    async fn collections(&self) -> Result<Vec<String>, StoreError> {
        Ok(vec!["generation".to_string()])
    }
}

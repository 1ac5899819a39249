use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::error::ServiceError;
use crate::generation::{
    GENERATION_COLLECTION, GenerateRequest, GenerationRecord, ImageSize, ImageUrlTemplate,
    NewGeneration, build_seed,
};
use crate::store::RecordStore;

pub const MIN_PROMPT_CHARS: usize = 3;

pub struct GenerationService {
    store: Arc<dyn RecordStore>,
    template: ImageUrlTemplate,
}

impl GenerationService {
    pub fn new(store: Arc<dyn RecordStore>, template: ImageUrlTemplate) -> Self {
        Self { store, template }
    }

    pub async fn generate(
        &self,
        prompt: Option<&str>,
        style: Option<&str>,
        size: Option<&str>,
    ) -> Result<GenerationRecord, ServiceError> {
        let generation = self.prepare(prompt, style, size)?;
        let id = self
            .store
            .create(GENERATION_COLLECTION, generation.to_document())
            .await?;
        info!(id = %id, size = generation.size.keyword(), "generation stored");
        Ok(generation.into_record(id, Utc::now()))
    }

    pub async fn generate_from(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerationRecord, ServiceError> {
        self.generate(
            request.prompt.as_deref(),
            request.style.as_deref(),
            request.size.as_deref(),
        )
        .await
    }

    /// Validation and derivation without touching the store.
    pub fn prepare(
        &self,
        prompt: Option<&str>,
        style: Option<&str>,
        size: Option<&str>,
    ) -> Result<NewGeneration, ServiceError> {
        let prompt = prompt.map(str::trim).unwrap_or_default();
        if prompt.chars().count() < MIN_PROMPT_CHARS {
            return Err(ServiceError::InvalidInput("Prompt is too short".to_string()));
        }
        let style = style.map(str::trim).filter(|value| !value.is_empty());
        let size = ImageSize::from_keyword(size);
        let (width, height) = size.dimensions();
        let seed = build_seed(prompt, style);
        let image_url = self.template.render(&seed, width, height);

        Ok(NewGeneration {
            prompt: prompt.to_string(),
            style: style.map(str::to_string),
            size,
            image_url,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::DEFAULT_IMAGE_BASE_URL;
    use crate::store::{Filter, MemoryRecordStore};
    use crate::test_support::FailingStore;

    fn service(store: Arc<dyn RecordStore>) -> GenerationService {
        GenerationService::new(store, ImageUrlTemplate::new(DEFAULT_IMAGE_BASE_URL).unwrap())
    }

    #[tokio::test]
    async fn portrait_watercolor_scenario() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let record = service(store.clone())
            .generate(Some("a cat in space"), Some("watercolor"), Some("portrait"))
            .await
            .unwrap();

        assert_eq!((record.width, record.height), (768, 1024));
        assert!(record.image_url.contains("a%20cat%20in%20space-watercolor"));
        assert!(record.image_url.ends_with("/768/1024"));
        assert_eq!(record.size, "portrait");
        assert!(!record.id.is_empty());

        let stored = store
            .query(GENERATION_COLLECTION, &Filter::new(), 10)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["size"], "portrait");
        assert_eq!(stored[0]["_id"], record.id.as_str());
    }

    #[tokio::test]
    async fn short_prompts_are_rejected_without_persisting() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let service = service(store.clone());
        for prompt in [None, Some(""), Some("hi"), Some("ok"), Some("   ab   "), Some(" \t\n")] {
            let err = service.generate(prompt, None, None).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)), "prompt {prompt:?}");
        }
        assert_eq!(store.len(GENERATION_COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn short_prompt_never_reaches_a_broken_store() {
        let service = service(Arc::new(FailingStore));
        let err = service.generate(Some("hi"), None, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn size_defaults_to_square() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let record = service(store).generate(Some("sun"), None, None).await.unwrap();
        assert_eq!(record.size, "square");
        assert_eq!((record.width, record.height), (1024, 1024));
        assert_eq!(record.image_url, "https://picsum.photos/seed/sun/1024/1024");
    }

    #[tokio::test]
    async fn unknown_size_is_stored_as_square() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let record = service(store).generate(Some("sun"), None, Some("huge")).await.unwrap();
        assert_eq!(record.size, "square");
        assert_eq!((record.width, record.height), (1024, 1024));
    }

    #[tokio::test]
    async fn prompt_and_style_are_trimmed() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let record = service(store.clone())
            .generate(Some("  sunset  "), Some("  noir "), Some("landscape"))
            .await
            .unwrap();
        assert_eq!(record.prompt, "sunset");
        assert_eq!(record.style.as_deref(), Some("noir"));
        assert_eq!(record.image_url, "https://picsum.photos/seed/sunset-noir/1024/640");

        let stored = store
            .query(GENERATION_COLLECTION, &Filter::new(), 1)
            .await
            .unwrap();
        assert_eq!(stored[0]["prompt"], "sunset");
        assert_eq!(stored[0]["style"], "noir");
    }

    #[tokio::test]
    async fn blank_style_is_null() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let record = service(store)
            .generate(Some("sunset"), Some("   "), None)
            .await
            .unwrap();
        assert_eq!(record.style, None);
        assert_eq!(record.image_url, "https://picsum.photos/seed/sunset/1024/1024");
    }

    #[tokio::test]
    async fn same_inputs_same_url() {
        let store = Arc::new(MemoryRecordStore::new("test"));
        let service = service(store);
        let first = service
            .generate(Some("a quiet harbor"), Some("ink"), Some("portrait"))
            .await
            .unwrap();
        let second = service
            .generate(Some("a quiet harbor"), Some("ink"), Some("portrait"))
            .await
            .unwrap();
        assert_eq!(first.image_url, second.image_url);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn storage_failure_fails_the_request() {
        let service = service(Arc::new(FailingStore));
        let err = service
            .generate(Some("a cat in space"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn prompt_length_counts_characters() {
        let service = service(Arc::new(MemoryRecordStore::new("test")));
        assert!(service.prepare(Some("日本"), None, None).is_err());
        assert!(service.prepare(Some("日本語"), None, None).is_ok());
    }
}

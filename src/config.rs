//! Server configuration, read from environment variables at startup.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::generation::{DEFAULT_IMAGE_BASE_URL, ImageUrlTemplate};
use crate::store::{FileRecordStore, MemoryRecordStore, RecordStore};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_NAME: &str = "prompt-canvas";

#[derive(Debug, Clone)]
pub struct Config {
    /// `PORT`, bound on all interfaces.
    pub port: u16,
    /// `DATABASE_URL`: `memory://`, `file://<path>` or a bare path.
    pub database_url: Option<String>,
    /// `DATABASE_NAME`, when set.
    pub database_name: Option<String>,
    /// `IMAGE_BASE_URL`: root of the placeholder image service.
    pub image_base_url: String,
    /// `LOG_LEVEL`, a `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// `LOG_JSON`: emit newline-delimited JSON logs.
    pub log_json: bool,
}

/// Where documents live, derived from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Directory(PathBuf),
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            port: get("PORT")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url: get("DATABASE_URL"),
            database_name: get("DATABASE_NAME"),
            image_base_url: get("IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: get("LOG_JSON")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn store_name(&self) -> &str {
        self.database_name.as_deref().unwrap_or(DEFAULT_DATABASE_NAME)
    }

    pub fn store_location(&self) -> Result<StoreLocation> {
        let Some(raw) = self.database_url.as_deref().map(str::trim) else {
            return Ok(StoreLocation::Directory(default_data_dir()));
        };
        if raw == "memory://" || raw == "memory" {
            return Ok(StoreLocation::Memory);
        }
        if let Some(path) = raw.strip_prefix("file://") {
            if path.is_empty() {
                return Err(anyhow!("DATABASE_URL file:// needs a path"));
            }
            return Ok(StoreLocation::Directory(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = raw.split_once("://") {
            return Err(anyhow!("unsupported DATABASE_URL scheme: {scheme}"));
        }
        Ok(StoreLocation::Directory(PathBuf::from(raw)))
    }

    pub fn open_store(&self) -> Result<Arc<dyn RecordStore>> {
        let store: Arc<dyn RecordStore> = match self.store_location()? {
            StoreLocation::Memory => Arc::new(MemoryRecordStore::new(self.store_name())),
            StoreLocation::Directory(root) => {
                Arc::new(FileRecordStore::new(root, self.store_name()))
            }
        };
        Ok(store)
    }

    pub fn image_template(&self) -> Result<ImageUrlTemplate> {
        Ok(ImageUrlTemplate::new(&self.image_base_url)?)
    }
}

fn default_data_dir() -> PathBuf {
    let mut base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("./data"));
    base.push(DEFAULT_DATABASE_NAME);
    base
}

//! Persistence boundary
//!
//! Everything the crate stores goes through a [`BlobStore`]: a flat map from
//! well-known keys to serialized text documents.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::StorageConfig;
use crate::errors::{LinkstashError, Result};

pub mod file;
pub mod link_store;
pub mod memory;
pub mod models;
pub mod timestamp;

pub use file::FileBlobStore;
pub use link_store::LinkStore;
pub use memory::MemoryBlobStore;
pub use models::{ClickEvent, DIRECT_SOURCE, LinkRecord, UNKNOWN_LOCATION};

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Reads the document stored under `key`; `None` when nothing was written.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the document stored under `key`.
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn BlobStore>> {
        let store: Arc<dyn BlobStore> = match config.backend.as_str() {
            "file" => Arc::new(FileBlobStore::new(&config.data_dir)),
            "memory" => Arc::new(MemoryBlobStore::new()),
            other => {
                return Err(LinkstashError::config(format!(
                    "Unknown storage backend '{}'. Valid: file, memory",
                    other
                )));
            }
        };

        info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}

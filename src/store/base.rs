use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{file_store::FileStorage, memory_store::MemoryStorage};
use crate::config::StoreConfig;

/// Fixed keys the client persists under.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const THEME: &str = "theme";
    pub const LANGUAGE: &str = "i18nextLng";
}

/// The Storage trait abstracts a durable string key-value store
/// (get, set, remove), the way a browser exposes localStorage.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, String>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    async fn remove_item(&self, key: &str) -> Result<(), String>;

    /// Remove several keys. Backends may override to do it in one write.
    async fn remove_items(&self, keys: &[&str]) -> Result<(), String> {
        for key in keys {
            self.remove_item(key).await?;
        }
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

/// Creates a concrete storage backend from the StoreConfig.
pub fn create_storage(config: &StoreConfig) -> Arc<dyn Storage> {
    match config {
        StoreConfig::Memory => {
            info!("Using in-memory storage; tokens will not survive this process.");
            Arc::new(MemoryStorage::new())
        }
        StoreConfig::File(file_config) => {
            let path = file_config.resolved_path();
            info!(path = %path.display(), "Using file storage.");
            Arc::new(FileStorage::new(path))
        }
    }
}

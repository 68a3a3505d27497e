use std::sync::Arc;

use tracing::warn;

use super::base::keys::{ACCESS_TOKEN, REFRESH_TOKEN};
use super::Storage;

/// Access/refresh token pair persisted on a [`Storage`] backend.
///
/// Never fails towards the caller: a read error degrades to `None`
/// (unauthenticated) and a write error is logged and dropped.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub async fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN).await
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN).await
    }

    pub async fn set_access_token(&self, token: &str) {
        self.write(ACCESS_TOKEN, token).await;
    }

    pub async fn set_refresh_token(&self, token: &str) {
        self.write(REFRESH_TOKEN, token).await;
    }

    /// Forget both tokens.
    pub async fn clear(&self) {
        if let Err(e) = self.storage.remove_items(&[ACCESS_TOKEN, REFRESH_TOKEN]).await {
            warn!("Failed to clear tokens: {}", e);
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, "Failed to read token, treating as absent: {}", e);
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value).await {
            warn!(key, "Failed to persist token: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::store::MemoryStorage;

    /// A backend where every call fails, like a browser with storage disabled.
    struct BrokenStorage;

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
            Err("storage unavailable".into())
        }

        async fn set_item(&self, _key: &str, _value: &str) -> Result<(), String> {
            Err("storage unavailable".into())
        }

        async fn remove_item(&self, _key: &str) -> Result<(), String> {
            Err("storage unavailable".into())
        }
    }

    #[tokio::test]
    async fn test_set_and_clear() {
        let store = TokenStore::new(Arc::new(MemoryStorage::new()));
        store.set_access_token("AT1").await;
        store.set_refresh_token("RT1").await;
        assert_eq!(store.access_token().await.as_deref(), Some("AT1"));
        assert_eq!(store.refresh_token().await.as_deref(), Some("RT1"));

        store.clear().await;
        assert_eq!(store.access_token().await, None);
        assert_eq!(store.refresh_token().await, None);
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_none() {
        let store = TokenStore::new(Arc::new(BrokenStorage));
        store.set_access_token("AT1").await;
        assert_eq!(store.access_token().await, None);
        store.clear().await;
    }

    #[tokio::test]
    async fn test_empty_value_counts_as_absent() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(ACCESS_TOKEN, "").await.unwrap();
        let store = TokenStore::new(storage);
        assert_eq!(store.access_token().await, None);
    }
}

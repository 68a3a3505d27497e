#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use duckbug_client::client::{ApiClient, RefreshedTokens, SessionHooks};
use duckbug_client::config::{ApiConfig, ConfigV1, StoreConfig};
use duckbug_client::startup;
use duckbug_client::state::AppState;
use duckbug_client::store::{MemoryStorage, TokenStore};

pub const PROJECT_BODY: &str = r#"{"id": "p1", "name": "shop", "openErrors": 2, "logsLast24h": 40}"#;

/// Full client stack against `base_url`, backed by in-memory storage.
pub async fn build_state(base_url: &str) -> AppState {
    let config = ConfigV1 {
        api: ApiConfig::new(base_url),
        store: StoreConfig::Memory,
        ..Default::default()
    };
    startup::build(Arc::new(config))
        .await
        .expect("client stack builds")
}

pub async fn token_store(access: Option<&str>, refresh: Option<&str>) -> TokenStore {
    let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
    if let Some(token) = access {
        tokens.set_access_token(token).await;
    }
    if let Some(token) = refresh {
        tokens.set_refresh_token(token).await;
    }
    tokens
}

/// Hooks that read and write a token store and count what the client reports.
pub struct CountingHooks {
    pub tokens: TokenStore,
    pub refreshed: AtomicUsize,
    pub expired: AtomicUsize,
}

impl CountingHooks {
    pub fn new(tokens: TokenStore) -> Arc<Self> {
        Arc::new(Self {
            tokens,
            refreshed: AtomicUsize::new(0),
            expired: AtomicUsize::new(0),
        })
    }

    pub fn refreshed(&self) -> usize {
        self.refreshed.load(Ordering::SeqCst)
    }

    pub fn expired(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionHooks for CountingHooks {
    async fn access_token(&self) -> Option<String> {
        self.tokens.access_token().await
    }

    async fn refresh_token(&self) -> Option<String> {
        self.tokens.refresh_token().await
    }

    async fn tokens_refreshed(&self, tokens: &RefreshedTokens) {
        self.refreshed.fetch_add(1, Ordering::SeqCst);
        self.tokens.set_access_token(&tokens.access_token).await;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.tokens.set_refresh_token(refresh_token).await;
        }
    }

    async fn session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

pub async fn counting_client(base_url: &str, access: Option<&str>, refresh: Option<&str>) -> (ApiClient, Arc<CountingHooks>) {
    counting_client_with(&ApiConfig::new(base_url), access, refresh).await
}

pub async fn counting_client_with(config: &ApiConfig, access: Option<&str>, refresh: Option<&str>) -> (ApiClient, Arc<CountingHooks>) {
    let tokens = token_store(access, refresh).await;
    let hooks = CountingHooks::new(tokens.clone());
    let client = ApiClient::new(config, tokens)
        .expect("client builds")
        .with_hooks(hooks.clone());
    (client, hooks)
}

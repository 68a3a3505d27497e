//! Builds the client stack from configuration.

use std::sync::Arc;

use tracing::info;

use crate::client::{ApiClient, ClientError};
use crate::config::ConfigV1;
use crate::session::Session;
use crate::state::AppState;
use crate::store::{create_storage, Preferences, TokenStore};

/// Wire storage, tokens, session and HTTP client together and load any
/// persisted session.
///
/// # Errors
///
/// Fails if the HTTP client cannot be constructed.
pub async fn build(config: Arc<ConfigV1>) -> Result<AppState, ClientError> {
    let storage = create_storage(&config.store);
    let tokens = TokenStore::new(storage.clone());
    let session = Arc::new(Session::new(tokens.clone()));
    let client = ApiClient::new(&config.api, tokens)?.with_hooks(session.clone());
    let preferences = Preferences::new(storage);

    session.init_auth().await;
    info!(base_url = client.base_url(), state = ?session.state(), "Client ready");

    Ok(AppState {
        config,
        session,
        client,
        preferences,
    })
}

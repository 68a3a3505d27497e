//! Shared application state.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::ConfigV1;
use crate::session::Session;
use crate::store::Preferences;

/// Everything a command needs, wired once at startup.
///
/// The client and the session share one token store; the client reports
/// refreshes and expiries back to the session through its hooks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigV1>,
    pub session: Arc<Session>,
    pub client: ApiClient,
    pub preferences: Preferences,
}

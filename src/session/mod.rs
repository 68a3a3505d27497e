//! Client-side view of who is signed in.
//!
//! [`Session`] owns the in-memory auth state and keeps it in step with the
//! [`TokenStore`]. It is handed to the [`ApiClient`] as its
//! [`SessionHooks`], so refreshes and expiries flow back into it.

pub mod state;

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, warn};

use crate::client::{endpoints, ApiClient, ClientError, RefreshedTokens, RequestOptions, SessionHooks};
use crate::models::{Credentials, LoginResponse, SignupResponse};
use crate::store::TokenStore;

pub use state::{RouteDecision, SessionSnapshot, SessionState};

pub struct Session {
    tokens: TokenStore,
    inner: RwLock<SessionSnapshot>,
}

impl Session {
    pub fn new(tokens: TokenStore) -> Self {
        Self {
            tokens,
            inner: RwLock::new(SessionSnapshot::default()),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Load persisted tokens. Always leaves the session initialized.
    pub async fn init_auth(&self) {
        let access_token = self.tokens.access_token().await;
        let refresh_token = self.tokens.refresh_token().await;
        let authenticated = access_token.is_some();
        self.update(|s| {
            s.access_token = access_token;
            s.refresh_token = refresh_token;
            s.is_authenticated = authenticated;
            s.is_initialized = true;
        });
        info!(authenticated, "Session initialized");
    }

    /// Exchange credentials for a token pair. On failure the error message
    /// is kept as the last login error and the stored tokens are left alone.
    pub async fn login(&self, client: &ApiClient, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        self.update(|s| s.login_error = None);

        let result = async {
            let options = RequestOptions::json(Method::POST, credentials)?;
            client
                .request_with_schema::<LoginResponse>(endpoints::LOGIN, &options)
                .await
        }
        .await;

        match result {
            Ok(response) => {
                self.tokens.set_access_token(&response.access_token).await;
                self.tokens.set_refresh_token(&response.refresh_token).await;
                self.update(|s| {
                    s.access_token = Some(response.access_token.clone());
                    s.refresh_token = Some(response.refresh_token.clone());
                    s.is_authenticated = true;
                    s.is_initialized = true;
                });
                info!(expires_in = %response.expires_in, "Logged in");
                Ok(response)
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.update(|s| s.login_error = Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Register an account. Tokens are not touched; the user logs in after.
    pub async fn signup(&self, client: &ApiClient, credentials: &Credentials) -> Result<SignupResponse, ClientError> {
        self.update(|s| s.signup_error = None);

        let result = async {
            let options = RequestOptions::json(Method::POST, credentials)?;
            client
                .request_with_schema::<SignupResponse>(endpoints::SIGNUP, &options)
                .await
        }
        .await;

        if let Err(e) = &result {
            warn!("Signup failed: {}", e);
            self.update(|s| s.signup_error = Some(e.to_string()));
        }
        result
    }

    /// Forget both tokens. Safe to call any number of times.
    pub async fn logout(&self) {
        self.tokens.clear().await;
        self.update(|s| {
            s.access_token = None;
            s.refresh_token = None;
            s.is_authenticated = false;
            s.is_initialized = true;
        });
        info!("Logged out");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn state(&self) -> SessionState {
        self.snapshot().state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot().is_initialized
    }

    pub fn login_error(&self) -> Option<String> {
        self.snapshot().login_error
    }

    pub fn signup_error(&self) -> Option<String> {
        self.snapshot().signup_error
    }

    /// Decide whether a signed-in-only view may render.
    pub fn guard(&self) -> RouteDecision {
        self.state().into()
    }

    fn update(&self, f: impl FnOnce(&mut SessionSnapshot)) {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut inner);
    }
}

#[async_trait]
impl SessionHooks for Session {
    async fn access_token(&self) -> Option<String> {
        self.tokens.access_token().await
    }

    async fn refresh_token(&self) -> Option<String> {
        self.tokens.refresh_token().await
    }

    async fn tokens_refreshed(&self, tokens: &RefreshedTokens) {
        self.tokens.set_access_token(&tokens.access_token).await;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.tokens.set_refresh_token(refresh_token).await;
        }
        self.update(|s| {
            s.access_token = Some(tokens.access_token.clone());
            if let Some(refresh_token) = &tokens.refresh_token {
                s.refresh_token = Some(refresh_token.clone());
            }
            s.is_authenticated = true;
            s.is_initialized = true;
        });
    }

    async fn session_expired(&self) {
        warn!("Session expired");
        self.logout().await;
    }
}

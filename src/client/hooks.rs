use async_trait::async_trait;

/// Tokens returned by a successful `POST /refresh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access_token: String,
    /// Absent when the server keeps the current refresh token valid.
    pub refresh_token: Option<String>,
}

/// Seam between the HTTP client and whoever owns the session.
///
/// Wired once at startup so the client can read tokens and report refresh
/// outcomes without depending on the session module.
#[async_trait]
pub trait SessionHooks: Send + Sync {
    async fn access_token(&self) -> Option<String>;
    async fn refresh_token(&self) -> Option<String>;
    async fn tokens_refreshed(&self, tokens: &RefreshedTokens);
    async fn session_expired(&self);
}

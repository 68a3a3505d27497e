use serde::Serialize;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Persisted tokens have not been read yet.
    Uninitialized,
    Anonymous,
    Authenticated,
}

/// Outcome of guarding a view that needs a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Auth state unknown yet; show a placeholder.
    Pending,
    RedirectToLogin,
    Allow,
}

impl From<SessionState> for RouteDecision {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Uninitialized => RouteDecision::Pending,
            SessionState::Anonymous => RouteDecision::RedirectToLogin,
            SessionState::Authenticated => RouteDecision::Allow,
        }
    }
}

/// Point-in-time copy of the session, safe to hand out.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(skip)]
    pub access_token: Option<String>,
    #[serde(skip)]
    pub refresh_token: Option<String>,
    pub is_initialized: bool,
    pub is_authenticated: bool,
    pub login_error: Option<String>,
    pub signup_error: Option<String>,
}

impl SessionSnapshot {
    pub fn state(&self) -> SessionState {
        if !self.is_initialized {
            SessionState::Uninitialized
        } else if self.is_authenticated {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }
}

// Tokens stay out of debug output.
impl std::fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("is_initialized", &self.is_initialized)
            .field("is_authenticated", &self.is_authenticated)
            .field("login_error", &self.login_error)
            .field("signup_error", &self.signup_error)
            .finish()
    }
}

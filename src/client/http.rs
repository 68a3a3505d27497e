use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::endpoints;
use super::error::{ClientError, HttpError};
use super::hooks::{RefreshedTokens, SessionHooks};
use crate::config::ApiConfig;
use crate::store::TokenStore;

/// Method, headers and body of a request. Cloned for the retry after a
/// refresh, so the body is kept as owned bytes.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// A request with a JSON body and the matching content type.
    pub fn json<T: Serialize + ?Sized>(method: Method, body: &T) -> Result<Self, ClientError> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            ClientError::Configuration(format!("Request body could not be encoded: {}", e))
        })?;
        let mut options = Self::new(method);
        options
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        options.body = Some(bytes);
        Ok(options)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// HTTP client for the DuckBug API.
///
/// Every call goes through [`ApiClient::send`], which attaches the bearer
/// token and, on a 401, performs at most one refresh followed by at most
/// one retry.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
    hooks: Option<Arc<dyn SessionHooks>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, tokens: TokenStore) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            hooks: None,
        })
    }

    /// Route token lookups and refresh outcomes through `hooks` instead of
    /// reading and writing the token store directly.
    pub fn with_hooks(mut self, hooks: Arc<dyn SessionHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Send one request, recovering once from an expired access token.
    ///
    /// Any status other than 401 is returned as-is. A 401 triggers one
    /// `POST /refresh`; if that fails the tokens are cleared, the session is
    /// reported expired and the original 401 is returned. Otherwise the
    /// request is retried once and the retry's response is returned,
    /// whatever its status.
    pub async fn send(&self, path: &str, options: &RequestOptions) -> Result<Response, ClientError> {
        let url = self.resolve(path)?;

        let access_token = self.current_access_token().await;
        let response = self.execute(&url, options, access_token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(refresh_token) = self.current_refresh_token().await else {
            debug!(path, "Got 401 and there is no refresh token");
            self.notify_session_expired().await;
            return Ok(response);
        };

        let refreshed = match self.refresh(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(path, "Token refresh failed, ending session: {}", e);
                self.tokens.clear().await;
                self.notify_session_expired().await;
                return Ok(response);
            }
        };

        self.publish(&refreshed).await;
        debug!(path, "Retrying request with refreshed access token");
        self.execute(&url, options, Some(&refreshed.access_token))
            .await
    }

    fn resolve(&self, path: &str) -> Result<String, ClientError> {
        if is_absolute(path) {
            return Err(ClientError::Configuration(format!(
                "Absolute URLs are not allowed; use a path relative to {} (got '{}')",
                self.base_url, path
            )));
        }
        if path.starts_with('/') {
            Ok(format!("{}{}", self.base_url, path))
        } else {
            Ok(format!("{}/{}", self.base_url, path))
        }
    }

    async fn execute(
        &self,
        url: &str,
        options: &RequestOptions,
        bearer: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut request = self
            .http
            .request(options.method.clone(), url)
            .headers(options.headers.clone());

        // A caller-provided Authorization header wins over the stored token.
        if let Some(token) = bearer {
            if !options.headers.contains_key(AUTHORIZATION) {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        debug!(method = %options.method, url, authenticated = bearer.is_some(), "Sending request");
        let response = request.send().await?;
        debug!(status = response.status().as_u16(), url, "Received response");
        Ok(response)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, ClientError> {
        let url = format!("{}{}", self.base_url, endpoints::REFRESH);
        let response = self
            .http
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HttpError::new(response.status()).into());
        }

        let body = response.bytes().await?;
        let parsed: RefreshResponse =
            serde_json::from_slice(&body).map_err(ClientError::from_body_error)?;
        if parsed.access_token.is_empty() {
            return Err(ClientError::SchemaValidation(
                "refresh response carries an empty accessToken".into(),
            ));
        }

        info!(
            rotated_refresh_token = parsed.refresh_token.is_some(),
            "Access token refreshed"
        );
        Ok(RefreshedTokens {
            access_token: parsed.access_token,
            refresh_token: parsed.refresh_token.filter(|t| !t.is_empty()),
        })
    }

    async fn current_access_token(&self) -> Option<String> {
        match &self.hooks {
            Some(hooks) => hooks.access_token().await,
            None => self.tokens.access_token().await,
        }
    }

    async fn current_refresh_token(&self) -> Option<String> {
        match &self.hooks {
            Some(hooks) => hooks.refresh_token().await,
            None => self.tokens.refresh_token().await,
        }
    }

    async fn publish(&self, refreshed: &RefreshedTokens) {
        match &self.hooks {
            Some(hooks) => hooks.tokens_refreshed(refreshed).await,
            None => {
                self.tokens.set_access_token(&refreshed.access_token).await;
                if let Some(refresh_token) = &refreshed.refresh_token {
                    self.tokens.set_refresh_token(refresh_token).await;
                }
            }
        }
    }

    async fn notify_session_expired(&self) {
        if let Some(hooks) = &self.hooks {
            hooks.session_expired().await;
        }
    }
}

/// True for anything that would escape the configured base URL:
/// `http://…`, `https://…`, any other `scheme:` prefix, or `//host`.
fn is_absolute(path: &str) -> bool {
    path.starts_with("//") || url::Url::parse(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> ApiClient {
        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        ApiClient::new(&ApiConfig::new(server.url()), tokens).unwrap()
    }

    #[test]
    fn test_absolute_detection() {
        assert!(is_absolute("http://evil.example/steal"));
        assert!(is_absolute("https://evil.example"));
        assert!(is_absolute("//evil.example/x"));
        assert!(is_absolute("ftp://evil.example"));
        assert!(!is_absolute("/projects"));
        assert!(!is_absolute("/error-groups/status:batch"));
        assert!(!is_absolute("/errors?search=a:b"));
    }

    #[tokio::test]
    async fn test_absolute_url_is_rejected_without_a_call() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        let url = format!("{}/projects", server.url());
        let res = client.send(&url, &RequestOptions::get()).await;

        assert!(matches!(res, Err(ClientError::Configuration(_))));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_bearer_attached_when_token_present() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/projects")
            .match_header("authorization", "Bearer AT1")
            .with_status(200)
            .with_body(r#"{"count":0,"items":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client.tokens().set_access_token("AT1").await;
        let res = client.send("/projects", &RequestOptions::get()).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/technologies")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"count":0,"items":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client.send("/technologies", &RequestOptions::get()).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_caller_authorization_header_is_kept() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/projects")
            .match_header("authorization", "Bearer CALLER")
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        client.tokens().set_access_token("AT1").await;
        let options = RequestOptions::get()
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer CALLER"));
        client.send("/projects", &options).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_other_errors_are_returned_untouched() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/projects/p1")
            .with_status(500)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/refresh")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        client.tokens().set_refresh_token("RT1").await;
        let res = client.send("/projects/p1", &RequestOptions::get()).await.unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        m.assert_async().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_without_hooks_persists_into_store() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/errors/e1")
            .match_header("authorization", "Bearer AT1")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/refresh")
            .match_body(Matcher::Json(serde_json::json!({"refreshToken": "RT1"})))
            .with_status(200)
            .with_body(r#"{"accessToken":"AT2","refreshToken":"RT2"}"#)
            .expect(1)
            .create_async()
            .await;
        let retry = server
            .mock("GET", "/errors/e1")
            .match_header("authorization", "Bearer AT2")
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        client.tokens().set_access_token("AT1").await;
        client.tokens().set_refresh_token("RT1").await;

        let res = client.send("/errors/e1", &RequestOptions::get()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(client.tokens().access_token().await.as_deref(), Some("AT2"));
        assert_eq!(client.tokens().refresh_token().await.as_deref(), Some("RT2"));

        first.assert_async().await;
        refresh.assert_async().await;
        retry.assert_async().await;
    }

    #[tokio::test]
    async fn test_retry_resends_body() {
        let mut server = Server::new_async().await;
        let expected = serde_json::json!({"name": "checkout-service"});
        server
            .mock("POST", "/projects")
            .match_header("authorization", "Bearer AT1")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", "/refresh")
            .with_status(200)
            .with_body(r#"{"accessToken":"AT2"}"#)
            .create_async()
            .await;
        let retry = server
            .mock("POST", "/projects")
            .match_header("authorization", "Bearer AT2")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(expected.clone()))
            .with_status(201)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        client.tokens().set_access_token("AT1").await;
        client.tokens().set_refresh_token("RT1").await;

        let options = RequestOptions::json(Method::POST, &expected).unwrap();
        let res = client.send("/projects", &options).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        retry.assert_async().await;
    }

    #[tokio::test]
    async fn test_unparseable_refresh_body_counts_as_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/logs")
            .with_status(401)
            .create_async()
            .await;
        server
            .mock("POST", "/refresh")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        client.tokens().set_access_token("AT1").await;
        client.tokens().set_refresh_token("RT1").await;

        let res = client.send("/logs", &RequestOptions::get()).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(client.tokens().access_token().await, None);
        assert_eq!(client.tokens().refresh_token().await, None);
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        // Nothing listens on port 1.
        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        let client = ApiClient::new(&ApiConfig::new("http://127.0.0.1:1"), tokens).unwrap();
        let res = client.send("/projects", &RequestOptions::get()).await;
        assert!(matches!(res, Err(ClientError::Transport(_))));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/projects")
            .with_status(200)
            .create_async()
            .await;

        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        let client = ApiClient::new(&ApiConfig::new(format!("{}/", server.url())), tokens).unwrap();
        client.send("/projects", &RequestOptions::get()).await.unwrap();
        m.assert_async().await;
    }
}

//! Typed decoding on top of [`ApiClient::send`].

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ClientError, HttpError};
use super::http::{ApiClient, RequestOptions};

impl ApiClient {
    /// Send and parse the JSON body into `T`. Non-OK statuses become
    /// [`ClientError::Http`].
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, ClientError> {
        let response = self.send_ok(path, options).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(ClientError::from_body_error)
    }

    /// Like [`ApiClient::request_json`], but the body is first read as
    /// untyped JSON and then checked against `T`'s shape, so a well-formed
    /// body of the wrong shape is always a
    /// [`ClientError::SchemaValidation`].
    pub async fn request_with_schema<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, ClientError> {
        let raw: Value = self.request_json(path, options).await?;
        validate(raw)
    }

    /// Send and discard the body. Used for mutations answering 204.
    pub async fn request_void(&self, path: &str, options: &RequestOptions) -> Result<(), ClientError> {
        self.send_ok(path, options).await?;
        Ok(())
    }

    async fn send_ok(&self, path: &str, options: &RequestOptions) -> Result<Response, ClientError> {
        let response = self.send(path, options).await?;
        if !response.status().is_success() {
            return Err(HttpError::new(response.status()).into());
        }
        Ok(response)
    }
}

/// Check an untyped JSON document against `T`.
pub fn validate<T: DeserializeOwned>(raw: Value) -> Result<T, ClientError> {
    serde_json::from_value(raw).map_err(|e| ClientError::SchemaValidation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockito::Server;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::client::HttpReason;
    use crate::config::ApiConfig;
    use crate::store::{MemoryStorage, TokenStore};

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Dsn {
        dsn: String,
    }

    fn client_for(server: &Server) -> ApiClient {
        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        ApiClient::new(&ApiConfig::new(server.url()), tokens).unwrap()
    }

    #[tokio::test]
    async fn test_non_ok_maps_to_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/projects/missing/dsn")
            .with_status(404)
            .with_body("project not found")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .request_with_schema::<Dsn>("/projects/missing/dsn", &RequestOptions::get())
            .await
            .unwrap_err();

        match err {
            ClientError::Http(e) => {
                assert_eq!(e.status, 404);
                assert_eq!(e.reason, HttpReason::NotFound);
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schema_mismatch() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/projects/p1/dsn")
            .with_status(200)
            .with_body(r#"{"dsn": 42}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .request_with_schema::<Dsn>("/projects/p1/dsn", &RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::SchemaValidation(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/projects/p1/dsn")
            .with_status(200)
            .with_body("dsn=abc")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .request_json::<Dsn>("/projects/p1/dsn", &RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_void_ignores_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("DELETE", "/projects/p1")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        client
            .request_void("/projects/p1", &RequestOptions::delete())
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_void_still_reports_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/projects/p1")
            .with_status(403)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .request_void("/projects/p1", &RequestOptions::delete())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_validate_round_trip() {
        let raw = serde_json::json!({"dsn": "https://key@duckbug.io/1"});
        let dsn: Dsn = validate(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&dsn).unwrap(), raw);
    }
}

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of a non-OK status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpReason {
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    Unknown,
}

impl HttpReason {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => HttpReason::Unauthorized,
            403 => HttpReason::Forbidden,
            404 => HttpReason::NotFound,
            s if s >= 500 => HttpReason::ServerError,
            _ => HttpReason::Unknown,
        }
    }
}

/// A response that came back with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub status: u16,
    pub reason: HttpReason,
}

impl HttpError {
    pub fn new(status: StatusCode) -> Self {
        let status = status.as_u16();
        HttpError {
            status,
            reason: HttpReason::from_status(status),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            HttpReason::Unauthorized => f.write_str("Unauthorized"),
            HttpReason::Forbidden => f.write_str("Forbidden"),
            HttpReason::NotFound => f.write_str("Not found"),
            HttpReason::ServerError => f.write_str("Server error"),
            HttpReason::Unknown => write!(f, "HTTP error {}", self.status),
        }
    }
}

impl std::error::Error for HttpError {}

/// Everything a call through [`crate::client::ApiClient`] can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The caller misused the client; nothing was sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Http(#[from] HttpError),

    /// The body was JSON but not the shape we expected.
    #[error("Response did not match the expected schema: {0}")]
    SchemaValidation(String),

    #[error("Response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Status code for HTTP errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http(e) => Some(e.status),
            _ => None,
        }
    }

    pub(crate) fn from_body_error(e: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match e.classify() {
            Category::Data => ClientError::SchemaValidation(e.to_string()),
            Category::Io | Category::Syntax | Category::Eof => ClientError::Decode(e),
        }
    }
}

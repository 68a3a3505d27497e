use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Public DuckBug API, used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://duckbug.io/api/v1";

/// Connection settings for the DuckBug REST API.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for a single HTTP call. No timeout when unset.
    #[serde(default)]
    pub timeout_in_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_in_ms: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_in_ms: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_in_ms.map(Duration::from_millis)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

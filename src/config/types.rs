use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::api::ApiConfig;
use super::logging::LoggingConfig;
use super::store::StoreConfig;

/// Prefix for environment overrides, e.g. `DUCKBUG_API__BASE_URL`.
pub const ENV_PREFIX: &str = "DUCKBUG_";

const DEFAULT_DOCUMENT: &str = r#"version: "1.0.0""#;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: API endpoint, persisted state location and logging.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error loading configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Load config from a YAML file, with `DUCKBUG_*` environment variables on top.
/// A missing file means all defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigV1, ConfigError> {
    let path = path.as_ref();
    let file = if path.exists() {
        Yaml::file(path)
    } else {
        debug!(path = %path.display(), "No config file, using defaults");
        Yaml::string(DEFAULT_DOCUMENT)
    };
    let figment = Figment::new()
        .merge(file)
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    extract(figment)
}

/// Parse a config from an in-memory YAML document. Environment is not consulted.
pub fn parse_config(yaml: &str) -> Result<ConfigV1, ConfigError> {
    extract(Figment::new().merge(Yaml::string(yaml)))
}

fn extract(figment: Figment) -> Result<ConfigV1, ConfigError> {
    let config = figment.extract::<Config>().map_err(Box::new)?;
    let config = match config {
        Config::ConfigV1(c) => c,
    };
    config.validate()?;
    Ok(config)
}

impl ConfigV1 {
    fn validate(&self) -> Result<(), ConfigError> {
        self.logging.level_filter().map_err(ConfigError::Invalid)?;
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        Ok(())
    }
}

/// The JSON schema for the configuration, pretty printed.
pub fn config_schema() -> String {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the client keeps its persisted state (tokens and preferences).
/// We differentiate backends via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum StoreConfig {
    /// Nothing survives the process. Mostly useful for tests and one-shot scripts.
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "file")]
    File(FileStoreConfig),
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File(FileStoreConfig::default())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema, PartialEq, Eq)]
pub struct FileStoreConfig {
    #[serde(default = "default_state_path")]
    pub path: String,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

impl FileStoreConfig {
    /// The configured path with a leading `~` expanded to `$HOME`.
    pub fn resolved_path(&self) -> PathBuf {
        match self.path.strip_prefix("~/") {
            Some(rest) => match std::env::var_os("HOME") {
                Some(home) => PathBuf::from(home).join(rest),
                None => PathBuf::from(&self.path),
            },
            None => PathBuf::from(&self.path),
        }
    }
}

fn default_state_path() -> String {
    "~/.config/duckbug/state.json".to_string()
}

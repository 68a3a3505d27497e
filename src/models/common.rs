use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: Number,
    pub items: Vec<T>,
}

/// Occurrence counts over fixed windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "last24h")]
    pub last_24h: Number,
    #[serde(rename = "last7d")]
    pub last_7d: Number,
    #[serde(rename = "last30d")]
    pub last_30d: Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dsn {
    pub dsn: String,
}

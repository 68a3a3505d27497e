use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::wire::{nullable, present, Nullable};

/// Request/runtime context attached to a captured error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorContext {
    Map(Map<String, Value>),
    List(Vec<Value>),
}

type Fields = Nullable<Map<String, Value>>;

/// A single captured error occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    pub id: String,
    pub message: String,
    pub file: String,
    pub line: i64,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub ip: Nullable<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub url: Nullable<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub method: Nullable<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub headers: Fields,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub query_params: Fields,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub body_params: Fields,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub cookies: Fields,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub session: Fields,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub files: Fields,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub env: Fields,
    pub time: Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorGroupStatus {
    Unresolved,
    Resolved,
    Ignored,
}

impl ErrorGroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorGroupStatus::Unresolved => "unresolved",
            ErrorGroupStatus::Resolved => "resolved",
            ErrorGroupStatus::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ErrorGroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorGroupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unresolved" => Ok(ErrorGroupStatus::Unresolved),
            "resolved" => Ok(ErrorGroupStatus::Resolved),
            "ignored" => Ok(ErrorGroupStatus::Ignored),
            other => Err(format!(
                "unknown status '{}', expected unresolved, resolved or ignored",
                other
            )),
        }
    }
}

/// Occurrences of the same error (same message, file and line) folded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorGroup {
    pub id: String,
    pub message: String,
    pub file: String,
    pub line: i64,
    pub first_seen_at: Number,
    pub last_seen_at: Number,
    pub counter: Number,
    pub status: ErrorGroupStatus,
}

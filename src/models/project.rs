use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::wire::present;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub open_errors: Option<Number>,
    #[serde(
        default,
        rename = "logsLast24h",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub logs_last_24h: Option<Number>,
}

/// Body of project create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology_id: Option<i64>,
}

impl ProjectInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            technology_id: None,
        }
    }

    pub fn with_technology(mut self, technology_id: i64) -> Self {
        self.technology_id = Some(technology_id);
        self
    }
}

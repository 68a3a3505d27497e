use serde::{Deserialize, Serialize};

/// A language or framework a project can report from, with a sample DSN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub example_dsn_connection: String,
}

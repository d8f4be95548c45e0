//! Database index models.

use serde::{Deserialize, Serialize};

fn default_direction() -> i8 {
    1
}

/// One component of a compound index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
    pub field: String,
    /// 1 for ascending, -1 for descending.
    #[serde(default = "default_direction")]
    pub direction: i8,
}

/// An index to ensure on a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub keys: Vec<IndexKey>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub sparse: bool,
}

/// An index reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    #[serde(default)]
    pub key: serde_json::Value,
    #[serde(default)]
    pub unique: bool,
}

/// Response from `GET /api/{collection}/indexes`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexListResponse {
    pub indexes: Vec<IndexInfo>,
}

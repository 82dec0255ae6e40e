use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    pub color: String,
    pub parent_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub bundle_assignment_id: Option<String>,
}

/// Abbreviated child embedded in other resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewChild {
    pub name: String,
    /// Display color, e.g. `#FF8800`
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChildUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

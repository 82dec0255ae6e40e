use super::TaskTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named group of task templates that can be assigned to children at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildTaskBundle {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub templates: Vec<TaskTemplate>,
}

/// Body of bundle create and update calls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleTemplates {
    pub template_ids: Vec<String>,
}

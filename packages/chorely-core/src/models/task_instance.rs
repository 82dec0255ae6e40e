use super::{ChildRef, TemplateRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Completed,
    Skipped,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// One occurrence of a chore for one child on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    pub id: String,
    pub template_id: String,
    pub child_id: String,
    /// `YYYY-MM-DD` or a full ISO timestamp, as stored by the backend
    pub date: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub template: Option<TemplateRef>,
    #[serde(default)]
    pub child: Option<ChildRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskInstance {
    pub template_id: String,
    pub child_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskInstanceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A child with its task list, from the by-children view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskChildGroup {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub tasks: Vec<TaskSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: String,
    pub date: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub template_name: String,
    #[serde(default)]
    pub template_category: Option<String>,
    pub recurrence_type: String,
}

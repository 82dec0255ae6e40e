//! REST payloads of the family task backend.

mod auth;
mod bundle_assignment;
mod child;
mod task_bundle;
mod task_instance;
mod task_template;
mod template_child;

use serde::{Deserialize, Deserializer, Serialize};

pub use auth::{
    LoginData, LoginRequest, LoginResponse, RefreshTokenData, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest, RegisterResponse, RegisteredParent, User,
};
pub use bundle_assignment::{BundleAssignmentUpdate, ChildBundleAssignment, NewBundleAssignment};
pub use child::{Child, ChildRef, ChildUpdate, NewChild};
pub use task_bundle::{BundleTemplates, ChildTaskBundle};
pub use task_instance::{
    NewTaskInstance, TaskChildGroup, TaskInstance, TaskInstanceUpdate, TaskStatus, TaskSummary,
};
pub use task_template::{NewTaskTemplate, RecurrenceType, TaskTemplate, TaskTemplateUpdate};
pub use template_child::{NewTemplateChild, TemplateChild, TemplateChildUpdate, TemplateRef};

/// Standard `{ message, data }` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Response carrying only a status message (deletes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Decode a list field the backend may send as `null`; `null` becomes empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

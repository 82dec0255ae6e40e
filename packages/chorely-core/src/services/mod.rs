//! Typed calls for every backend resource.
//!
//! Each service builds an [`ApiRequest`] and runs it through
//! [`ApiClient::execute`], so all of them share the refresh-and-retry
//! behavior. The optional `token` argument overrides the session's access
//! token for that call only.

mod auth;
mod bundle_assignments;
mod children;
mod task_bundles;
mod task_instances;
mod task_templates;
mod template_children;

use crate::api::{ApiClient, ApiError, ApiOutcome, ApiRequest};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Result of a service call that went through the refresh flow.
pub type ApiResult<T> = Result<ApiOutcome<T>, ApiError>;

impl ApiClient {
    async fn send<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        token: Option<&str>,
    ) -> ApiResult<T> {
        self.execute(&request.with_token_override(token.map(str::to_owned)))
            .await
    }

    async fn send_json<B, T>(&self, request: ApiRequest, body: &B, token: Option<&str>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(request.with_json(body)?, token).await
    }
}

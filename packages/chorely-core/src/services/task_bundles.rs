use super::ApiResult;
use crate::api::endpoints::Resource;
use crate::api::{ApiClient, ApiRequest};
use crate::models::{ApiResponse, BundleTemplates, ChildTaskBundle, MessageResponse};

impl ApiClient {
    pub async fn add_task_bundle(
        &self,
        bundle: &BundleTemplates,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<ChildTaskBundle>> {
        self.send_json(ApiRequest::post(Resource::TaskBundle.add()), bundle, token)
            .await
    }

    pub async fn list_task_bundles(
        &self,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<Vec<ChildTaskBundle>>> {
        self.send(ApiRequest::get(Resource::TaskBundle.get_all()), token)
            .await
    }

    pub async fn get_task_bundle(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<ChildTaskBundle>> {
        self.send(ApiRequest::get(Resource::TaskBundle.get_by_id(id)), token)
            .await
    }

    /// Replace the templates of a bundle.
    pub async fn update_task_bundle(
        &self,
        id: &str,
        bundle: &BundleTemplates,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<ChildTaskBundle>> {
        self.send_json(ApiRequest::put(Resource::TaskBundle.update(id)), bundle, token)
            .await
    }

    pub async fn delete_task_bundle(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<MessageResponse> {
        self.send(ApiRequest::delete(Resource::TaskBundle.delete(id)), token)
            .await
    }
}

use super::ApiResult;
use crate::api::endpoints::Resource;
use crate::api::{ApiClient, ApiRequest};
use crate::models::{
    ApiResponse, BundleAssignmentUpdate, ChildBundleAssignment, MessageResponse,
    NewBundleAssignment,
};

impl ApiClient {
    /// Assign a bundle to one or more children.
    pub async fn add_bundle_assignment(
        &self,
        assignment: &NewBundleAssignment,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<ChildBundleAssignment>> {
        self.send_json(ApiRequest::post(Resource::BundleAssignment.add()), assignment, token)
            .await
    }

    pub async fn list_bundle_assignments(
        &self,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<Vec<ChildBundleAssignment>>> {
        self.send(ApiRequest::get(Resource::BundleAssignment.get_all()), token)
            .await
    }

    pub async fn get_bundle_assignment(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<ChildBundleAssignment>> {
        self.send(ApiRequest::get(Resource::BundleAssignment.get_by_id(id)), token)
            .await
    }

    pub async fn update_bundle_assignment(
        &self,
        id: &str,
        update: &BundleAssignmentUpdate,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<ChildBundleAssignment>> {
        self.send_json(ApiRequest::put(Resource::BundleAssignment.update(id)), update, token)
            .await
    }

    pub async fn delete_bundle_assignment(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<MessageResponse> {
        self.send(ApiRequest::delete(Resource::BundleAssignment.delete(id)), token)
            .await
    }
}

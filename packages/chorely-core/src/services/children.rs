use super::ApiResult;
use crate::api::endpoints::Resource;
use crate::api::{ApiClient, ApiRequest};
use crate::models::{ApiResponse, Child, ChildUpdate, MessageResponse, NewChild};

impl ApiClient {
    pub async fn add_child(
        &self,
        child: &NewChild,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<Child>> {
        self.send_json(ApiRequest::post(Resource::Child.add()), child, token)
            .await
    }

    pub async fn list_children(&self, token: Option<&str>) -> ApiResult<ApiResponse<Vec<Child>>> {
        self.send(ApiRequest::get(Resource::Child.get_all()), token)
            .await
    }

    pub async fn get_child(&self, id: &str, token: Option<&str>) -> ApiResult<ApiResponse<Child>> {
        self.send(ApiRequest::get(Resource::Child.get_by_id(id)), token)
            .await
    }

    pub async fn update_child(
        &self,
        id: &str,
        update: &ChildUpdate,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<Child>> {
        self.send_json(ApiRequest::put(Resource::Child.update(id)), update, token)
            .await
    }

    pub async fn delete_child(&self, id: &str, token: Option<&str>) -> ApiResult<MessageResponse> {
        self.send(ApiRequest::delete(Resource::Child.delete(id)), token)
            .await
    }
}

use super::ApiResult;
use crate::api::endpoints::Resource;
use crate::api::{ApiClient, ApiRequest};
use crate::models::{
    ApiResponse, MessageResponse, NewTemplateChild, TemplateChild, TemplateChildUpdate,
};

impl ApiClient {
    /// Assign a single template directly to a child.
    pub async fn add_template_child(
        &self,
        link: &NewTemplateChild,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TemplateChild>> {
        self.send_json(ApiRequest::post(Resource::TemplateChild.add()), link, token)
            .await
    }

    pub async fn list_template_children(
        &self,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<Vec<TemplateChild>>> {
        self.send(ApiRequest::get(Resource::TemplateChild.get_all()), token)
            .await
    }

    pub async fn get_template_child(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TemplateChild>> {
        self.send(ApiRequest::get(Resource::TemplateChild.get_by_id(id)), token)
            .await
    }

    pub async fn update_template_child(
        &self,
        id: &str,
        update: &TemplateChildUpdate,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TemplateChild>> {
        self.send_json(ApiRequest::put(Resource::TemplateChild.update(id)), update, token)
            .await
    }

    pub async fn delete_template_child(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<MessageResponse> {
        self.send(ApiRequest::delete(Resource::TemplateChild.delete(id)), token)
            .await
    }
}

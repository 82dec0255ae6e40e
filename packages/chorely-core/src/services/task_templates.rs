use super::ApiResult;
use crate::api::endpoints::Resource;
use crate::api::{ApiClient, ApiRequest};
use crate::models::{ApiResponse, MessageResponse, NewTaskTemplate, TaskTemplate, TaskTemplateUpdate};

impl ApiClient {
    pub async fn add_task_template(
        &self,
        template: &NewTaskTemplate,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TaskTemplate>> {
        self.send_json(ApiRequest::post(Resource::TaskTemplate.add()), template, token)
            .await
    }

    pub async fn list_task_templates(
        &self,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<Vec<TaskTemplate>>> {
        self.send(ApiRequest::get(Resource::TaskTemplate.get_all()), token)
            .await
    }

    pub async fn get_task_template(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TaskTemplate>> {
        self.send(ApiRequest::get(Resource::TaskTemplate.get_by_id(id)), token)
            .await
    }

    pub async fn update_task_template(
        &self,
        id: &str,
        update: &TaskTemplateUpdate,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TaskTemplate>> {
        self.send_json(ApiRequest::put(Resource::TaskTemplate.update(id)), update, token)
            .await
    }

    pub async fn delete_task_template(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<MessageResponse> {
        self.send(ApiRequest::delete(Resource::TaskTemplate.delete(id)), token)
            .await
    }
}

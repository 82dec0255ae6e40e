use super::ApiResult;
use crate::api::endpoints::{self, Resource};
use crate::api::{ApiClient, ApiRequest};
use crate::models::{
    ApiResponse, MessageResponse, NewTaskInstance, TaskChildGroup, TaskInstance,
    TaskInstanceUpdate,
};

impl ApiClient {
    pub async fn add_task_instance(
        &self,
        task: &NewTaskInstance,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TaskInstance>> {
        self.send_json(ApiRequest::post(Resource::TaskInstance.add()), task, token)
            .await
    }

    /// List task instances. `filters` become query parameters, in order.
    pub async fn list_task_instances(
        &self,
        filters: &[(&str, &str)],
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<Vec<TaskInstance>>> {
        let request = filters
            .iter()
            .fold(ApiRequest::get(Resource::TaskInstance.get_all()), |req, (k, v)| {
                req.with_query(*k, *v)
            });
        self.send(request, token).await
    }

    pub async fn get_task_instance(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TaskInstance>> {
        self.send(ApiRequest::get(Resource::TaskInstance.get_by_id(id)), token)
            .await
    }

    pub async fn update_task_instance(
        &self,
        id: &str,
        update: &TaskInstanceUpdate,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TaskInstance>> {
        self.send_json(ApiRequest::put(Resource::TaskInstance.update(id)), update, token)
            .await
    }

    pub async fn delete_task_instance(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<MessageResponse> {
        self.send(ApiRequest::delete(Resource::TaskInstance.delete(id)), token)
            .await
    }

    /// Every child with its task instances.
    pub async fn task_instances_by_children(
        &self,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<Vec<TaskChildGroup>>> {
        self.send(ApiRequest::get(endpoints::TASK_INSTANCES_BY_CHILDREN), token)
            .await
    }

    /// Toggle a task instance's completion. The backend decides the new status.
    pub async fn update_task_instance_status(
        &self,
        id: &str,
        token: Option<&str>,
    ) -> ApiResult<ApiResponse<TaskInstance>> {
        let endpoint = endpoints::task_instance_update_status(id);
        self.send(ApiRequest::put(endpoint), token).await
    }
}

//! Endpoint catalogue of the family task backend.
//!
//! Resource routes follow one pattern: `/<resource>/add`, `/<resource>/get`,
//! `/<resource>/get/{id}`, `/<resource>/update/{id}`, `/<resource>/delete/{id}`.

pub const AUTH_REGISTER: &str = "/auth/register";
pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_REFRESH_TOKEN: &str = "/auth/refresh-token";

pub const TASK_INSTANCES_BY_CHILDREN: &str = "/taskInstance/by-children";
const TASK_INSTANCE_UPDATE_STATUS: &str = "/taskInstance/update-status";

/// CRUD resources exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Child,
    TaskTemplate,
    TaskBundle,
    BundleAssignment,
    TemplateChild,
    TaskInstance,
}

impl Resource {
    fn prefix(&self) -> &'static str {
        match self {
            Resource::Child => "/child",
            Resource::TaskTemplate => "/taskTemplate",
            Resource::TaskBundle => "/childTaskBundle",
            Resource::BundleAssignment => "/childBundleAssignment",
            Resource::TemplateChild => "/templateChild",
            Resource::TaskInstance => "/taskInstance",
        }
    }

    /// POST `/<resource>/add`
    pub fn add(&self) -> String {
        format!("{}/add", self.prefix())
    }

    /// GET `/<resource>/get`
    pub fn get_all(&self) -> String {
        format!("{}/get", self.prefix())
    }

    /// GET `/<resource>/get/{id}`
    pub fn get_by_id(&self, id: &str) -> String {
        format!("{}/get/{}", self.prefix(), urlencoding::encode(id))
    }

    /// PUT `/<resource>/update/{id}`
    pub fn update(&self, id: &str) -> String {
        format!("{}/update/{}", self.prefix(), urlencoding::encode(id))
    }

    /// DELETE `/<resource>/delete/{id}`
    pub fn delete(&self, id: &str) -> String {
        format!("{}/delete/{}", self.prefix(), urlencoding::encode(id))
    }
}

/// PUT `/taskInstance/update-status/{id}`
pub fn task_instance_update_status(id: &str) -> String {
    format!("{}/{}", TASK_INSTANCE_UPDATE_STATUS, urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_routes() {
        assert_eq!(Resource::Child.add(), "/child/add");
        assert_eq!(Resource::Child.get_all(), "/child/get");
        assert_eq!(Resource::TaskTemplate.get_by_id("t1"), "/taskTemplate/get/t1");
        assert_eq!(Resource::TaskBundle.update("b1"), "/childTaskBundle/update/b1");
        assert_eq!(
            Resource::BundleAssignment.delete("a1"),
            "/childBundleAssignment/delete/a1"
        );
    }

    #[test]
    fn test_ids_are_single_path_segments() {
        assert_eq!(
            Resource::TaskInstance.get_by_id("a/b c"),
            "/taskInstance/get/a%2Fb%20c"
        );
        assert_eq!(
            task_instance_update_status("i1"),
            "/taskInstance/update-status/i1"
        );
    }
}

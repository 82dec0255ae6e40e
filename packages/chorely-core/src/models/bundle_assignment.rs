use super::ChildRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildBundleAssignment {
    pub id: String,
    pub bundle_id: String,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub children: Vec<ChildRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBundleAssignment {
    pub bundle_id: String,
    pub child_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleAssignmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    pub child_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_assignment_children() {
        let assignment: ChildBundleAssignment = serde_json::from_value(json!({
            "id": "a1",
            "bundleId": "b1",
            "children": [{"id": "c1", "name": "Ana"}]
        }))
        .unwrap();

        assert_eq!(assignment.children.len(), 1);
        assert_eq!(assignment.children[0].color, None);
    }

    #[test]
    fn test_null_or_missing_children_are_empty() {
        for body in [
            json!({"id": "a1", "bundleId": "b1", "children": null}),
            json!({"id": "a1", "bundleId": "b1"}),
        ] {
            let assignment: ChildBundleAssignment = serde_json::from_value(body).unwrap();
            assert!(assignment.children.is_empty());
        }
    }

    #[test]
    fn test_update_always_sends_child_ids() {
        let body = serde_json::to_value(BundleAssignmentUpdate::default()).unwrap();
        assert_eq!(body, json!({"childIds": []}));
    }
}

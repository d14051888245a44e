//! Resource Manager converters (asset -> HCL)

use std::sync::Arc;

use serde_json::{Value, json};

use crate::asset::Asset;
use crate::cai2hcl::converters::{data_string, user_labels};
use crate::cai2hcl::registry::{Cai2hclConverter, ConverterRegistryBuilder};
use crate::errors::{ConvertError, ConvertResult};
use crate::hclwrite::ResourceBlock;

pub const PROJECT_ASSET_TYPE: &str = "cloudresourcemanager.googleapis.com/Project";

pub fn register(builder: ConverterRegistryBuilder) -> ConverterRegistryBuilder {
    builder.register(PROJECT_ASSET_TYPE, Arc::new(ProjectConverter))
}

/// Converts a Project asset into a `google_project` block. The asset's
/// parent determines whether `folder_id` or `org_id` is set; never both.
pub struct ProjectConverter;

impl Cai2hclConverter for ProjectConverter {
    fn convert(&self, asset: &Asset) -> ConvertResult<Vec<ResourceBlock>> {
        let data = asset.data().ok_or_else(|| ConvertError::MissingResourceData {
            asset_type: asset.asset_type.clone(),
            name: asset.name.clone(),
        })?;

        let project_id = data_string(data, "projectId").ok_or_else(|| {
            ConvertError::MalformedRecord {
                address: asset.name.clone(),
                message: "project asset has no projectId".to_string(),
            }
        })?;

        let parent = asset
            .resource
            .as_ref()
            .map(|r| r.parent.as_str())
            .unwrap_or_default();
        let (folder_id, org_id) = match split_parent(parent) {
            (None, None) => data_parent(data),
            ids => ids,
        };

        let fields = vec![
            (
                "name".to_string(),
                data_string(data, "name").map(Value::String).unwrap_or(Value::Null),
            ),
            ("project_id".to_string(), json!(project_id)),
            ("org_id".to_string(), org_id.map(Value::String).unwrap_or(Value::Null)),
            (
                "folder_id".to_string(),
                folder_id.map(Value::String).unwrap_or(Value::Null),
            ),
            (
                "labels".to_string(),
                user_labels(data, "labels").unwrap_or(Value::Null),
            ),
        ];

        Ok(vec![ResourceBlock::new(
            vec!["google_project".to_string(), project_id],
            fields,
        )])
    }
}

/// Parent carried inside the resource data itself, as v1 Project exports do.
/// Either a `folders/999` style string or a typed `{type, id}` object.
fn data_parent(data: &Value) -> (Option<String>, Option<String>) {
    match data.get("parent") {
        Some(Value::String(s)) => split_parent(s),
        Some(Value::Object(map)) => {
            let id = map.get("id").and_then(|v| v.as_str());
            match (map.get("type").and_then(|v| v.as_str()), id) {
                (Some("folder"), Some(id)) => (Some(id.to_string()), None),
                (Some("organization"), Some(id)) => (None, Some(id.to_string())),
                _ => (None, None),
            }
        }
        _ => (None, None),
    }
}

/// Split a CAI parent reference into (folder_id, org_id). Accepts both the
/// bare `folders/999` form and the full `//cloudresourcemanager...` name.
fn split_parent(parent: &str) -> (Option<String>, Option<String>) {
    let parent = parent
        .trim_start_matches("//cloudresourcemanager.googleapis.com/");
    if let Some(id) = parent.strip_prefix("folders/") {
        (Some(id.to_string()), None)
    } else if let Some(id) = parent.strip_prefix("organizations/") {
        (None, Some(id.to_string()))
    } else {
        (None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetResource;

    fn project_asset(parent: &str) -> Asset {
        Asset {
            name: "//cloudresourcemanager.googleapis.com/projects/my-proj".to_string(),
            asset_type: PROJECT_ASSET_TYPE.to_string(),
            resource: Some(AssetResource {
                version: "v1".to_string(),
                discovery_document_uri:
                    "https://cloudresourcemanager.googleapis.com/$discovery/rest?version=v1"
                        .to_string(),
                discovery_name: "Project".to_string(),
                parent: parent.to_string(),
                data: Some(json!({
                    "name": "My Project",
                    "projectId": "my-proj",
                    "labels": {"env": "prod"}
                })),
            }),
            ancestors: Vec::new(),
        }
    }

    fn field<'a>(block: &'a ResourceBlock, key: &str) -> &'a Value {
        &block.fields.iter().find(|(k, _)| k == key).unwrap().1
    }

    #[test]
    fn test_project_under_folder() {
        let blocks = ProjectConverter.convert(&project_asset("folders/999")).unwrap();
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];

        assert_eq!(block.labels, vec!["google_project", "my-proj"]);
        assert_eq!(field(block, "project_id"), &json!("my-proj"));
        assert_eq!(field(block, "folder_id"), &json!("999"));
        assert_eq!(field(block, "org_id"), &Value::Null);
        assert_eq!(field(block, "labels"), &json!({"env": "prod"}));
    }

    #[test]
    fn test_project_under_organization() {
        let blocks = ProjectConverter
            .convert(&project_asset("organizations/1"))
            .unwrap();
        let block = &blocks[0];
        assert_eq!(field(block, "org_id"), &json!("1"));
        assert_eq!(field(block, "folder_id"), &Value::Null);
    }

    #[test]
    fn test_full_parent_name_is_accepted() {
        let blocks = ProjectConverter
            .convert(&project_asset(
                "//cloudresourcemanager.googleapis.com/folders/999",
            ))
            .unwrap();
        assert_eq!(field(&blocks[0], "folder_id"), &json!("999"));
    }

    #[test]
    fn test_parent_in_resource_data_string_form() {
        let mut asset = project_asset("");
        let resource = asset.resource.as_mut().unwrap();
        if let Some(Value::Object(data)) = resource.data.as_mut() {
            data.insert("parent".to_string(), json!("folders/999"));
        }
        let blocks = ProjectConverter.convert(&asset).unwrap();
        assert_eq!(field(&blocks[0], "folder_id"), &json!("999"));
        assert_eq!(field(&blocks[0], "org_id"), &Value::Null);
    }

    #[test]
    fn test_parent_in_resource_data_object_form() {
        let mut asset = project_asset("");
        let resource = asset.resource.as_mut().unwrap();
        if let Some(Value::Object(data)) = resource.data.as_mut() {
            data.insert("parent".to_string(), json!({"type": "organization", "id": "1"}));
        }
        let blocks = ProjectConverter.convert(&asset).unwrap();
        assert_eq!(field(&blocks[0], "org_id"), &json!("1"));
        assert_eq!(field(&blocks[0], "folder_id"), &Value::Null);
    }

    #[test]
    fn test_resource_parent_wins_over_data_parent() {
        let mut asset = project_asset("folders/111");
        let resource = asset.resource.as_mut().unwrap();
        if let Some(Value::Object(data)) = resource.data.as_mut() {
            data.insert("parent".to_string(), json!("folders/222"));
        }
        let blocks = ProjectConverter.convert(&asset).unwrap();
        assert_eq!(field(&blocks[0], "folder_id"), &json!("111"));
    }

    #[test]
    fn test_missing_resource_data_is_an_error() {
        let asset = Asset {
            name: "//cloudresourcemanager.googleapis.com/projects/my-proj".to_string(),
            asset_type: PROJECT_ASSET_TYPE.to_string(),
            resource: None,
            ancestors: Vec::new(),
        };
        let err = ProjectConverter.convert(&asset).unwrap_err();
        assert!(matches!(err, ConvertError::MissingResourceData { .. }));
    }
}

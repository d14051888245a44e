//! Resource Manager converters (plan -> asset)

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::asset::{Asset, AssetResource};
use crate::config::ConvertConfig;
use crate::errors::{ConvertError, ConvertResult};
use crate::tfdata::ResourceData;
use crate::tfplan2cai::converters::{ConverterTable, TfplanConverter, add};

pub const PROJECT_ASSET_TYPE: &str = "cloudresourcemanager.googleapis.com/Project";
pub const BILLING_INFO_ASSET_TYPE: &str = "cloudbilling.googleapis.com/ProjectBillingInfo";

pub fn register(table: &mut ConverterTable) {
    add(table, "google_project", Arc::new(ProjectConverter));
}

/// Converts a `google_project` resource into a Project asset, plus a
/// ProjectBillingInfo asset when a billing account is attached.
pub struct ProjectConverter;

impl TfplanConverter for ProjectConverter {
    fn convert(&self, data: &ResourceData, config: &ConvertConfig) -> ConvertResult<Vec<Asset>> {
        let mut assets = vec![project_asset(data, config)?];
        if data.get_string("billing_account").is_some() {
            assets.push(billing_info_asset(data)?);
        }
        Ok(assets)
    }
}

fn project_asset(data: &ResourceData, _config: &ConvertConfig) -> ConvertResult<Asset> {
    let project_id = require(data, "project_id")?;
    let display_name = require(data, "name")?;

    let mut payload = Map::new();
    payload.insert("name".to_string(), json!(display_name));
    payload.insert("projectId".to_string(), json!(project_id));
    if let Some(number) = data.get_i64("number") {
        payload.insert("projectNumber".to_string(), json!(number));
    }
    if let Some(parent) = parent_resource_id(data)? {
        payload.insert("parent".to_string(), parent);
    }
    if let Some(labels) = data.get_string_map("labels") {
        if !labels.is_empty() {
            payload.insert(
                "labels".to_string(),
                Value::Object(labels.into_iter().map(|(k, v)| (k, json!(v))).collect()),
            );
        }
    }

    // The canonical name uses the project number when the plan knows it
    let identifier = data
        .get_string("number")
        .unwrap_or_else(|| project_id.clone());

    Ok(Asset {
        name: format!(
            "//cloudresourcemanager.googleapis.com/projects/{}",
            identifier
        ),
        asset_type: PROJECT_ASSET_TYPE.to_string(),
        resource: Some(AssetResource {
            version: "v1".to_string(),
            discovery_document_uri:
                "https://cloudresourcemanager.googleapis.com/$discovery/rest?version=v1"
                    .to_string(),
            discovery_name: "Project".to_string(),
            parent: String::new(),
            data: Some(Value::Object(payload)),
        }),
        ancestors: Vec::new(),
    })
}

/// The project's declared parent: exactly one of org_id / folder_id
fn parent_resource_id(data: &ResourceData) -> ConvertResult<Option<Value>> {
    let org_id = data.get_string("org_id");
    let folder_id = data.get_string("folder_id");

    match (org_id, folder_id) {
        (Some(_), Some(_)) => Err(ConvertError::MalformedRecord {
            address: data.address().to_string(),
            message: "'org_id' and 'folder_id' cannot be both set".to_string(),
        }),
        (Some(org), None) => Ok(Some(json!({"id": org, "type": "organization"}))),
        (None, Some(folder)) => Ok(Some(json!({
            "id": folder.trim_start_matches("folders/"),
            "type": "folder"
        }))),
        (None, None) => Ok(None),
    }
}

fn billing_info_asset(data: &ResourceData) -> ConvertResult<Asset> {
    let project_id = require(data, "project_id")?;
    let billing_account = require(data, "billing_account")?;

    Ok(Asset {
        name: format!("//cloudbilling.googleapis.com/projects/{}/billingInfo", project_id),
        asset_type: BILLING_INFO_ASSET_TYPE.to_string(),
        resource: Some(AssetResource {
            version: "v1".to_string(),
            discovery_document_uri: "https://cloudbilling.googleapis.com/$discovery/rest"
                .to_string(),
            discovery_name: "ProjectBillingInfo".to_string(),
            parent: String::new(),
            data: Some(json!({
                "billingAccountName": format!("billingAccounts/{}", billing_account),
                "name": format!("projects/{}/billingInfo", project_id),
                "projectId": project_id
            })),
        }),
        ancestors: Vec::new(),
    })
}

fn require(data: &ResourceData, key: &str) -> ConvertResult<String> {
    data.get_string(key).ok_or_else(|| ConvertError::MalformedRecord {
        address: data.address().to_string(),
        message: format!("missing required field '{}'", key),
    })
}

//! Storage converters (plan -> asset)

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::asset::{Asset, AssetResource, asset_name};
use crate::config::ConvertConfig;
use crate::errors::{ConvertError, ConvertResult};
use crate::tfdata::ResourceData;
use crate::tfplan2cai::converters::{ConverterTable, TfplanConverter, add};

pub const BUCKET_ASSET_TYPE: &str = "storage.googleapis.com/Bucket";

pub fn register(table: &mut ConverterTable) {
    add(table, "google_storage_bucket", Arc::new(BucketConverter));
}

pub struct BucketConverter;

impl TfplanConverter for BucketConverter {
    fn convert(&self, data: &ResourceData, config: &ConvertConfig) -> ConvertResult<Vec<Asset>> {
        if data.get_string("name").is_none() {
            return Err(ConvertError::MalformedRecord {
                address: data.address().to_string(),
                message: "missing required field 'name'".to_string(),
            });
        }
        let name = asset_name(data, config, "//storage.googleapis.com/{{name}}")?;

        let mut payload = Map::new();
        payload.insert("name".to_string(), json!(data.get_string("name").unwrap()));
        if let Some(location) = data.get_string("location") {
            payload.insert("location".to_string(), json!(location.to_uppercase()));
        }
        if let Some(class) = data.get_string("storage_class") {
            payload.insert("storageClass".to_string(), json!(class));
        }
        if let Some(project) = data.project_or_default(config) {
            payload.insert("project".to_string(), json!(project));
        }
        if let Some(labels) = data.get_string_map("labels") {
            if !labels.is_empty() {
                payload.insert(
                    "labels".to_string(),
                    Value::Object(labels.into_iter().map(|(k, v)| (k, json!(v))).collect()),
                );
            }
        }

        Ok(vec![Asset {
            name,
            asset_type: BUCKET_ASSET_TYPE.to_string(),
            resource: Some(AssetResource {
                version: "v1".to_string(),
                discovery_document_uri:
                    "https://www.googleapis.com/discovery/v1/apis/storage/v1/rest".to_string(),
                discovery_name: "Bucket".to_string(),
                parent: String::new(),
                data: Some(Value::Object(payload)),
            }),
            ancestors: Vec::new(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_conversion() {
        let data = ResourceData::new(
            "google_storage_bucket",
            "google_storage_bucket.assets",
            json!({
                "name": "my-bucket",
                "location": "us",
                "storage_class": "STANDARD",
                "project": "my-proj",
                "labels": {"env": "prod"}
            }),
        );
        let assets = BucketConverter.convert(&data, &ConvertConfig::new()).unwrap();
        assert_eq!(assets.len(), 1);

        let asset = &assets[0];
        assert_eq!(asset.name, "//storage.googleapis.com/my-bucket");
        let payload = asset.data().unwrap();
        assert_eq!(payload["location"], json!("US"));
        assert_eq!(payload["project"], json!("my-proj"));
    }

    #[test]
    fn test_project_falls_back_to_config_default() {
        let data = ResourceData::new(
            "google_storage_bucket",
            "google_storage_bucket.assets",
            json!({"name": "my-bucket"}),
        );
        let mut config = ConvertConfig::new();
        config.project = "default-proj".to_string();
        let assets = BucketConverter.convert(&data, &config).unwrap();
        assert_eq!(assets[0].data().unwrap()["project"], json!("default-proj"));
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let data = ResourceData::new(
            "google_storage_bucket",
            "google_storage_bucket.assets",
            json!({}),
        );
        let err = BucketConverter
            .convert(&data, &ConvertConfig::new())
            .unwrap_err();
        assert!(err.to_string().contains("google_storage_bucket.assets"));
    }
}

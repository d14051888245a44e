//! Storage converters (asset -> HCL)

use std::sync::Arc;

use serde_json::{Value, json};

use crate::asset::Asset;
use crate::cai2hcl::converters::{data_string, user_labels};
use crate::cai2hcl::registry::{Cai2hclConverter, ConverterRegistryBuilder};
use crate::errors::{ConvertError, ConvertResult};
use crate::hclwrite::ResourceBlock;

pub const BUCKET_ASSET_TYPE: &str = "storage.googleapis.com/Bucket";

pub fn register(builder: ConverterRegistryBuilder) -> ConverterRegistryBuilder {
    builder.register(BUCKET_ASSET_TYPE, Arc::new(BucketConverter))
}

pub struct BucketConverter;

impl Cai2hclConverter for BucketConverter {
    fn convert(&self, asset: &Asset) -> ConvertResult<Vec<ResourceBlock>> {
        let data = asset.data().ok_or_else(|| ConvertError::MissingResourceData {
            asset_type: asset.asset_type.clone(),
            name: asset.name.clone(),
        })?;

        let name = data_string(data, "name").ok_or_else(|| ConvertError::MalformedRecord {
            address: asset.name.clone(),
            message: "bucket asset has no name".to_string(),
        })?;

        let fields = vec![
            ("name".to_string(), json!(name)),
            (
                "location".to_string(),
                data_string(data, "location").map(Value::String).unwrap_or(Value::Null),
            ),
            (
                "storage_class".to_string(),
                data_string(data, "storageClass")
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            ),
            (
                "labels".to_string(),
                user_labels(data, "labels").unwrap_or(Value::Null),
            ),
        ];

        Ok(vec![ResourceBlock::new(
            vec!["google_storage_bucket".to_string(), name],
            fields,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetResource;
    use crate::cai2hcl::converters::PROVISIONED_LABEL;

    fn bucket_asset() -> Asset {
        Asset {
            name: "//storage.googleapis.com/my-bucket".to_string(),
            asset_type: BUCKET_ASSET_TYPE.to_string(),
            resource: Some(AssetResource {
                version: "v1".to_string(),
                discovery_document_uri:
                    "https://www.googleapis.com/discovery/v1/apis/storage/v1/rest".to_string(),
                discovery_name: "Bucket".to_string(),
                parent: String::new(),
                data: Some(json!({
                    "name": "my-bucket",
                    "location": "US",
                    "storageClass": "STANDARD",
                    "labels": {"env": "prod", PROVISIONED_LABEL: "true"}
                })),
            }),
            ancestors: Vec::new(),
        }
    }

    #[test]
    fn test_bucket_conversion() {
        let blocks = BucketConverter.convert(&bucket_asset()).unwrap();
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];

        assert_eq!(block.labels, vec!["google_storage_bucket", "my-bucket"]);
        let labels = &block.fields.iter().find(|(k, _)| k == "labels").unwrap().1;
        // Bookkeeping label is stripped before emission
        assert_eq!(labels, &json!({"env": "prod"}));
        let class = &block
            .fields
            .iter()
            .find(|(k, _)| k == "storage_class")
            .unwrap()
            .1;
        assert_eq!(class, &json!("STANDARD"));
    }
}

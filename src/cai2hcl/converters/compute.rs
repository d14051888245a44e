//! Compute converters (asset -> HCL)
//!
//! `compute.googleapis.com/Autoscaler` is an ambiguous asset type: the same
//! CAI type covers both zonal and regional autoscalers. An asset name
//! containing a `/zones/` segment selects the zonal resource; everything else
//! is regional. The two rules together are total over valid names.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::asset::{Asset, parse_field_value};
use crate::cai2hcl::converters::data_string;
use crate::cai2hcl::registry::{
    Cai2hclConverter, ConverterRegistryBuilder, DisambiguationRule,
};
use crate::errors::{ConvertError, ConvertResult};
use crate::hclwrite::ResourceBlock;

pub const AUTOSCALER_ASSET_TYPE: &str = "compute.googleapis.com/Autoscaler";

pub fn register(builder: ConverterRegistryBuilder) -> ConverterRegistryBuilder {
    builder.register_ambiguous(
        AUTOSCALER_ASSET_TYPE,
        vec![
            DisambiguationRule {
                name: "google_compute_autoscaler",
                matches: |asset| asset.name.contains("/zones/"),
                converter: Arc::new(AutoscalerConverter { zonal: true }),
            },
            DisambiguationRule {
                name: "google_compute_region_autoscaler",
                matches: |asset| !asset.name.contains("/zones/"),
                converter: Arc::new(AutoscalerConverter { zonal: false }),
            },
        ],
    )
}

/// Shared converter for the zonal and regional autoscaler resources; the two
/// only differ in their location attribute.
pub struct AutoscalerConverter {
    zonal: bool,
}

impl Cai2hclConverter for AutoscalerConverter {
    fn convert(&self, asset: &Asset) -> ConvertResult<Vec<ResourceBlock>> {
        let data = asset.data().ok_or_else(|| ConvertError::MissingResourceData {
            asset_type: asset.asset_type.clone(),
            name: asset.name.clone(),
        })?;

        let name = data_string(data, "name").ok_or_else(|| ConvertError::MalformedRecord {
            address: asset.name.clone(),
            message: "autoscaler asset has no name".to_string(),
        })?;

        let mut fields = vec![("name".to_string(), json!(name))];
        if self.zonal {
            fields.push((
                "zone".to_string(),
                location(&asset.name, "zones"),
            ));
        } else {
            fields.push((
                "region".to_string(),
                location(&asset.name, "regions"),
            ));
        }
        fields.push(("target".to_string(), flatten_target(data)));
        fields.push(("autoscaling_policy".to_string(), flatten_policy(data)));

        let kind = if self.zonal {
            "google_compute_autoscaler"
        } else {
            "google_compute_region_autoscaler"
        };
        Ok(vec![ResourceBlock::new(
            vec![kind.to_string(), name],
            fields,
        )])
    }
}

fn location(asset_name: &str, segment: &str) -> Value {
    parse_field_value(asset_name, segment)
        .map(Value::String)
        .unwrap_or(Value::Null)
}

/// The target is an instance group manager self link; the block references
/// it by its final path component.
fn flatten_target(data: &Value) -> Value {
    match data_string(data, "target") {
        Some(link) => link
            .rsplit('/')
            .next()
            .map(|s| json!(s))
            .unwrap_or(Value::Null),
        None => Value::Null,
    }
}

fn flatten_policy(data: &Value) -> Value {
    let Some(policy) = data.get("autoscalingPolicy") else {
        return Value::Null;
    };
    let mut out = serde_json::Map::new();
    if let Some(v) = policy.get("minNumReplicas") {
        out.insert("min_replicas".to_string(), v.clone());
    }
    if let Some(v) = policy.get("maxNumReplicas") {
        out.insert("max_replicas".to_string(), v.clone());
    }
    if let Some(v) = policy.get("coolDownPeriodSec") {
        out.insert("cooldown_period".to_string(), v.clone());
    }
    if out.is_empty() {
        Value::Null
    } else {
        json!([Value::Object(out)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetResource;
    use crate::cai2hcl::converters::build_registry;

    fn autoscaler_asset(name: &str) -> Asset {
        Asset {
            name: name.to_string(),
            asset_type: AUTOSCALER_ASSET_TYPE.to_string(),
            resource: Some(AssetResource {
                version: "v1".to_string(),
                discovery_document_uri:
                    "https://www.googleapis.com/discovery/v1/apis/compute/v1/rest".to_string(),
                discovery_name: "Autoscaler".to_string(),
                parent: String::new(),
                data: Some(json!({
                    "name": "my-as",
                    "target": "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a/instanceGroupManagers/igm-1",
                    "autoscalingPolicy": {
                        "minNumReplicas": 1,
                        "maxNumReplicas": 5,
                        "coolDownPeriodSec": 60
                    }
                })),
            }),
            ancestors: Vec::new(),
        }
    }

    fn field<'a>(block: &'a ResourceBlock, key: &str) -> &'a Value {
        &block.fields.iter().find(|(k, _)| k == key).unwrap().1
    }

    #[test]
    fn test_zonal_name_selects_the_zonal_resource() {
        let registry = build_registry();
        let asset = autoscaler_asset(
            "//compute.googleapis.com/projects/p/zones/us-central1-a/autoscalers/my-as",
        );
        let blocks = registry.convert_resource(&asset).unwrap();
        assert_eq!(blocks[0].labels[0], "google_compute_autoscaler");
        assert_eq!(field(&blocks[0], "zone"), &json!("us-central1-a"));
    }

    #[test]
    fn test_regional_name_selects_the_regional_resource() {
        let registry = build_registry();
        let asset = autoscaler_asset(
            "//compute.googleapis.com/projects/p/regions/us-central1/autoscalers/my-as",
        );
        let blocks = registry.convert_resource(&asset).unwrap();
        assert_eq!(blocks[0].labels[0], "google_compute_region_autoscaler");
        assert_eq!(field(&blocks[0], "region"), &json!("us-central1"));
    }

    #[test]
    fn test_policy_and_target_flattening() {
        let asset = autoscaler_asset(
            "//compute.googleapis.com/projects/p/zones/us-central1-a/autoscalers/my-as",
        );
        let blocks = AutoscalerConverter { zonal: true }.convert(&asset).unwrap();
        let block = &blocks[0];

        assert_eq!(field(block, "target"), &json!("igm-1"));
        assert_eq!(
            field(block, "autoscaling_policy"),
            &json!([{"cooldown_period": 60, "max_replicas": 5, "min_replicas": 1}])
        );
    }

    #[test]
    fn test_missing_data_is_an_error() {
        let mut asset = autoscaler_asset(
            "//compute.googleapis.com/projects/p/zones/us-central1-a/autoscalers/my-as",
        );
        asset.resource = None;
        let err = AutoscalerConverter { zonal: true }.convert(&asset).unwrap_err();
        assert!(matches!(err, ConvertError::MissingResourceData { .. }));
    }
}

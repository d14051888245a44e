//! Cloud Asset Inventory record model
//!
//! Mirrors the CAI export JSON shape: each asset carries its full resource
//! name, its asset type (e.g. `compute.googleapis.com/Instance`), an optional
//! resource payload and the resolved ancestry chain.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ConvertConfig;
use crate::errors::{ConvertError, ConvertResult};
use crate::tfdata::ResourceData;

/// A typed snapshot of a cloud resource, independent of any IaC tool state.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    /// Full resource name, e.g.
    /// `//cloudresourcemanager.googleapis.com/projects/my-proj`
    pub name: String,

    #[serde(rename = "asset_type")]
    pub asset_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<AssetResource>,

    /// Ancestors sorted from closest to furthest, each `<type>/<id>`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<String>,
}

/// The resource payload of an asset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetResource {
    #[serde(default)]
    pub version: String,

    /// Discovery fields are informational and often absent in exports
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub discovery_document_uri: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub discovery_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Asset {
    /// Unique key for deduplication across converters
    pub fn key(&self) -> String {
        format!("{}{}", self.asset_type, self.name)
    }

    /// The resource data payload, if any
    pub fn data(&self) -> Option<&Value> {
        self.resource.as_ref().and_then(|r| r.data.as_ref())
    }
}

lazy_static! {
    static ref TEMPLATE_FIELD: Regex = Regex::new(r"\{\{([a-z_]+)\}\}").unwrap();
}

/// Build a full asset name from a template like
/// `//compute.googleapis.com/projects/{{project}}/zones/{{zone}}/instances/{{name}}`.
///
/// Placeholders resolve from the resource data first; `project`, `region` and
/// `zone` fall back to the config defaults. An unresolvable placeholder is a
/// malformed-record error naming the resource address.
pub fn asset_name(
    data: &ResourceData,
    config: &ConvertConfig,
    template: &str,
) -> ConvertResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in TEMPLATE_FIELD.captures_iter(template) {
        let whole = caps.get(0).unwrap();
        let field = &caps[1];

        let value = match field {
            "project" => data.project_or_default(config),
            "region" => data.region_or_default(config),
            "zone" => data.zone_or_default(config),
            _ => data.get_string(field),
        };

        let value = value.ok_or_else(|| ConvertError::MalformedRecord {
            address: data.address().to_string(),
            message: format!("cannot interpolate '{}' into asset name", field),
        })?;

        out.push_str(&template[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&template[last..]);

    Ok(out)
}

/// Extract the path segment that follows `key` in a resource name, e.g.
/// `parse_field_value(".../zones/us-central1-a/autoscalers/a", "zones")`
/// returns `us-central1-a`.
pub fn parse_field_value(name: &str, key: &str) -> Option<String> {
    let mut segments = name.split('/');
    while let Some(segment) = segments.next() {
        if segment == key {
            return segments.next().map(|s| s.to_string());
        }
    }
    None
}

//! Per-service converter tables for the asset -> HCL direction
//!
//! Each service module contributes its converters to the registry through a
//! `register` function; `build_registry` aggregates them into the one
//! immutable registry the dispatch engine uses.

pub mod compute;
pub mod resourcemanager;
pub mod storage;

use serde_json::Value;

use crate::cai2hcl::registry::ConverterRegistry;

/// Label attached by the provider to mark provisioned resources; internal
/// bookkeeping, stripped before emission.
pub const PROVISIONED_LABEL: &str = "goog-terraform-provisioned";

pub fn build_registry() -> ConverterRegistry {
    let builder = ConverterRegistry::builder();
    let builder = resourcemanager::register(builder);
    let builder = compute::register(builder);
    let builder = storage::register(builder);
    builder.build()
}

/// String field from an asset's resource data
pub(crate) fn data_string(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// User-visible labels: the bookkeeping label is dropped; an empty or absent
/// map reads as no labels at all.
pub(crate) fn user_labels(data: &Value, key: &str) -> Option<Value> {
    let labels = data.get(key)?.as_object()?;
    let filtered: serde_json::Map<String, Value> = labels
        .iter()
        .filter(|(k, _)| k.as_str() != PROVISIONED_LABEL)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if filtered.is_empty() {
        None
    } else {
        Some(Value::Object(filtered))
    }
}

//! Flat resource records extracted from a Terraform plan
//!
//! A [`ResourceData`] is the converter-facing view of one planned resource:
//! its Terraform kind, its address within the plan and the after-values map.
//! Accessors follow the "present and non-empty" contract: a null or
//! empty-string value reads as absent.

use serde_json::Value;

use crate::config::ConvertConfig;

#[derive(Debug, Clone)]
pub struct ResourceData {
    kind: String,
    address: String,
    values: Value,
}

impl ResourceData {
    pub fn new(kind: impl Into<String>, address: impl Into<String>, values: Value) -> Self {
        Self {
            kind: kind.into(),
            address: address.into(),
            values,
        }
    }

    /// Terraform resource kind, e.g. `google_compute_instance`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Resource address within the plan, e.g. `google_project.demo`
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw value of a top-level attribute
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.values.get(key) {
            Some(Value::Null) => None,
            other => other,
        }
    }

    /// String attribute; empty strings read as absent
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64(),
            // Plans frequently carry numeric ids as strings
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// String map attribute (e.g. labels), skipping non-string values
    pub fn get_string_map(&self, key: &str) -> Option<Vec<(String, String)>> {
        let map = self.get(key)?.as_object()?;
        Some(
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect(),
        )
    }

    pub fn project_or_default(&self, config: &ConvertConfig) -> Option<String> {
        self.get_string("project").or_else(|| {
            if config.project.is_empty() {
                None
            } else {
                Some(config.project.clone())
            }
        })
    }

    pub fn region_or_default(&self, config: &ConvertConfig) -> Option<String> {
        self.get_string("region").or_else(|| {
            if config.region.is_empty() {
                None
            } else {
                Some(config.region.clone())
            }
        })
    }

    pub fn zone_or_default(&self, config: &ConvertConfig) -> Option<String> {
        self.get_string("zone").or_else(|| {
            if config.zone.is_empty() {
                None
            } else {
                Some(config.zone.clone())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_empty_read_as_absent() {
        let d = ResourceData::new(
            "google_project",
            "google_project.demo",
            json!({"org_id": null, "folder_id": "", "project_id": "my-proj"}),
        );
        assert_eq!(d.get("org_id"), None);
        assert_eq!(d.get_string("folder_id"), None);
        assert_eq!(d.get_string("project_id").as_deref(), Some("my-proj"));
    }

    #[test]
    fn test_numeric_ids_as_strings() {
        let d = ResourceData::new("google_project", "google_project.demo", json!({"number": "42"}));
        assert_eq!(d.get_i64("number"), Some(42));
    }

    #[test]
    fn test_string_map() {
        let d = ResourceData::new(
            "google_project",
            "google_project.demo",
            json!({"labels": {"env": "prod", "team": "infra"}}),
        );
        let labels = d.get_string_map("labels").unwrap();
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_project_default_fallback() {
        let d = ResourceData::new("google_storage_bucket", "google_storage_bucket.b", json!({}));
        let mut cfg = ConvertConfig::new();
        assert_eq!(d.project_or_default(&cfg), None);
        cfg.project = "fallback".to_string();
        assert_eq!(d.project_or_default(&cfg).as_deref(), Some("fallback"));
    }
}

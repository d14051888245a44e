//! Terraform JSON plan reader
//!
//! Extracts the flat list of planned resource records the converters
//! operate on. Only the `resource_changes` entries matter here: for each
//! managed resource being created or updated, the after-values become one
//! [`ResourceData`]. Deletions are skipped; no-ops are included only when
//! the config asks for unchanged resources.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::tfdata::ResourceData;

/// Read planned resource records out of a parsed plan document
pub fn resource_changes(plan: &Value, convert_unchanged: bool) -> Result<Vec<ResourceData>> {
    let changes = plan
        .get("resource_changes")
        .and_then(|c| c.as_array())
        .context("plan document has no resource_changes")?;

    let mut records = Vec::new();
    for change in changes {
        // Data sources have mode "data"; only managed resources convert
        let mode = change.get("mode").and_then(|m| m.as_str()).unwrap_or("managed");
        if mode != "managed" {
            continue;
        }

        let kind = change
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("unknown");
        let address = change
            .get("address")
            .and_then(|a| a.as_str())
            .unwrap_or(kind);

        let actions: Vec<&str> = change
            .get("change")
            .and_then(|c| c.get("actions"))
            .and_then(|a| a.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        if !is_convertible(&actions, convert_unchanged) {
            continue;
        }

        let after = change
            .get("change")
            .and_then(|c| c.get("after"))
            .cloned()
            .unwrap_or(Value::Null);
        if !after.is_object() {
            // "after" is null for pure deletions and unknown-only resources
            continue;
        }

        records.push(ResourceData::new(kind, address, after));
    }
    Ok(records)
}

fn is_convertible(actions: &[&str], convert_unchanged: bool) -> bool {
    if actions.iter().any(|a| *a == "create" || *a == "update") {
        return true;
    }
    convert_unchanged && actions == ["no-op"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan() -> Value {
        json!({
            "format_version": "1.2",
            "resource_changes": [
                {
                    "address": "google_project.demo",
                    "mode": "managed",
                    "type": "google_project",
                    "name": "demo",
                    "change": {
                        "actions": ["create"],
                        "before": null,
                        "after": {"project_id": "my-proj", "name": "My Project"}
                    }
                },
                {
                    "address": "google_storage_bucket.old",
                    "mode": "managed",
                    "type": "google_storage_bucket",
                    "name": "old",
                    "change": {
                        "actions": ["delete"],
                        "before": {"name": "old-bucket"},
                        "after": null
                    }
                },
                {
                    "address": "data.google_project.lookup",
                    "mode": "data",
                    "type": "google_project",
                    "name": "lookup",
                    "change": {
                        "actions": ["read"],
                        "after": {"project_id": "other"}
                    }
                },
                {
                    "address": "google_storage_bucket.steady",
                    "mode": "managed",
                    "type": "google_storage_bucket",
                    "name": "steady",
                    "change": {
                        "actions": ["no-op"],
                        "after": {"name": "steady-bucket", "location": "US"}
                    }
                }
            ]
        })
    }

    #[test]
    fn test_extracts_creates_and_skips_deletes() {
        let records = resource_changes(&plan(), false).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), "google_project");
        assert_eq!(records[0].address(), "google_project.demo");
        assert_eq!(records[0].get_string("project_id").as_deref(), Some("my-proj"));
    }

    #[test]
    fn test_no_ops_included_on_request() {
        let records = resource_changes(&plan(), true).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.address() == "google_storage_bucket.steady"));
    }

    #[test]
    fn test_data_sources_are_ignored() {
        let records = resource_changes(&plan(), true).unwrap();
        assert!(records.iter().all(|r| !r.address().starts_with("data.")));
    }

    #[test]
    fn test_missing_resource_changes_is_an_error() {
        assert!(resource_changes(&json!({}), false).is_err());
    }

    #[test]
    fn test_replace_counts_as_create() {
        let doc = json!({
            "resource_changes": [{
                "address": "google_storage_bucket.b",
                "mode": "managed",
                "type": "google_storage_bucket",
                "change": {
                    "actions": ["delete", "create"],
                    "after": {"name": "b"}
                }
            }]
        });
        let records = resource_changes(&doc, false).unwrap();
        assert_eq!(records.len(), 1);
    }
}

//! Per-service converter tables for the plan -> asset direction
//!
//! A Terraform kind may map to several converters; each contributes its own
//! assets (a `google_project` with a billing account yields both a Project
//! and a ProjectBillingInfo asset through the one converter, while other
//! kinds split across converters).

pub mod resourcemanager;
pub mod storage;

use std::collections::HashMap;
use std::sync::Arc;

use crate::asset::Asset;
use crate::config::ConvertConfig;
use crate::errors::ConvertResult;
use crate::tfdata::ResourceData;

/// Converts one planned resource into CAI assets. Pure: ancestry is attached
/// by the engine afterwards, never fetched here.
pub trait TfplanConverter: Send + Sync {
    fn convert(&self, data: &ResourceData, config: &ConvertConfig) -> ConvertResult<Vec<Asset>>;
}

pub type ConverterTable = HashMap<String, Vec<Arc<dyn TfplanConverter>>>;

pub fn build_table() -> ConverterTable {
    let mut table = ConverterTable::new();
    resourcemanager::register(&mut table);
    storage::register(&mut table);
    table
}

pub(crate) fn add(table: &mut ConverterTable, kind: &str, converter: Arc<dyn TfplanConverter>) {
    table.entry(kind.to_string()).or_default().push(converter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_known_kinds() {
        let table = build_table();
        assert!(table.contains_key("google_project"));
        assert!(table.contains_key("google_storage_bucket"));
        assert!(!table.contains_key("google_pubsub_topic"));
    }
}

//! Plan -> asset conversion pipeline
//!
//! Walks the planned resource records, dispatches each through the converter
//! table, attaches ancestry to every produced asset and accumulates them
//! keyed by type + name. The batch is fail-fast: the first converter or
//! ancestry error aborts with the offending resource's address attached.

pub mod converters;
pub mod plan;

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::ancestry::{AncestryManager, Manager};
use crate::asset::Asset;
use crate::config::ConvertConfig;
use crate::errors::ConvertResult;
use crate::output;
use crate::tfdata::ResourceData;

use converters::ConverterTable;

/// Convert planned resource records to CAI assets with the default converter
/// table and a config-derived ancestry manager.
pub fn convert(records: &[ResourceData], config: &ConvertConfig) -> Result<Vec<Asset>> {
    let ancestry = Manager::new(config).context("initializing ancestry manager")?;
    let mut converter = Converter::new(config.clone(), Box::new(ancestry));
    converter.add_resource_changes(records)?;
    Ok(converter.assets())
}

/// Conversion engine for one batch. Never mutates its inputs.
pub struct Converter {
    converters: ConverterTable,
    ancestry: Box<dyn AncestryManager>,
    config: ConvertConfig,
    // Converted assets keyed by asset type + name
    assets: HashMap<String, Asset>,
}

impl Converter {
    pub fn new(config: ConvertConfig, ancestry: Box<dyn AncestryManager>) -> Self {
        Self {
            converters: converters::build_table(),
            ancestry,
            config,
            assets: HashMap::new(),
        }
    }

    /// Process a batch of planned resources, fail-fast on the first error
    pub fn add_resource_changes(&mut self, records: &[ResourceData]) -> Result<()> {
        for record in records {
            // Silently skip non-google resources
            if !record.kind().starts_with("google_") {
                continue;
            }

            let Some(matched) = self.converters.get(record.kind()) else {
                output::debug(&format!(
                    "{}: resource type {} cannot be converted to CAI, skipping",
                    record.address(),
                    record.kind()
                ));
                continue;
            };
            let matched = matched.clone();

            for converter in matched {
                let converted = converter
                    .convert(record, &self.config)
                    .with_context(|| format!("{}: converting resource to CAI", record.address()))?;

                for asset in converted {
                    let augmented = self
                        .augment(record, asset)
                        .with_context(|| format!("{}: resolving ancestry", record.address()))?;
                    let key = augmented.key();
                    if self.assets.contains_key(&key) {
                        output::warning(&format!(
                            "{}: duplicate asset {}, keeping the first",
                            record.address(),
                            augmented.name
                        ));
                        continue;
                    }
                    self.assets.insert(key, augmented);
                }
            }
        }
        Ok(())
    }

    /// Attach ancestry and the CAI parent, which the converters leave unset
    fn augment(&self, record: &ResourceData, mut asset: Asset) -> ConvertResult<Asset> {
        let (ancestors, parent) = self.ancestry.ancestors(&self.config, record, &asset)?;
        asset.ancestors = ancestors;
        if let Some(resource) = asset.resource.as_mut() {
            resource.parent = parent;
        }
        Ok(asset)
    }

    /// All converted assets, sorted by name for deterministic output
    pub fn assets(&self) -> Vec<Asset> {
        let mut list: Vec<Asset> = self.assets.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }
}

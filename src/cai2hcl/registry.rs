//! Converter registry for the asset -> HCL direction
//!
//! Maps a CAI asset type to either a single converter or, for ambiguous
//! types, an ordered table of disambiguation rules. The registry is built
//! once at startup and read-only afterwards; registering the same key twice
//! is a programming error and panics immediately.

use std::collections::HashMap;
use std::sync::Arc;

use crate::asset::Asset;
use crate::errors::{ConvertError, ConvertResult};
use crate::hclwrite::ResourceBlock;
use crate::output;

/// Converts one asset of a known type into HCL resource blocks.
/// Implementations are pure: no I/O, no state beyond construction.
pub trait Cai2hclConverter: Send + Sync {
    fn convert(&self, asset: &Asset) -> ConvertResult<Vec<ResourceBlock>>;
}

/// One candidate converter for an ambiguous asset type, selected by a
/// secondary signal on the asset (typically a name pattern).
pub struct DisambiguationRule {
    /// Terraform resource kind this rule selects
    pub name: &'static str,
    pub matches: fn(&Asset) -> bool,
    pub converter: Arc<dyn Cai2hclConverter>,
}

enum Entry {
    Single(Arc<dyn Cai2hclConverter>),
    Ambiguous(Vec<DisambiguationRule>),
}

#[derive(Default)]
pub struct ConverterRegistryBuilder {
    entries: HashMap<String, Entry>,
}

impl ConverterRegistryBuilder {
    pub fn register(
        mut self,
        asset_type: &str,
        converter: Arc<dyn Cai2hclConverter>,
    ) -> Self {
        let previous = self
            .entries
            .insert(asset_type.to_string(), Entry::Single(converter));
        if previous.is_some() {
            panic!("duplicate converter registered for asset type {}", asset_type);
        }
        self
    }

    /// Register a rule table for an ambiguous asset type. Rules are checked
    /// in order; the table must be total over valid inputs.
    pub fn register_ambiguous(
        mut self,
        asset_type: &str,
        rules: Vec<DisambiguationRule>,
    ) -> Self {
        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].iter().any(|r| r.name == rule.name) {
                panic!(
                    "duplicate disambiguation rule '{}' for asset type {}",
                    rule.name, asset_type
                );
            }
        }
        let previous = self
            .entries
            .insert(asset_type.to_string(), Entry::Ambiguous(rules));
        if previous.is_some() {
            panic!("duplicate converter registered for asset type {}", asset_type);
        }
        self
    }

    pub fn build(self) -> ConverterRegistry {
        ConverterRegistry {
            entries: self.entries,
        }
    }
}

/// Immutable dispatch table from asset type to converter
pub struct ConverterRegistry {
    entries: HashMap<String, Entry>,
}

impl ConverterRegistry {
    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::default()
    }

    pub fn is_registered(&self, asset_type: &str) -> bool {
        self.entries.contains_key(asset_type)
    }

    /// Convert one asset. Unregistered types are not an error: they have no
    /// Terraform equivalent and yield an empty result.
    pub fn convert_resource(&self, asset: &Asset) -> ConvertResult<Vec<ResourceBlock>> {
        let entry = match self.entries.get(&asset.asset_type) {
            Some(entry) => entry,
            None => {
                output::debug(&format!(
                    "{}: asset type {} is not convertible, skipping",
                    asset.name, asset.asset_type
                ));
                return Ok(Vec::new());
            }
        };

        let converter = match entry {
            Entry::Single(converter) => converter,
            Entry::Ambiguous(rules) => rules
                .iter()
                .find(|rule| (rule.matches)(asset))
                .map(|rule| &rule.converter)
                .ok_or_else(|| ConvertError::UnmatchedDisambiguation {
                    asset_type: asset.asset_type.clone(),
                    name: asset.name.clone(),
                })?,
        };

        converter.convert(asset)
    }
}

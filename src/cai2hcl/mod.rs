//! Asset -> HCL conversion pipeline
//!
//! Dispatches each asset in a batch through the converter registry and
//! renders the accumulated blocks. The batch is all-or-nothing: the first
//! converter error aborts the run and no partial output is returned.

pub mod converters;
pub mod registry;

use anyhow::{Context, Result};

use crate::asset::Asset;
use crate::hclwrite;

use registry::ConverterRegistry;

/// Convert a batch of assets into HCL text using the default registry
pub fn convert(assets: &[Asset]) -> Result<Vec<u8>> {
    let registry = converters::build_registry();
    convert_with_registry(&registry, assets)
}

/// Convert a batch of assets against an explicit registry. Inputs are never
/// mutated; assets without a registered converter contribute nothing.
pub fn convert_with_registry(registry: &ConverterRegistry, assets: &[Asset]) -> Result<Vec<u8>> {
    let mut blocks = Vec::new();
    for asset in assets {
        let converted = registry.convert_resource(asset).with_context(|| {
            format!("converting asset {} ({})", asset.name, asset.asset_type)
        })?;
        blocks.extend(converted);
    }
    Ok(hclwrite::emit(&blocks)?)
}

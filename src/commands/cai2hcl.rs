use crate::asset::Asset;
use crate::cai2hcl;
use crate::output;
use anyhow::{Context, Result};

/// Handles the 'cai2hcl' command - converts CAI asset JSON to HCL
pub struct Cai2hclCommand;

impl Cai2hclCommand {
    /// Execute the cai2hcl command
    pub fn execute(input: &str, output_path: Option<&str>) -> Result<()> {
        let raw = super::read_input(input)?;

        let assets: Vec<Asset> =
            serde_json::from_slice(&raw).context("parsing CAI asset input as JSON")?;

        output::debug(&format!("loaded {} assets from {}", assets.len(), input));

        let hcl = cai2hcl::convert(&assets)?;
        super::write_output(output_path, &hcl)?;

        if let Some(path) = output_path {
            output::success_with_details(
                "Conversion completed",
                &format!("{} assets processed, output written to {}", assets.len(), path),
            );
        }

        Ok(())
    }
}

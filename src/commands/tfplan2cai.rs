use crate::config::ConvertConfig;
use crate::output;
use crate::tfplan2cai;
use anyhow::{Context, Result};

/// Handles the 'tfplan2cai' command - converts a Terraform JSON plan to CAI assets
pub struct Tfplan2caiCommand;

impl Tfplan2caiCommand {
    /// Execute the tfplan2cai command
    pub fn execute(input: &str, output_path: Option<&str>, config: &ConvertConfig) -> Result<()> {
        let raw = super::read_input(input)?;

        let plan: serde_json::Value =
            serde_json::from_slice(&raw).context("parsing Terraform plan input as JSON")?;

        let records = tfplan2cai::plan::resource_changes(&plan, config.convert_unchanged)?;

        output::debug(&format!(
            "plan {} holds {} convertible resource changes",
            input,
            records.len()
        ));

        let assets = tfplan2cai::convert(&records, config)?;

        let mut json =
            serde_json::to_vec_pretty(&assets).context("serializing CAI assets to JSON")?;
        json.push(b'\n');
        super::write_output(output_path, &json)?;

        if let Some(path) = output_path {
            output::success_with_details(
                "Conversion completed",
                &format!("{} assets written to {}", assets.len(), path),
            );
        }

        Ok(())
    }
}

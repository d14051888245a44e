mod ancestry;
mod asset;
mod cai2hcl;
mod commands;
mod config;
mod errors;
mod hclwrite;
mod output;
mod tfdata;
mod tfplan2cai;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{Cai2hclCommand, Tfplan2caiCommand};
use config::ConvertConfig;

#[derive(Parser)]
#[command(name = "caiconv")]
#[command(about = "Convert between Google Cloud Asset Inventory JSON and Terraform HCL", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert CAI asset JSON to Terraform HCL resource blocks
    Cai2hcl {
        /// Asset JSON file to read ('-' for stdin)
        #[arg(short, long)]
        input: String,

        /// File to write the HCL to (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Convert a Terraform JSON plan to CAI asset JSON
    Tfplan2cai {
        /// Plan JSON file to read ('-' for stdin)
        #[arg(short, long)]
        input: String,

        /// File to write the asset JSON to (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Skip all network calls; ancestry comes from --ancestry-cache only
        #[arg(long)]
        offline: bool,

        /// Default project for resources that do not set one
        #[arg(long, env = "GOOGLE_PROJECT", default_value = "")]
        project: String,

        /// Default region
        #[arg(long, env = "GOOGLE_REGION", default_value = "")]
        region: String,

        /// Default zone
        #[arg(long, env = "GOOGLE_ZONE", default_value = "")]
        zone: String,

        /// Pre-seeded ancestry entry, repeatable: <key>=<ancestry-path>
        #[arg(long = "ancestry-cache", value_parser = config::parse_cache_entry)]
        ancestry_cache: Vec<(String, String)>,

        /// Also convert resources whose planned action is a no-op
        #[arg(long)]
        convert_unchanged: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Cai2hcl { input, output } => {
            Cai2hclCommand::execute(&input, output.as_deref())?;
        }
        Commands::Tfplan2cai {
            input,
            output,
            offline,
            project,
            region,
            zone,
            ancestry_cache,
            convert_unchanged,
        } => {
            let project = if project.is_empty() {
                config::fallback_project()
            } else {
                project
            };
            let config = ConvertConfig {
                offline,
                project,
                region,
                zone,
                ancestry_cache: ancestry_cache.into_iter().collect(),
                convert_unchanged,
                ..ConvertConfig::new()
            };
            Tfplan2caiCommand::execute(&input, output.as_deref(), &config)?;
        }
    }

    Ok(())
}

pub mod cai2hcl;
pub mod tfplan2cai;

pub use cai2hcl::Cai2hclCommand;
pub use tfplan2cai::Tfplan2caiCommand;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a command input: a file path, or stdin when the path is `-`
pub(crate) fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("reading from stdin")?;
        return Ok(buf);
    }
    std::fs::read(input).with_context(|| format!("reading input file '{}'", input))
}

/// Write a command result: to a file when given, stdout otherwise
pub(crate) fn write_output(output: Option<&str>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(Path::new(path), bytes)
                .with_context(|| format!("writing output file '{}'", path))?;
        }
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(bytes)
                .context("writing to stdout")?;
        }
    }
    Ok(())
}

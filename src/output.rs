//! Structured run output

use crate::error::Result;
use crate::types::PrUpdate;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Name of the output value holding the JSON list of updated PRs
pub const OUTPUT_NAME: &str = "pull_requests";

/// `name=value` line for the runner's output file
pub fn output_line(updates: &[PrUpdate]) -> Result<String> {
    let json = serde_json::to_string(updates)?;
    Ok(format!("{OUTPUT_NAME}={json}"))
}

/// Append the updates to the runner's output file
pub fn write_github_output(path: &Path, updates: &[PrUpdate]) -> Result<()> {
    let line = output_line(updates)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

use anyhow::{Context, Result};
use std::fs;
use std::process::ExitCode;
use tabprep::{ParseConfig, validate_upload};

use super::file_name_of;

pub fn run(path: &str, mime_type: Option<&str>, config: &ParseConfig) -> Result<ExitCode> {
    let metadata = fs::metadata(path).with_context(|| format!("Failed to stat file: {}", path))?;
    let name = file_name_of(path);

    validate_upload(&name, metadata.len(), mime_type, config)?;

    println!("OK: {} ({} bytes)", name, metadata.len());
    Ok(ExitCode::SUCCESS)
}

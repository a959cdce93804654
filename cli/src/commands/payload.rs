use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::process::ExitCode;
use tabprep::{DatasetViewResponse, ParseConfig, PreviewSession};

use crate::OutputFormat;

pub fn run(
    path: &str,
    rows: Option<usize>,
    format: OutputFormat,
    config: ParseConfig,
) -> Result<ExitCode> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read response: {}", path))?;
    let response = DatasetViewResponse::from_json(&text)
        .with_context(|| format!("Not a dataset-view response: {}", path))?;

    if !response.is_success() {
        warn!(
            "response status {:?}: {}",
            response.status_code,
            response.status_message.as_deref().unwrap_or("")
        );
    }

    let mut session = PreviewSession::new(config);
    session.load_payload(&response.result).with_context(|| {
        format!(
            "Failed to decode dataset '{}'",
            response.result.dataset_name.as_deref().unwrap_or("<unnamed>")
        )
    })?;

    super::preview::show(&session, rows, format)
}

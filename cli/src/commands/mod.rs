pub mod columns;
pub mod export;
pub mod payload;
pub mod preview;
pub mod validate;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tabprep::{FormatHint, ParseConfig, ParseOutcome, PreviewSession};

/// Exit status when the input held no parseable rows.
pub const EXIT_NOTHING_PARSED: u8 = 1;

pub fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Read `path` into a fresh session, using its file name (and an optional
/// declared type) as the format hint.
pub fn load_session(
    path: &str,
    declared_type: Option<&str>,
    config: ParseConfig,
) -> Result<PreviewSession> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read dataset: {}", path))?;

    let mut hint = FormatHint::from_file_name(file_name_of(path));
    if let Some(declared) = declared_type {
        hint = hint.with_declared_type(declared);
    }

    let mut session = PreviewSession::new(config);
    session
        .load_bytes(&bytes, &hint)
        .with_context(|| format!("Failed to decode dataset: {}", path))?;
    Ok(session)
}

/// Print the diagnostic for an outcome without rows. `None` when rows were
/// parsed and the command should carry on.
pub fn report_unparsed(outcome: &ParseOutcome) -> Option<ExitCode> {
    let message = outcome.diagnostic()?;
    match outcome.code() {
        Some(code) => eprintln!("{} [{}]", message, code),
        None => eprintln!("{}", message),
    }
    Some(ExitCode::from(EXIT_NOTHING_PARSED))
}

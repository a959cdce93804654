use anyhow::Result;
use std::io::{self, Write};
use std::process::ExitCode;
use tabprep::{ParseConfig, PreviewSession};

use super::{EXIT_NOTHING_PARSED, load_session, report_unparsed};
use crate::OutputFormat;
use crate::output::json::{PreviewJson, write_json};
use crate::output::text::write_preview;

pub fn run(
    path: &str,
    declared_type: Option<&str>,
    rows: Option<usize>,
    delete: Option<&str>,
    format: OutputFormat,
    config: ParseConfig,
) -> Result<ExitCode> {
    let mut session = load_session(path, declared_type, config)?;
    if let Some(list) = delete {
        session.set_delete_list_text(list);
    }
    show(&session, rows, format)
}

/// Render the session's current rows; shared with the `payload` command.
pub fn show(session: &PreviewSession, rows: Option<usize>, format: OutputFormat) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if !session.outcome().is_parsed() {
        if format == OutputFormat::Json {
            write_json(&mut handle, session.outcome())?;
            handle.flush()?;
            report_unparsed(session.outcome());
            return Ok(ExitCode::from(EXIT_NOTHING_PARSED));
        }
        if let Some(code) = report_unparsed(session.outcome()) {
            return Ok(code);
        }
    }

    match format {
        OutputFormat::Text => write_preview(&mut handle, session, rows)?,
        OutputFormat::Json => write_json(&mut handle, &PreviewJson::from_session(session, rows))?,
    }

    Ok(ExitCode::SUCCESS)
}

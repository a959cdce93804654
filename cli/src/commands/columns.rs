use anyhow::Result;
use std::io;
use std::process::ExitCode;
use tabprep::{ParseConfig, parse_delete_list};

use super::{load_session, report_unparsed};
use crate::OutputFormat;
use crate::output::json::{ColumnsJson, write_json};
use crate::output::text::write_columns;

pub fn run(
    path: &str,
    declared_type: Option<&str>,
    server_columns: Option<&str>,
    delete: Option<&str>,
    toggles: &[String],
    format: OutputFormat,
    config: ParseConfig,
) -> Result<ExitCode> {
    let mut session = load_session(path, declared_type, config)?;
    if let Some(list) = server_columns {
        session.set_server_columns(parse_delete_list(list));
    }
    if let Some(list) = delete {
        session.set_delete_list_text(list);
    }
    for name in toggles {
        session.toggle_column(name);
    }

    if session.all_columns().is_empty() {
        return Ok(report_unparsed(session.outcome()).unwrap_or(ExitCode::SUCCESS));
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => write_columns(&mut handle, &session)?,
        OutputFormat::Json => write_json(&mut handle, &ColumnsJson::from_session(&session))?,
    }
    Ok(ExitCode::SUCCESS)
}

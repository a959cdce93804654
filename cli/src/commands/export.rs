use anyhow::{Context, Result};
use std::fs;
use std::process::ExitCode;
use tabprep::{ExportFormat, ParseConfig, download_file_name};

use super::{file_name_of, load_session, report_unparsed};
use crate::ExportTarget;

pub fn run(
    path: &str,
    out: &str,
    declared_type: Option<&str>,
    delete: Option<&str>,
    to: Option<ExportTarget>,
    config: ParseConfig,
) -> Result<ExitCode> {
    let mut session = load_session(path, declared_type, config)?;
    if let Some(code) = report_unparsed(session.outcome()) {
        return Ok(code);
    }
    if let Some(list) = delete {
        session.set_delete_list_text(list);
    }

    let source_name = file_name_of(path);
    let format = match to {
        Some(ExportTarget::Csv) => ExportFormat::Csv,
        Some(ExportTarget::Xlsx) => ExportFormat::Xlsx,
        None => format_from_out_path(out).unwrap_or_else(|| {
            ExportFormat::for_dataset(Some(source_name.as_str()), declared_type)
        }),
    };

    let bytes = session.export_view(format)?;
    fs::write(out, &bytes).with_context(|| format!("Failed to write export: {}", out))?;

    let columns = session.display_columns();
    let rows = session.result().map(|r| r.rows.len()).unwrap_or(0);
    println!(
        "Wrote {} rows x {} columns to {} ({}; suggested download name: {})",
        rows,
        columns.len(),
        out,
        format.mime_type(),
        download_file_name(Some(source_name.as_str()), format)
    );
    Ok(ExitCode::SUCCESS)
}

fn format_from_out_path(out: &str) -> Option<ExportFormat> {
    let lower = out.to_ascii_lowercase();
    if lower.ends_with(".xlsx") {
        Some(ExportFormat::Xlsx)
    } else if lower.ends_with(".csv") {
        Some(ExportFormat::Csv)
    } else {
        None
    }
}

mod commands;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::process::ExitCode;
use tabprep::{DecodeError, ParseConfig};

#[derive(Parser)]
#[command(name = "tabprep")]
#[command(about = "Preview, prune and export CSV/XLSX contact lists")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub limits: LimitArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct LimitArgs {
    #[arg(long, global = true, value_name = "PATH", help = "Load parse settings from a JSON file")]
    pub config: Option<String>,
    #[arg(long, global = true, value_name = "N", help = "Data rows read from a CSV")]
    pub max_csv_rows: Option<usize>,
    #[arg(long, global = true, value_name = "N", help = "Data rows read from an XLSX sheet")]
    pub max_xlsx_rows: Option<usize>,
    #[arg(long, global = true, help = "Read every row of both formats")]
    pub no_row_limit: bool,
}

impl LimitArgs {
    fn load(&self) -> Result<ParseConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config: {}", path))?;
                serde_json::from_str::<ParseConfig>(&text)
                    .with_context(|| format!("Invalid config JSON: {}", path))?
            }
            None => ParseConfig::default(),
        };

        if self.no_row_limit {
            config.csv_row_limit = None;
            config.xlsx_row_limit = None;
        }
        if let Some(rows) = self.max_csv_rows {
            config.csv_row_limit = Some(rows);
        }
        if let Some(rows) = self.max_xlsx_rows {
            config.xlsx_row_limit = Some(rows);
        }

        config.validate().context("Invalid parse settings")?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Parse a CSV or XLSX file and show its first rows")]
    Preview {
        #[arg(help = "Path to the dataset")]
        path: String,
        #[arg(long = "type", value_name = "TYPE", help = "Declared dataset type (csv, xlsx, ...)")]
        declared_type: Option<String>,
        #[arg(long, default_value_t = 10, help = "Rows to show")]
        rows: usize,
        #[arg(long, help = "Show every parsed row")]
        all: bool,
        #[arg(long, value_name = "LIST", help = "Comma-separated columns to hide")]
        delete: Option<String>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
    },
    #[command(about = "Resolve the active columns and edit a delete list")]
    Columns {
        #[arg(help = "Path to the dataset")]
        path: String,
        #[arg(long = "type", value_name = "TYPE", help = "Declared dataset type (csv, xlsx, ...)")]
        declared_type: Option<String>,
        #[arg(long, value_name = "LIST", help = "Comma-separated column list reported by the server")]
        server_columns: Option<String>,
        #[arg(long, value_name = "LIST", help = "Starting delete list")]
        delete: Option<String>,
        #[arg(long, value_name = "NAME", help = "Toggle a column in the delete list (repeatable)")]
        toggle: Vec<String>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
    },
    #[command(about = "Write the visible columns of a dataset to CSV or XLSX")]
    Export {
        #[arg(help = "Path to the dataset")]
        path: String,
        #[arg(help = "Output file")]
        out: String,
        #[arg(long = "type", value_name = "TYPE", help = "Declared dataset type (csv, xlsx, ...)")]
        declared_type: Option<String>,
        #[arg(long, value_name = "LIST", help = "Comma-separated columns to leave out")]
        delete: Option<String>,
        #[arg(long, value_enum, help = "Output format (default: from the output file name)")]
        to: Option<ExportTarget>,
    },
    #[command(about = "Parse a saved dataset-view API response")]
    Payload {
        #[arg(help = "Path to the response JSON")]
        path: String,
        #[arg(long, default_value_t = 10, help = "Rows to show")]
        rows: usize,
        #[arg(long, help = "Show every parsed row")]
        all: bool,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
    },
    #[command(about = "Check a file against the upload rules")]
    Validate {
        #[arg(help = "Path to the file to upload")]
        path: String,
        #[arg(long, value_name = "MIME", help = "MIME type reported by the browser")]
        mime_type: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ExportTarget {
    Csv,
    Xlsx,
}

fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();

    let result = cli.limits.load().and_then(|config| match cli.command {
        Commands::Preview {
            path,
            declared_type,
            rows,
            all,
            delete,
            format,
        } => commands::preview::run(
            &path,
            declared_type.as_deref(),
            row_limit(rows, all),
            delete.as_deref(),
            format,
            config,
        ),
        Commands::Columns {
            path,
            declared_type,
            server_columns,
            delete,
            toggle,
            format,
        } => commands::columns::run(
            &path,
            declared_type.as_deref(),
            server_columns.as_deref(),
            delete.as_deref(),
            &toggle,
            format,
            config,
        ),
        Commands::Export {
            path,
            out,
            declared_type,
            delete,
            to,
        } => commands::export::run(
            &path,
            &out,
            declared_type.as_deref(),
            delete.as_deref(),
            to,
            config,
        ),
        Commands::Payload {
            path,
            rows,
            all,
            format,
        } => commands::payload::run(&path, row_limit(rows, all), format, config),
        Commands::Validate { path, mime_type } => {
            commands::validate::run(&path, mime_type.as_deref(), &config)
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for_error(&e)
        }
    }
}

fn row_limit(rows: usize, all: bool) -> Option<usize> {
    if all { None } else { Some(rows) }
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if is_internal_error(err) {
        ExitCode::from(3)
    } else {
        ExitCode::from(2)
    }
}

fn is_internal_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<DecodeError>()
            .is_some_and(|decode| !matches!(decode, DecodeError::Io(_)))
            || cause.is::<tabprep::ExportError>()
    })
}

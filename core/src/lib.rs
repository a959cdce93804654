//! tabprep: tabular dataset parsing and column reconciliation.
//!
//! This crate provides functionality for:
//! - Parsing CSV text and the first sheet of `.xlsx` workbooks into rows
//!   keyed by column name
//! - Dispatching on a declared type or file name, with CSV and JSON
//!   fallbacks when the primary format yields nothing
//! - Reconciling candidate column lists and a free-text delete list
//! - Serializing rows back to CSV or XLSX for download
//!
//! # Quick Start
//!
//! ```
//! use tabprep::{FormatHint, ParseConfig, parse_auto, toggle_column, display_columns};
//!
//! let outcome = parse_auto(
//!     b"Name,Email,Phone\nAnn,ann@example.com,555\n",
//!     &FormatHint::from_file_name("contacts.csv"),
//!     &ParseConfig::default(),
//! )?;
//! let result = outcome.result().expect("rows parsed");
//!
//! let delete_list = toggle_column("", "Phone");
//! assert_eq!(display_columns(&result.columns, &delete_list), ["Name", "Email"]);
//! # Ok::<(), tabprep::DecodeError>(())
//! ```

mod columns;
mod config;
mod csv;
mod decode;
mod dispatch;
pub mod error_codes;
mod export;
mod json_records;
mod payload;
mod session;
mod table;
mod upload;
pub mod xlsx;

pub use columns::{
    ColumnCandidate, ColumnSource, DeleteSet, clean_column_values, clean_columns,
    display_columns, parse_delete_list, pending_deletions, resolve_columns,
    serialize_delete_list, toggle_column,
};
pub use config::{
    ConfigError, DEFAULT_CSV_ROW_LIMIT, DEFAULT_MAX_UPLOAD_BYTES, ParseConfig, ParseConfigBuilder,
};
pub use csv::{parse_csv, parse_csv_with_limit, sniff_delimiter, tokenize_line};
pub use decode::{ContentEncoding, DecodeError, decode_base64, decode_text};
pub use dispatch::{DetectedFormat, FormatHint, ParseAttempt, ParseMethod, ParseOutcome, parse_auto};
pub use export::{
    CSV_MIME_TYPE, ExportError, ExportFormat, XLSX_MIME_TYPE, download_file_name, rows_to_csv,
    rows_to_xlsx,
};
pub use json_records::{JsonRecordsError, parse_json_records};
pub use payload::{ColumnsResponse, DatasetPayload, DatasetViewResponse, RemoveColumnsRequest};
pub use session::PreviewSession;
pub use table::{ParseResult, Row, project_rows};
pub use upload::{UploadError, validate_upload};
pub use xlsx::{ArchiveError, ArchiveLimits, SheetXmlError, parse_xlsx, parse_xlsx_with_config};

/// Read a local file and parse it with its name as the format hint.
#[cfg(feature = "std-fs")]
pub fn parse_path(
    path: impl AsRef<std::path::Path>,
    config: &ParseConfig,
) -> Result<ParseOutcome, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let hint = path
        .file_name()
        .map(|name| FormatHint::from_file_name(name.to_string_lossy()))
        .unwrap_or_default();
    parse_auto(&bytes, &hint, config)
}

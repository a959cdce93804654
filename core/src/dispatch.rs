//! Format dispatch and the fallback chain behind [`parse_auto`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ParseConfig;
use crate::csv::parse_csv_with_limit;
use crate::decode::{DecodeError, decode_text, is_blank};
use crate::error_codes;
use crate::json_records::parse_json_records;
use crate::table::ParseResult;
use crate::xlsx::{looks_like_zip, parse_xlsx_with_config};

const XLSX_MIME_MARKER: &str = "spreadsheetml";

/// What the caller knows about the bytes: the API's `dataset_type` and/or a
/// file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatHint {
    pub declared_type: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedFormat {
    Xlsx,
    Csv,
    /// The hint names some other format; carries the label as given.
    Unsupported(String),
}

impl FormatHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file_name(name: impl Into<String>) -> Self {
        Self::new().with_file_name(name)
    }

    pub fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// XLSX wins when either the declared type or the file extension says
    /// so. Anything naming CSV or plain text is CSV. A hint that names only
    /// some other format is unsupported, and no hint at all means CSV.
    pub fn detect(&self) -> DetectedFormat {
        let declared = self
            .declared_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let declared_lower = declared.map(|t| t.trim_start_matches('.').to_ascii_lowercase());
        let extension = self.file_name.as_deref().and_then(file_extension);

        let declares_xlsx = declared_lower
            .as_deref()
            .is_some_and(|t| t == "xlsx" || t.contains(XLSX_MIME_MARKER));
        if declares_xlsx || extension.as_deref() == Some("xlsx") {
            return DetectedFormat::Xlsx;
        }

        let declares_csv = declared_lower.as_deref().is_some_and(|t| {
            matches!(t, "csv" | "txt" | "tsv" | "text") || t.starts_with("text/")
        });
        let csv_extension = extension
            .as_deref()
            .is_some_and(|e| matches!(e, "csv" | "txt" | "tsv"));
        if declares_csv || csv_extension {
            return DetectedFormat::Csv;
        }

        match (declared, extension) {
            (Some(label), _) => DetectedFormat::Unsupported(label.to_string()),
            (None, Some(ext)) => DetectedFormat::Unsupported(ext),
            (None, None) => DetectedFormat::Csv,
        }
    }
}

/// Lowercased text after the last `.` of the final path segment.
fn file_extension(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMethod {
    Xlsx,
    Csv,
    /// Bytes declared as XLSX that were really delimited text.
    CsvFallbackForXlsx,
    Json,
}

impl fmt::Display for ParseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParseMethod::Xlsx => "xlsx",
            ParseMethod::Csv => "csv",
            ParseMethod::CsvFallbackForXlsx => "csv (xlsx fallback)",
            ParseMethod::Json => "json",
        };
        f.write_str(label)
    }
}

/// One method tried by [`parse_auto`] and why it produced no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseAttempt {
    pub method: ParseMethod,
    pub reason: String,
}

/// Every way a parse can end without a [`DecodeError`].
///
/// `Empty` is a legitimately empty file; `Failed` means bytes were present
/// but no method could read a table out of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseOutcome {
    Parsed {
        method: ParseMethod,
        result: ParseResult,
    },
    Empty,
    Unsupported {
        message: String,
    },
    Failed {
        message: String,
        attempts: Vec<ParseAttempt>,
    },
}

impl ParseOutcome {
    pub(crate) fn unsupported(label: &str) -> Self {
        ParseOutcome::Unsupported {
            message: format!("Unsupported dataset type: {label}. Expected CSV or XLSX format."),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed { .. })
    }

    pub fn method(&self) -> Option<ParseMethod> {
        match self {
            ParseOutcome::Parsed { method, .. } => Some(*method),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ParseResult> {
        match self {
            ParseOutcome::Parsed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The parsed table, or an empty one for every other outcome.
    pub fn into_result(self) -> ParseResult {
        match self {
            ParseOutcome::Parsed { result, .. } => result,
            _ => ParseResult::empty(),
        }
    }

    /// Message for the UI; `None` when rows were parsed.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            ParseOutcome::Parsed { .. } => None,
            ParseOutcome::Empty => Some("The dataset is empty."),
            ParseOutcome::Unsupported { message } | ParseOutcome::Failed { message, .. } => {
                Some(message)
            }
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            ParseOutcome::Parsed { .. } => None,
            ParseOutcome::Empty => Some(error_codes::PARSE_EMPTY),
            ParseOutcome::Unsupported { .. } => Some(error_codes::PARSE_UNSUPPORTED_FORMAT),
            ParseOutcome::Failed { .. } => Some(error_codes::PARSE_FAILED),
        }
    }
}

/// Parse decoded file bytes according to `hint`, falling back when the
/// primary format yields no rows.
///
/// Order: the detected format first (XLSX or CSV); for XLSX, the same bytes
/// as CSV when they are not a ZIP; then a JSON array of objects. Bytes that
/// are a ZIP but not a readable workbook are a [`DecodeError`].
pub fn parse_auto(
    bytes: &[u8],
    hint: &FormatHint,
    config: &ParseConfig,
) -> Result<ParseOutcome, DecodeError> {
    let format = hint.detect();
    debug!("parse_auto: detected {:?} from {:?}", format, hint);

    if let DetectedFormat::Unsupported(label) = &format {
        return Ok(ParseOutcome::unsupported(label));
    }
    if is_blank(bytes) {
        return Ok(ParseOutcome::Empty);
    }

    let is_zip = looks_like_zip(bytes);
    let mut attempts = Vec::new();

    if format == DetectedFormat::Xlsx {
        match parse_xlsx_with_config(bytes, config) {
            Ok(result) if !result.is_empty() => {
                return Ok(ParseOutcome::Parsed {
                    method: ParseMethod::Xlsx,
                    result,
                });
            }
            Ok(result) if result.columns.is_empty() => return Ok(ParseOutcome::Empty),
            Ok(_) => attempts.push(ParseAttempt {
                method: ParseMethod::Xlsx,
                reason: "first sheet has a header row but no data rows".to_string(),
            }),
            Err(err) if is_zip => return Err(err),
            Err(err) => attempts.push(ParseAttempt {
                method: ParseMethod::Xlsx,
                reason: err.to_string(),
            }),
        }

        if config.csv_fallback_for_xlsx && !is_zip {
            warn!("parse_auto: declared xlsx is not a workbook; retrying as csv");
            let result = parse_csv_with_limit(&decode_text(bytes), config.csv_row_limit);
            if !result.is_empty() {
                return Ok(ParseOutcome::Parsed {
                    method: ParseMethod::CsvFallbackForXlsx,
                    result,
                });
            }
            attempts.push(ParseAttempt {
                method: ParseMethod::CsvFallbackForXlsx,
                reason: csv_failure_reason(&result),
            });
        }
    } else {
        let result = parse_csv_with_limit(&decode_text(bytes), config.csv_row_limit);
        if !result.is_empty() {
            return Ok(ParseOutcome::Parsed {
                method: ParseMethod::Csv,
                result,
            });
        }
        attempts.push(ParseAttempt {
            method: ParseMethod::Csv,
            reason: csv_failure_reason(&result),
        });
    }

    if config.json_fallback && !is_zip {
        match parse_json_records(&decode_text(bytes)) {
            Ok(result) => {
                warn!("parse_auto: read dataset as a JSON array of records");
                return Ok(ParseOutcome::Parsed {
                    method: ParseMethod::Json,
                    result,
                });
            }
            Err(err) => attempts.push(ParseAttempt {
                method: ParseMethod::Json,
                reason: err.to_string(),
            }),
        }
    }

    let tried = attempts
        .iter()
        .map(|a| format!("{}: {}", a.method, a.reason))
        .collect::<Vec<_>>()
        .join("; ");
    Ok(ParseOutcome::Failed {
        message: format!("Could not read any rows from the dataset ({tried})."),
        attempts,
    })
}

fn csv_failure_reason(result: &ParseResult) -> String {
    if result.columns.is_empty() {
        "no header row could be read".to_string()
    } else {
        "header row only, no data rows".to_string()
    }
}

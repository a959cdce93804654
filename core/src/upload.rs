//! Checks applied to a local file before it is uploaded as a dataset.

use thiserror::Error;

use crate::config::ParseConfig;
use crate::error_codes;
use crate::export::{CSV_MIME_TYPE, XLSX_MIME_TYPE};

const ALLOWED_EXTENSIONS: [&str; 2] = [".csv", ".xlsx"];
const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UploadError {
    #[error("Invalid file type. Only .csv and .xlsx files are allowed.")]
    InvalidType { file_name: String },
    #[error("Invalid file format. Please ensure your file is a valid CSV or Excel (.xlsx) file.")]
    InvalidFormat { mime_type: String },
    #[error(
        "File size ({size_mb}MB) exceeds the {limit_mb}MB limit. Please upload a smaller file."
    )]
    TooLarge {
        size_bytes: u64,
        size_mb: u64,
        limit_mb: u64,
    },
}

impl UploadError {
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::InvalidType { .. } => error_codes::UPLOAD_INVALID_TYPE,
            UploadError::InvalidFormat { .. } => error_codes::UPLOAD_INVALID_FORMAT,
            UploadError::TooLarge { .. } => error_codes::UPLOAD_TOO_LARGE,
        }
    }
}

/// Extension, then MIME type (when the caller knows one), then size.
pub fn validate_upload(
    file_name: &str,
    size_bytes: u64,
    mime_type: Option<&str>,
    config: &ParseConfig,
) -> Result<(), UploadError> {
    let lower = file_name.trim().to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(*ext)) {
        return Err(UploadError::InvalidType {
            file_name: file_name.to_string(),
        });
    }

    if let Some(mime) = mime_type.map(str::trim)
        && !(mime.eq_ignore_ascii_case(CSV_MIME_TYPE) || mime.eq_ignore_ascii_case(XLSX_MIME_TYPE))
    {
        return Err(UploadError::InvalidFormat {
            mime_type: mime.to_string(),
        });
    }

    if size_bytes > config.max_upload_bytes {
        return Err(UploadError::TooLarge {
            size_bytes,
            size_mb: round_mb(size_bytes),
            limit_mb: round_mb(config.max_upload_bytes),
        });
    }

    Ok(())
}

fn round_mb(bytes: u64) -> u64 {
    (bytes + BYTES_PER_MB / 2) / BYTES_PER_MB
}

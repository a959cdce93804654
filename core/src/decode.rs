//! Transport decoding: base64 payloads, encoding labels and byte-to-text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::borrow::Cow;
use thiserror::Error;

use crate::error_codes;
use crate::xlsx::{ArchiveError, SheetXmlError};

/// Input bytes could not be decoded at all. Fatal to one parse call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("base64 decoding failed: {0}")]
    Base64(String),
    #[error("unsupported content encoding '{0}'")]
    UnsupportedEncoding(String),
    #[error("workbook archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("workbook XML error: {0}")]
    SheetXml(#[from] SheetXmlError),
    #[error("xl/workbook.xml missing from archive")]
    WorkbookXmlMissing,
    #[error("failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::Base64(_) => error_codes::DECODE_BASE64,
            DecodeError::UnsupportedEncoding(_) => error_codes::DECODE_UNSUPPORTED_ENCODING,
            DecodeError::Archive(err) => err.code(),
            DecodeError::SheetXml(err) => err.code(),
            DecodeError::WorkbookXmlMissing => error_codes::DECODE_WORKBOOK_MISSING,
            DecodeError::Io(_) => error_codes::DECODE_IO,
        }
    }
}

/// How the `content` field of a dataset payload is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Base64,
    Text,
}

impl ContentEncoding {
    /// Map an `encoding` label from the API. A missing or blank label means base64.
    pub fn from_label(label: Option<&str>) -> Result<Self, DecodeError> {
        let normalized = label.map(|l| l.trim().to_ascii_lowercase()).unwrap_or_default();
        match normalized.as_str() {
            "" | "base64" | "b64" => Ok(ContentEncoding::Base64),
            "utf-8" | "utf8" | "text" | "plain" => Ok(ContentEncoding::Text),
            _ => Err(DecodeError::UnsupportedEncoding(normalized)),
        }
    }

    pub fn decode(self, content: &str) -> Result<Vec<u8>, DecodeError> {
        match self {
            ContentEncoding::Base64 => decode_base64(content),
            ContentEncoding::Text => Ok(content.as_bytes().to_vec()),
        }
    }
}

/// Decode standard base64, ignoring embedded whitespace and an optional
/// `data:...;base64,` prefix.
pub fn decode_base64(content: &str) -> Result<Vec<u8>, DecodeError> {
    let body = match content.find(";base64,") {
        Some(idx) if content.trim_start().starts_with("data:") => &content[idx + 8..],
        _ => content,
    };
    let cleaned: String = body.split_whitespace().collect();
    STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|err| DecodeError::Base64(err.to_string()))
}

/// Turn file bytes into text for the delimited and JSON parsers.
///
/// UTF-16 input is recognized by its byte-order mark; everything else is read
/// as UTF-8 with the BOM stripped and invalid sequences replaced.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return Cow::Owned(decode_utf16(rest, true));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return Cow::Owned(decode_utf16(rest, false));
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

fn decode_utf16(bytes: &[u8], little_endian: bool) -> String {
    let units = bytes.chunks_exact(2).map(|pair| {
        if little_endian {
            u16::from_le_bytes([pair[0], pair[1]])
        } else {
            u16::from_be_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// True when the bytes hold nothing but whitespace once decoded.
pub(crate) fn is_blank(bytes: &[u8]) -> bool {
    decode_text(bytes).trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_base64_rejects_invalid() {
        let err = decode_base64("!!!").expect_err("invalid base64 should fail");
        assert!(matches!(err, DecodeError::Base64(_)));
        assert_eq!(err.code(), error_codes::DECODE_BASE64);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn decode_base64_tolerates_line_breaks_and_data_urls() {
        assert_eq!(decode_base64("QSxC\nCjEs\r\nMg==").unwrap(), b"A,B\n1,2");
        assert_eq!(
            decode_base64("data:text/csv;base64,QSxC").unwrap(),
            b"A,B".to_vec()
        );
    }

    #[test]
    fn encoding_labels() {
        assert_eq!(ContentEncoding::from_label(None).unwrap(), ContentEncoding::Base64);
        assert_eq!(
            ContentEncoding::from_label(Some(" BASE64 ")).unwrap(),
            ContentEncoding::Base64
        );
        assert_eq!(
            ContentEncoding::from_label(Some("utf-8")).unwrap(),
            ContentEncoding::Text
        );
        let err = ContentEncoding::from_label(Some("gzip")).expect_err("gzip is not supported");
        assert!(matches!(err, DecodeError::UnsupportedEncoding(label) if label == "gzip"));
    }

    #[test]
    fn decode_text_strips_bom_and_reads_utf16() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFA,B"), "A,B");
        let utf16: Vec<u8> = [0xFF, 0xFE, b'A', 0, b';', 0, b'B', 0].to_vec();
        assert_eq!(decode_text(&utf16), "A;B");
        assert_eq!(decode_text(b"caf\xC3\xA9"), "café");
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(b""));
        assert!(is_blank(b" \r\n\t"));
        assert!(!is_blank(b"A"));
    }
}

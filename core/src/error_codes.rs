//! Stable, machine-readable error codes.
//!
//! Messages may be reworded between releases; these codes may not. The UI
//! keys its retry/explain affordances off them.

pub const ARCHIVE_IO: &str = "TP_ARCHIVE_IO";
pub const ARCHIVE_NOT_ZIP: &str = "TP_ARCHIVE_NOT_ZIP";
pub const ARCHIVE_NOT_OPC: &str = "TP_ARCHIVE_NOT_OPC";
pub const ARCHIVE_TOO_MANY_ENTRIES: &str = "TP_ARCHIVE_TOO_MANY_ENTRIES";
pub const ARCHIVE_PART_TOO_LARGE: &str = "TP_ARCHIVE_PART_TOO_LARGE";
pub const ARCHIVE_TOTAL_TOO_LARGE: &str = "TP_ARCHIVE_TOTAL_TOO_LARGE";
pub const ARCHIVE_READ: &str = "TP_ARCHIVE_READ";

pub const SHEET_XML: &str = "TP_SHEET_XML";
pub const SHEET_INVALID_CELL_REF: &str = "TP_SHEET_INVALID_CELL_REF";
pub const SHEET_SHARED_STRING_OOB: &str = "TP_SHEET_SHARED_STRING_OOB";

pub const DECODE_BASE64: &str = "TP_DECODE_BASE64";
pub const DECODE_UNSUPPORTED_ENCODING: &str = "TP_DECODE_UNSUPPORTED_ENCODING";
pub const DECODE_WORKBOOK_MISSING: &str = "TP_DECODE_WORKBOOK_MISSING";
pub const DECODE_IO: &str = "TP_DECODE_IO";

pub const PARSE_EMPTY: &str = "TP_PARSE_EMPTY";
pub const PARSE_UNSUPPORTED_FORMAT: &str = "TP_PARSE_UNSUPPORTED_FORMAT";
pub const PARSE_FAILED: &str = "TP_PARSE_FAILED";

pub const EXPORT_XLSX: &str = "TP_EXPORT_XLSX";

pub const UPLOAD_INVALID_TYPE: &str = "TP_UPLOAD_INVALID_TYPE";
pub const UPLOAD_INVALID_FORMAT: &str = "TP_UPLOAD_INVALID_FORMAT";
pub const UPLOAD_TOO_LARGE: &str = "TP_UPLOAD_TOO_LARGE";

//! Serializing rows back into downloadable CSV or XLSX files.

use rust_xlsxwriter::{Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::csv::sniff_delimiter;
use crate::error_codes;
use crate::table::Row;

pub const CSV_MIME_TYPE: &str = "text/csv";
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DEFAULT_DOWNLOAD_NAME: &str = "dataset";
const EXPORT_SHEET_NAME: &str = "Sheet1";
const CSV_DELIMITERS: [char; 3] = [',', ';', '\t'];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("too many columns for a worksheet: {0}")]
    TooManyColumns(usize),
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        error_codes::EXPORT_XLSX
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_MIME_TYPE,
            ExportFormat::Xlsx => XLSX_MIME_TYPE,
        }
    }

    /// Extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Download in the dataset's own format: Excel when its name ends in
    /// `.xlsx`/`.xls` or its declared type is `xlsx`, CSV otherwise.
    pub fn for_dataset(name: Option<&str>, declared_type: Option<&str>) -> Self {
        let name = name.unwrap_or_default().trim().to_ascii_lowercase();
        let declared = declared_type.unwrap_or_default().trim();
        if name.ends_with(".xlsx") || name.ends_with(".xls") || declared.eq_ignore_ascii_case("xlsx")
        {
            ExportFormat::Xlsx
        } else {
            ExportFormat::Csv
        }
    }
}

/// `name` without its last extension, plus the format's extension.
pub fn download_file_name(name: Option<&str>, format: ExportFormat) -> String {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    let base = name.map(strip_extension).unwrap_or(DEFAULT_DOWNLOAD_NAME);
    let base = if base.is_empty() {
        DEFAULT_DOWNLOAD_NAME
    } else {
        base
    };
    format!("{base}.{}", format.extension())
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => name,
    }
}

/// Header line then one line per row, `\n`-separated, no trailing newline.
/// Missing cells are written empty.
///
/// Comma-delimited unless the header itself would sniff as something else
/// on the way back in; then the first delimiter that sniffs back to itself
/// is used for the whole file.
pub fn rows_to_csv(columns: &[String], rows: &[Row]) -> String {
    let delimiter = export_delimiter(columns);
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_fields(columns.iter().map(String::as_str), delimiter));
    for row in rows {
        lines.push(join_fields(
            columns
                .iter()
                .map(|name| row.get(name).map(String::as_str).unwrap_or("")),
            delimiter,
        ));
    }
    lines.join("\n")
}

fn export_delimiter(columns: &[String]) -> char {
    CSV_DELIMITERS
        .into_iter()
        .find(|&delimiter| {
            let header = join_fields(columns.iter().map(String::as_str), delimiter);
            sniff_delimiter(&header) == delimiter
        })
        .unwrap_or(',')
}

fn join_fields<'a>(fields: impl Iterator<Item = &'a str>, delimiter: char) -> String {
    fields
        .map(|field| escape_csv_field(field, delimiter))
        .collect::<Vec<_>>()
        .join(delimiter.to_string().as_str())
}

fn escape_csv_field(value: &str, delimiter: char) -> String {
    if value.contains([',', '"', '\r', '\n', delimiter]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// A single `Sheet1` workbook: header in the first row, every cell written
/// as a string, empty cells left blank.
pub fn rows_to_xlsx(columns: &[String], rows: &[Row]) -> Result<Vec<u8>, ExportError> {
    if columns.len() > u16::MAX as usize {
        return Err(ExportError::TooManyColumns(columns.len()));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, name) in columns.iter().enumerate() {
        if !name.is_empty() {
            worksheet.write_string(0, col as u16, name)?;
        }
    }

    for (idx, row) in rows.iter().enumerate() {
        let row_num = u32::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, name) in columns.iter().enumerate() {
            match row.get(name) {
                Some(value) if !value.is_empty() => {
                    worksheet.write_string(row_num, col as u16, value)?;
                }
                _ => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_csv;
    use crate::xlsx::parse_xlsx;

    fn table() -> (Vec<String>, Vec<Row>) {
        let columns: Vec<String> = ["Name", "Company", "Note"].iter().map(|s| s.to_string()).collect();
        let rows = vec![
            Row::from([
                ("Name".to_string(), "Ann".to_string()),
                ("Company".to_string(), "Acme, Inc.".to_string()),
                ("Note".to_string(), "said \"hi\" twice".to_string()),
            ]),
            Row::from([
                ("Name".to_string(), "Bob".to_string()),
                ("Company".to_string(), String::new()),
                ("Note".to_string(), "0042".to_string()),
            ]),
        ];
        (columns, rows)
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let (columns, rows) = table();
        assert_eq!(
            rows_to_csv(&columns, &rows),
            "Name,Company,Note\nAnn,\"Acme, Inc.\",\"said \"\"hi\"\" twice\"\nBob,,0042"
        );
    }

    #[test]
    fn csv_round_trip() {
        let (columns, rows) = table();
        let parsed = parse_csv(&rows_to_csv(&columns, &rows));
        assert_eq!(parsed.columns, columns);
        assert_eq!(parsed.rows, rows);
    }

    #[test]
    fn header_with_semicolons_switches_delimiter() {
        let columns: Vec<String> =
            ["Region;Zone;Area", "Name"].iter().map(|s| s.to_string()).collect();
        let rows = vec![Row::from([
            ("Region;Zone;Area".to_string(), "EU;West".to_string()),
            ("Name".to_string(), "Ann, Jr.".to_string()),
        ])];

        let text = rows_to_csv(&columns, &rows);
        assert_eq!(text, "\"Region;Zone;Area\";Name\n\"EU;West\";\"Ann, Jr.\"");
        let parsed = parse_csv(&text);
        assert_eq!(parsed.columns, columns);
        assert_eq!(parsed.rows, rows);
    }

    #[test]
    fn header_with_tabs_round_trips() {
        let columns: Vec<String> = ["a\tb\tc\td", "x"].iter().map(|s| s.to_string()).collect();
        let rows = vec![Row::from([
            ("a\tb\tc\td".to_string(), "1".to_string()),
            ("x".to_string(), "2".to_string()),
        ])];

        let text = rows_to_csv(&columns, &rows);
        assert!(text.starts_with("a\tb\tc\td;x\n"), "{text:?}");
        let parsed = parse_csv(&text);
        assert_eq!(parsed.columns, columns);
        assert_eq!(parsed.rows, rows);
    }

    #[test]
    fn xlsx_round_trip() {
        let (columns, rows) = table();
        let bytes = rows_to_xlsx(&columns, &rows).expect("workbook written");
        let parsed = parse_xlsx(&bytes).expect("workbook read back");
        assert_eq!(parsed.columns, columns);
        assert_eq!(parsed.rows, rows);
    }

    #[test]
    fn formats_and_file_names() {
        assert_eq!(ExportFormat::Xlsx.mime_type(), XLSX_MIME_TYPE);
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(
            ExportFormat::for_dataset(Some("Leads.XLS"), None),
            ExportFormat::Xlsx
        );
        assert_eq!(
            ExportFormat::for_dataset(Some("leads"), Some("xlsx")),
            ExportFormat::Xlsx
        );
        assert_eq!(ExportFormat::for_dataset(None, Some("csv")), ExportFormat::Csv);

        assert_eq!(
            download_file_name(Some("q3.leads.xlsx"), ExportFormat::Csv),
            "q3.leads.csv"
        );
        assert_eq!(download_file_name(Some("contacts"), ExportFormat::Xlsx), "contacts.xlsx");
        assert_eq!(download_file_name(None, ExportFormat::Csv), "dataset.csv");
        assert_eq!(download_file_name(Some(".csv"), ExportFormat::Csv), "dataset.csv");
    }
}

//! Worksheet XML to a dense grid of display strings.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::cell_ref::{MAX_COLS, MAX_ROWS, cell_ref_to_index, row_number_to_index};
use super::number_format::{format_date_serial, format_general};
use super::workbook_xml::{
    CellStyles, get_attr_value, read_rich_text, read_text_until_end, to_xml_err,
};
use crate::error_codes;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetXmlError {
    #[error("XML parse error: {0}")]
    Xml(String),
    #[error("invalid cell reference: {0}")]
    InvalidCellRef(String),
    #[error("shared string index {0} out of bounds")]
    SharedStringOutOfBounds(usize),
}

impl SheetXmlError {
    pub fn code(&self) -> &'static str {
        match self {
            SheetXmlError::Xml(_) => error_codes::SHEET_XML,
            SheetXmlError::InvalidCellRef(_) => error_codes::SHEET_INVALID_CELL_REF,
            SheetXmlError::SharedStringOutOfBounds(_) => error_codes::SHEET_SHARED_STRING_OOB,
        }
    }
}

/// Workbook-wide lookups a sheet needs to render its cells.
pub struct SheetContext<'a> {
    pub shared_strings: &'a [String],
    pub styles: &'a CellStyles,
    pub date1904: bool,
}

struct ParsedCell {
    row: u32,
    col: u32,
    text: String,
}

/// Rows of rendered cell text, top to bottom. The grid spans from the
/// leftmost to the rightmost occupied column; rows with no non-empty cell
/// are dropped and gaps inside a row become `""`.
pub fn parse_sheet_rows(
    xml: &[u8],
    ctx: &SheetContext<'_>,
) -> Result<Vec<Vec<String>>, SheetXmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut cells = Vec::new();
    let mut current_row: u32 = 0;
    let mut next_row: u32 = 0;
    let mut next_col: u32 = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"row" => {
                current_row = match get_attr_value(&e, b"r")? {
                    Some(raw) => {
                        row_number_to_index(&raw).ok_or(SheetXmlError::InvalidCellRef(raw))?
                    }
                    None if next_row < MAX_ROWS => next_row,
                    None => {
                        return Err(SheetXmlError::InvalidCellRef(format!("row {}", next_row + 1)));
                    }
                };
                next_row = current_row.saturating_add(1);
                next_col = 0;
            }
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"c" => {
                let (row, col) = cell_position(&e, current_row, next_col)?;
                let text = read_cell(&mut reader, &e, ctx)?;
                next_col = col.saturating_add(1);
                if !text.is_empty() {
                    cells.push(ParsedCell { row, col, text });
                }
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"c" => {
                let (_, col) = cell_position(&e, current_row, next_col)?;
                next_col = col.saturating_add(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(build_rows(cells))
}

fn cell_position(
    element: &BytesStart<'_>,
    current_row: u32,
    next_col: u32,
) -> Result<(u32, u32), SheetXmlError> {
    match get_attr_value(element, b"r")? {
        Some(address) => {
            cell_ref_to_index(&address).ok_or(SheetXmlError::InvalidCellRef(address))
        }
        None if next_col < MAX_COLS => Ok((current_row, next_col)),
        None => Err(SheetXmlError::InvalidCellRef(format!(
            "column {} of row {}",
            next_col + 1,
            current_row + 1
        ))),
    }
}

fn read_cell(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    ctx: &SheetContext<'_>,
) -> Result<String, SheetXmlError> {
    let cell_type = get_attr_value(start, b"t")?;
    let style = get_attr_value(start, b"s")?.and_then(|s| s.trim().parse::<usize>().ok());

    let mut value: Option<String> = None;
    let mut inline: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"v" => value = Some(read_text_until_end(reader, b"v")?),
                b"is" => inline = Some(read_rich_text(reader, b"is")?),
                b"f" => {
                    read_text_until_end(reader, b"f")?;
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"c" => break,
            Ok(Event::Eof) => {
                return Err(SheetXmlError::Xml("unexpected EOF inside <c>".to_string()));
            }
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    cell_text(value, inline, cell_type.as_deref(), style, ctx)
}

fn cell_text(
    value: Option<String>,
    inline: Option<String>,
    cell_type: Option<&str>,
    style: Option<usize>,
    ctx: &SheetContext<'_>,
) -> Result<String, SheetXmlError> {
    if let Some(text) = inline {
        return Ok(text);
    }
    let Some(raw) = value else {
        return Ok(String::new());
    };

    match cell_type {
        Some("s") => {
            let index = raw.trim().parse::<usize>().map_err(|e| {
                SheetXmlError::Xml(format!("invalid shared string index '{raw}': {e}"))
            })?;
            ctx.shared_strings
                .get(index)
                .cloned()
                .ok_or(SheetXmlError::SharedStringOutOfBounds(index))
        }
        Some("b") => Ok(match raw.trim() {
            "1" => "TRUE".to_string(),
            "0" => "FALSE".to_string(),
            other => other.to_string(),
        }),
        Some("str") | Some("inlineStr") | Some("e") | Some("d") => Ok(raw),
        _ => Ok(numeric_text(&raw, style, ctx)),
    }
}

fn numeric_text(raw: &str, style: Option<usize>, ctx: &SheetContext<'_>) -> String {
    let trimmed = raw.trim();
    let Ok(number) = trimmed.parse::<f64>() else {
        return trimmed.to_string();
    };

    if style.is_some_and(|index| ctx.styles.is_date(index))
        && let Some(text) = format_date_serial(number, ctx.date1904)
    {
        return text;
    }

    format_general(number)
}

fn build_rows(mut cells: Vec<ParsedCell>) -> Vec<Vec<String>> {
    let (Some(min_col), Some(max_col)) = (
        cells.iter().map(|c| c.col).min(),
        cells.iter().map(|c| c.col).max(),
    ) else {
        return Vec::new();
    };
    let width = (max_col - min_col) as usize + 1;

    cells.sort_by_key(|c| (c.row, c.col));

    let mut rows = Vec::new();
    let mut current: Option<(u32, Vec<String>)> = None;
    for cell in cells {
        let offset = (cell.col - min_col) as usize;
        match current.as_mut() {
            Some((row, values)) if *row == cell.row => values[offset] = cell.text,
            _ => {
                if let Some((_, values)) = current.take() {
                    rows.push(values);
                }
                let mut values = vec![String::new(); width];
                values[offset] = cell.text;
                current = Some((cell.row, values));
            }
        }
    }
    if let Some((_, values)) = current {
        rows.push(values);
    }

    rows
}

//! XLSX reading: first worksheet of a workbook package to a [`ParseResult`].
//!
//! Only the parts needed to render the first sheet are inflated:
//! `xl/workbook.xml`, its relationships, shared strings, styles and the one
//! worksheet part.

mod archive;
mod cell_ref;
mod number_format;
mod sheet_xml;
mod workbook_xml;

use log::{debug, warn};
use std::collections::HashMap;

pub use archive::{ArchiveError, ArchiveLimits, WorkbookArchive, looks_like_zip};
pub use cell_ref::cell_ref_to_index;
pub use number_format::{format_date_serial, format_general};
pub use sheet_xml::SheetXmlError;

use sheet_xml::{SheetContext, parse_sheet_rows};
use workbook_xml::{
    CellStyles, parse_relationships, parse_shared_strings, parse_styles, parse_workbook_xml,
    resolve_sheet_target,
};

use crate::config::ParseConfig;
use crate::decode::DecodeError;
use crate::table::ParseResult;

/// Parse the first worksheet with default limits and no row cap.
pub fn parse_xlsx(bytes: &[u8]) -> Result<ParseResult, DecodeError> {
    parse_xlsx_with_config(bytes, &ParseConfig::default())
}

/// Parse the first worksheet: first row is the header, later rows are
/// zipped against it. At most `config.xlsx_row_limit` data rows are kept.
pub fn parse_xlsx_with_config(
    bytes: &[u8],
    config: &ParseConfig,
) -> Result<ParseResult, DecodeError> {
    let mut grid = read_first_sheet_rows(bytes, config.archive)?.into_iter();
    let Some(header) = grid.next() else {
        return Ok(ParseResult::empty());
    };
    Ok(ParseResult::from_records(header, grid, config.xlsx_row_limit))
}

/// The first worksheet as rendered text rows, header included.
///
/// A workbook with no sheets, or whose first sheet part is absent, yields no
/// rows rather than an error.
pub fn read_first_sheet_rows(
    bytes: &[u8],
    limits: ArchiveLimits,
) -> Result<Vec<Vec<String>>, DecodeError> {
    let mut archive = WorkbookArchive::open(bytes, limits)?;

    let workbook_bytes = archive
        .read_part_optional("xl/workbook.xml")?
        .ok_or(DecodeError::WorkbookXmlMissing)?;
    let info = parse_workbook_xml(&workbook_bytes)?;

    let Some(first) = info.sheets.first() else {
        warn!("xlsx: workbook has no sheets");
        return Ok(Vec::new());
    };

    let relationships = match archive.read_part_optional("xl/_rels/workbook.xml.rels")? {
        Some(bytes) => parse_relationships(&bytes)?,
        None => HashMap::new(),
    };

    let target = resolve_sheet_target(first, &relationships, 0);
    let Some(sheet_bytes) = archive.read_part_optional(&target)? else {
        warn!(
            "xlsx: worksheet part {} for sheet '{}' is missing",
            target, first.name
        );
        return Ok(Vec::new());
    };

    let shared_strings = match archive.read_part_optional("xl/sharedStrings.xml")? {
        Some(bytes) => parse_shared_strings(&bytes)?,
        None => Vec::new(),
    };
    let styles = match archive.read_part_optional("xl/styles.xml")? {
        Some(bytes) => parse_styles(&bytes)?,
        None => CellStyles::default(),
    };

    debug!(
        "xlsx: reading sheet '{}' from {} ({} shared strings)",
        first.name,
        target,
        shared_strings.len()
    );

    let ctx = SheetContext {
        shared_strings: &shared_strings,
        styles: &styles,
        date1904: info.date1904,
    };
    Ok(parse_sheet_rows(&sheet_bytes, &ctx)?)
}

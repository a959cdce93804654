//! Workbook-level parts: sheet list, relationships, shared strings and styles.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

use super::number_format::{is_builtin_date_format, is_date_format_code};
use super::sheet_xml::SheetXmlError;

pub struct SheetEntry {
    pub name: String,
    pub rel_id: Option<String>,
    pub sheet_id: Option<u32>,
}

pub struct WorkbookInfo {
    pub sheets: Vec<SheetEntry>,
    pub date1904: bool,
}

pub fn parse_workbook_xml(xml: &[u8]) -> Result<WorkbookInfo, SheetXmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    let mut date1904 = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rel_id = None;
                let mut sheet_id = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| SheetXmlError::Xml(e.to_string()))?;
                    let key = attr.key.as_ref();
                    if key == b"name" {
                        name = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned());
                    } else if key == b"sheetId" {
                        sheet_id = attr.unescape_value().map_err(to_xml_err)?.parse::<u32>().ok();
                    } else if key.ends_with(b":id") {
                        rel_id = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned());
                    }
                }
                if let Some(name) = name {
                    sheets.push(SheetEntry {
                        name,
                        rel_id,
                        sheet_id,
                    });
                }
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"workbookPr" =>
            {
                if let Some(flag) = get_attr_value(&e, b"date1904")? {
                    date1904 = matches!(flag.trim(), "1" | "true");
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(WorkbookInfo { sheets, date1904 })
}

/// Worksheet relationships of `xl/_rels/workbook.xml.rels`, by id.
pub fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, SheetXmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut map = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = get_attr_value(&e, b"Id")?;
                let target = get_attr_value(&e, b"Target")?;
                let rel_type = get_attr_value(&e, b"Type")?;

                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type)
                    && rel_type.ends_with("/worksheet")
                {
                    map.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(map)
}

/// Archive path of a sheet's XML part: its relationship target when known,
/// otherwise the conventional `xl/worksheets/sheet{N}.xml`.
pub fn resolve_sheet_target(
    sheet: &SheetEntry,
    relationships: &HashMap<String, String>,
    index: usize,
) -> String {
    if let Some(rel_id) = &sheet.rel_id
        && let Some(target) = relationships.get(rel_id)
    {
        return normalize_target(target);
    }

    let number = sheet.sheet_id.map(|id| id as usize).unwrap_or(index + 1);
    format!("xl/worksheets/sheet{number}.xml")
}

fn normalize_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    if target.starts_with("xl/") {
        return target.to_string();
    }

    let mut parts = vec!["xl"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

pub fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, SheetXmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut strings = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"si" => {
                strings.push(read_rich_text(&mut reader, b"si")?);
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Which cell formats (`cellXfs` entries) render numbers as dates.
#[derive(Debug, Clone, Default)]
pub struct CellStyles {
    date_styles: Vec<bool>,
}

impl CellStyles {
    pub fn is_date(&self, style_index: usize) -> bool {
        self.date_styles.get(style_index).copied().unwrap_or(false)
    }
}

pub fn parse_styles(xml: &[u8]) -> Result<CellStyles, SheetXmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut custom_formats: HashMap<u32, bool> = HashMap::new();
    let mut xf_formats: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"numFmt" => {
                    let id = get_attr_value(&e, b"numFmtId")?.and_then(|v| v.parse::<u32>().ok());
                    let code = get_attr_value(&e, b"formatCode")?;
                    if let (Some(id), Some(code)) = (id, code) {
                        custom_formats.insert(id, is_date_format_code(&code));
                    }
                }
                b"xf" if in_cell_xfs => {
                    let id = get_attr_value(&e, b"numFmtId")?
                        .and_then(|v| v.parse::<u32>().ok())
                        .unwrap_or(0);
                    xf_formats.push(id);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    let date_styles = xf_formats
        .into_iter()
        .map(|id| {
            custom_formats
                .get(&id)
                .copied()
                .unwrap_or_else(|| is_builtin_date_format(id))
        })
        .collect();

    Ok(CellStyles { date_styles })
}

/// Concatenated `<t>` runs of a string item up to `</end>`, skipping
/// phonetic (`rPh`) annotations.
pub(crate) fn read_rich_text(
    reader: &mut Reader<&[u8]>,
    end: &[u8],
) -> Result<String, SheetXmlError> {
    let mut buf = Vec::new();
    let mut value = String::new();
    let mut phonetic_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"rPh" => phonetic_depth += 1,
                b"t" if phonetic_depth == 0 => {
                    value.push_str(&read_text_until_end(reader, b"t")?);
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"rPh" {
                    phonetic_depth = phonetic_depth.saturating_sub(1);
                } else if name.as_ref() == end {
                    break;
                }
            }
            Ok(Event::Eof) => {
                return Err(SheetXmlError::Xml(format!(
                    "unexpected EOF inside <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(value)
}

/// Unescaped text content up to the matching `</end>`.
pub(crate) fn read_text_until_end(
    reader: &mut Reader<&[u8]>,
    end: &[u8],
) -> Result<String, SheetXmlError> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(t)) => text.push_str(&t.unescape().map_err(to_xml_err)?),
            Ok(Event::CData(t)) => text.push_str(&String::from_utf8_lossy(&t.into_inner())),
            Ok(Event::End(e)) if e.local_name().as_ref() == end => break,
            Ok(Event::Eof) => {
                return Err(SheetXmlError::Xml(format!(
                    "unexpected EOF inside <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

pub(crate) fn get_attr_value(
    element: &BytesStart<'_>,
    key: &[u8],
) -> Result<Option<String>, SheetXmlError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| SheetXmlError::Xml(e.to_string()))?;
        if attr.key.as_ref() == key {
            return Ok(Some(
                attr.unescape_value().map_err(to_xml_err)?.into_owned(),
            ));
        }
    }
    Ok(None)
}

pub(crate) fn to_xml_err(err: quick_xml::Error) -> SheetXmlError {
    SheetXmlError::Xml(err.to_string())
}

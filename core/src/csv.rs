//! Delimited-text parsing.
//!
//! A line-oriented tokenizer: the delimiter is sniffed from the first
//! non-blank line, fields may be double-quoted with `""` as an escaped quote
//! inside quotes, and every line is tokenized on its own. A quoted field
//! cannot span lines.

use log::debug;

use crate::config::DEFAULT_CSV_ROW_LIMIT;
use crate::table::ParseResult;

/// Parse CSV text with the default 1000-row cap.
pub fn parse_csv(text: &str) -> ParseResult {
    parse_csv_with_limit(text, Some(DEFAULT_CSV_ROW_LIMIT))
}

/// Parse CSV text, reading at most `row_limit` data rows after the header.
pub fn parse_csv_with_limit(text: &str, row_limit: Option<usize>) -> ParseResult {
    let mut lines = non_blank_lines(text);
    let Some(first) = lines.next() else {
        return ParseResult::empty();
    };

    let delimiter = sniff_delimiter(first);
    debug!("csv: sniffed delimiter {:?}", delimiter);

    let header = tokenize_line(first, delimiter);
    if header.is_empty() {
        return ParseResult::empty();
    }

    let records = lines
        .map(|line| tokenize_line(line, delimiter))
        .filter(|tokens| !tokens.is_empty());
    ParseResult::from_records(header, records, row_limit)
}

/// Lines split on `\n` or `\r\n`, with lines that are blank after trimming dropped.
pub(crate) fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

/// Pick `;` or tab over `,` only when it splits the line into more fields.
pub fn sniff_delimiter(first_line: &str) -> char {
    let fields = |delimiter: char| first_line.split(delimiter).count();
    let commas = fields(',');
    if fields(';') > commas {
        ';'
    } else if fields('\t') > commas {
        '\t'
    } else {
        ','
    }
}

/// Split one line into trimmed fields.
pub fn tokenize_line(line: &str, delimiter: char) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                chars.next();
                current.push('"');
                continue;
            }
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            fields.push(finish_field(&current));
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(finish_field(&current));

    fields
}

fn finish_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let head = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unwrapped = head.strip_suffix('"').unwrap_or(head);
    unwrapped.trim().to_string()
}

//! Column reconciliation: which columns exist, and which the user has
//! marked for deletion in the free-text delete list.
//!
//! Nothing here fails. Bad input degrades to an empty or unchanged result.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json_records::value_text;

/// Names parsed from the delete-list text, in the order they were written.
pub type DeleteSet = IndexSet<String>;

/// Trim names, drop blanks and keep only the first of any repeat.
pub fn clean_columns<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cleaned: IndexSet<String> = raw
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    cleaned.into_iter().collect()
}

/// [`clean_columns`] over JSON values: nulls dropped, numbers and booleans
/// stringified.
pub fn clean_column_values(raw: &[Value]) -> Vec<String> {
    clean_columns(raw.iter().filter(|v| !v.is_null()).map(value_text))
}

/// Where a candidate column list came from. Declaration order is priority
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSource {
    /// Parsed from the file loaded in this session.
    Parsed,
    /// The column list the server last reported.
    ServerReported,
    /// Columns remembered from an earlier load.
    Cached,
    /// Keys of the first data row.
    FirstRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCandidate {
    pub source: ColumnSource,
    pub columns: Vec<String>,
}

impl ColumnCandidate {
    pub fn new<I, S>(source: ColumnSource, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// The cleaned columns of the highest-priority candidate that has any.
///
/// First non-empty wins; candidates are never merged. Candidates sharing a
/// source keep the order they were given in.
pub fn resolve_columns(candidates: &[ColumnCandidate]) -> Vec<String> {
    let mut ordered: Vec<&ColumnCandidate> = candidates.iter().collect();
    ordered.sort_by_key(|candidate| candidate.source);
    ordered
        .into_iter()
        .map(|candidate| clean_columns(&candidate.columns))
        .find(|columns| !columns.is_empty())
        .unwrap_or_default()
}

pub fn parse_delete_list(text: &str) -> DeleteSet {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn serialize_delete_list(set: &DeleteSet) -> String {
    set.iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remove `column` from the delete list if present, otherwise append it.
///
/// The result is always normalized (`", "` separators, blanks and repeats
/// dropped). A blank name, or one containing a comma, cannot be represented
/// in the list and leaves it unchanged.
pub fn toggle_column(text: &str, column: &str) -> String {
    let mut set = parse_delete_list(text);
    let column = column.trim();
    if column.is_empty() || column.contains(',') {
        return serialize_delete_list(&set);
    }

    if !set.shift_remove(column) {
        set.insert(column.to_string());
    }
    serialize_delete_list(&set)
}

/// `all_columns` minus the delete list, in `all_columns` order.
pub fn display_columns(all_columns: &[String], text: &str) -> Vec<String> {
    let deleted = parse_delete_list(text);
    all_columns
        .iter()
        .filter(|name| !deleted.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Delete-list entries that name a known column, in column order. Stale
/// names stay in the text but are not reported here.
pub fn pending_deletions(all_columns: &[String], text: &str) -> Vec<String> {
    let deleted = parse_delete_list(text);
    all_columns
        .iter()
        .filter(|name| deleted.contains(name.as_str()))
        .cloned()
        .collect()
}

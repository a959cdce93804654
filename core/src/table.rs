//! The parsed-table model shared by every parser and exporter.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One record keyed by column name, in column order.
///
/// Every row of a [`ParseResult`] carries the same keys in the same order;
/// cells missing from the source are present with an empty value.
pub type Row = IndexMap<String, String>;

/// Rows plus the ordered column list they were built from.
///
/// A result is never patched in place; a new parse replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub rows: Vec<Row>,
    pub columns: Vec<String>,
}

impl ParseResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there are no data rows. A header-only table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Zip each record against `header` by position.
    ///
    /// Short records are padded with `""`, surplus cells are dropped. When a
    /// header name repeats, the column keeps its first position and the cell
    /// from the later occurrence wins.
    pub(crate) fn from_records<I>(header: Vec<String>, records: I, row_limit: Option<usize>) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let columns: IndexSet<String> = header.iter().cloned().collect();
        let limit = row_limit.unwrap_or(usize::MAX);

        let rows = records
            .into_iter()
            .take(limit)
            .map(|record| {
                let mut row = Row::with_capacity(columns.len());
                for (idx, name) in header.iter().enumerate() {
                    let value = record.get(idx).cloned().unwrap_or_default();
                    row.insert(name.clone(), value);
                }
                row
            })
            .collect();

        Self {
            rows,
            columns: columns.into_iter().collect(),
        }
    }

    /// Restrict every row to `columns`, in that order.
    pub fn project(&self, columns: &[String]) -> ParseResult {
        ParseResult {
            rows: project_rows(&self.rows, columns),
            columns: columns.to_vec(),
        }
    }
}

/// Restrict rows to the given columns in order; absent cells become `""`.
pub fn project_rows(rows: &[Row], columns: &[String]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            columns
                .iter()
                .map(|name| (name.clone(), row.get(name).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

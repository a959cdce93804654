//! Caller-owned state for one dataset preview.

use log::debug;

use crate::columns::{
    ColumnCandidate, ColumnSource, clean_columns, display_columns, parse_delete_list,
    pending_deletions, resolve_columns, toggle_column,
};
use crate::config::ParseConfig;
use crate::decode::DecodeError;
use crate::dispatch::{FormatHint, ParseOutcome, parse_auto};
use crate::export::{ExportError, ExportFormat, rows_to_csv, rows_to_xlsx};
use crate::payload::{DatasetPayload, RemoveColumnsRequest};
use crate::table::{ParseResult, Row, project_rows};

/// Preview state for one user session: the current parse, the column lists
/// reported from elsewhere, and the delete-list text being edited.
///
/// Each load replaces the parse outcome wholesale. The delete-list text
/// survives loads, so it may name columns the new data does not have.
#[derive(Debug, Clone)]
pub struct PreviewSession {
    config: ParseConfig,
    outcome: ParseOutcome,
    server_columns: Vec<String>,
    cached_columns: Vec<String>,
    delete_list: String,
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(ParseConfig::default())
    }
}

impl PreviewSession {
    pub fn new(config: ParseConfig) -> Self {
        Self {
            config,
            outcome: ParseOutcome::Empty,
            server_columns: Vec::new(),
            cached_columns: Vec::new(),
            delete_list: String::new(),
        }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Decode and parse an API payload. On a decode error the previous
    /// outcome is discarded as well.
    pub fn load_payload(&mut self, payload: &DatasetPayload) -> Result<&ParseOutcome, DecodeError> {
        let parsed = payload.parse(&self.config);
        self.replace_outcome(parsed)
    }

    pub fn load_bytes(
        &mut self,
        bytes: &[u8],
        hint: &FormatHint,
    ) -> Result<&ParseOutcome, DecodeError> {
        let parsed = parse_auto(bytes, hint, &self.config);
        self.replace_outcome(parsed)
    }

    fn replace_outcome(
        &mut self,
        parsed: Result<ParseOutcome, DecodeError>,
    ) -> Result<&ParseOutcome, DecodeError> {
        match parsed {
            Ok(outcome) => {
                debug!("session: loaded outcome {:?}", outcome.method());
                self.outcome = outcome;
                Ok(&self.outcome)
            }
            Err(err) => {
                self.outcome = ParseOutcome::Empty;
                Err(err)
            }
        }
    }

    pub fn outcome(&self) -> &ParseOutcome {
        &self.outcome
    }

    pub fn result(&self) -> Option<&ParseResult> {
        self.outcome.result()
    }

    fn rows(&self) -> &[Row] {
        self.result().map(|r| r.rows.as_slice()).unwrap_or(&[])
    }

    pub fn set_server_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.server_columns = clean_columns(columns);
    }

    pub fn set_cached_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cached_columns = clean_columns(columns);
    }

    /// Parsed columns, else server-reported, else cached, else the keys of
    /// the first row.
    pub fn all_columns(&self) -> Vec<String> {
        let parsed = self.result().map(|r| r.columns.clone()).unwrap_or_default();
        let first_row = self
            .rows()
            .first()
            .map(|row| row.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        resolve_columns(&[
            ColumnCandidate::new(ColumnSource::Parsed, parsed),
            ColumnCandidate::new(ColumnSource::ServerReported, self.server_columns.clone()),
            ColumnCandidate::new(ColumnSource::Cached, self.cached_columns.clone()),
            ColumnCandidate::new(ColumnSource::FirstRow, first_row),
        ])
    }

    pub fn delete_list_text(&self) -> &str {
        &self.delete_list
    }

    pub fn set_delete_list_text(&mut self, text: impl Into<String>) {
        self.delete_list = text.into();
    }

    /// Toggle a column chip; returns the new delete-list text.
    pub fn toggle_column(&mut self, column: &str) -> &str {
        self.delete_list = toggle_column(&self.delete_list, column);
        &self.delete_list
    }

    pub fn pending_deletions(&self) -> Vec<String> {
        pending_deletions(&self.all_columns(), &self.delete_list)
    }

    pub fn display_columns(&self) -> Vec<String> {
        display_columns(&self.all_columns(), &self.delete_list)
    }

    /// The delete list as submitted to the server, clearing the text.
    pub fn take_columns_to_remove(&mut self) -> Vec<String> {
        let columns = parse_delete_list(&self.delete_list).into_iter().collect();
        self.delete_list.clear();
        columns
    }

    /// Build the remove-columns request, or `None` (leaving the text alone)
    /// when nothing is marked.
    pub fn remove_columns_request(
        &mut self,
        campaign_uuid: &str,
        dataset_uuid: &str,
    ) -> Option<RemoveColumnsRequest> {
        if parse_delete_list(&self.delete_list).is_empty() {
            return None;
        }
        let columns = self.take_columns_to_remove();
        Some(RemoveColumnsRequest::new(campaign_uuid, dataset_uuid, columns))
    }

    pub fn preview_rows(&self, limit: usize) -> &[Row] {
        let rows = self.rows();
        &rows[..rows.len().min(limit)]
    }

    /// The visible columns of every current row, serialized for download.
    pub fn export_view(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        let columns = self.display_columns();
        let rows = project_rows(self.rows(), &columns);
        match format {
            ExportFormat::Csv => Ok(rows_to_csv(&columns, &rows).into_bytes()),
            ExportFormat::Xlsx => rows_to_xlsx(&columns, &rows),
        }
    }

    /// Forget everything, as on logout. The config is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(csv: &str) -> PreviewSession {
        let mut session = PreviewSession::default();
        session
            .load_bytes(csv.as_bytes(), &FormatHint::from_file_name("contacts.csv"))
            .expect("csv decodes");
        session
    }

    #[test]
    fn columns_follow_priority() {
        let mut session = PreviewSession::default();
        session.set_cached_columns(["cached"]);
        assert_eq!(session.all_columns(), vec!["cached"]);
        session.set_server_columns([" server ", "server"]);
        assert_eq!(session.all_columns(), vec!["server"]);

        session
            .load_bytes(b"A,B\n1,2", &FormatHint::new())
            .expect("csv decodes");
        assert_eq!(session.all_columns(), vec!["A", "B"]);
    }

    #[test]
    fn toggling_drives_display_and_pending() {
        let mut session = loaded("Name,Email,Phone\nAnn,a@x.io,555\n");
        session.set_delete_list_text("Stale");
        assert_eq!(session.toggle_column("Phone"), "Stale, Phone");
        assert_eq!(session.display_columns(), vec!["Name", "Email"]);
        assert_eq!(session.pending_deletions(), vec!["Phone"]);

        session.toggle_column("Phone");
        assert_eq!(session.delete_list_text(), "Stale");
        assert_eq!(session.display_columns().len(), 3);
    }

    #[test]
    fn remove_request_clears_text() {
        let mut session = loaded("Name,Email\nAnn,a@x.io\n");
        assert!(session.remove_columns_request("c", "d").is_none());

        session.toggle_column("Email");
        let request = session
            .remove_columns_request("c", "d")
            .expect("one column marked");
        assert_eq!(request.columns_to_remove, vec!["Email"]);
        assert_eq!(session.delete_list_text(), "");
    }

    #[test]
    fn reload_replaces_outcome_and_decode_error_clears_it() {
        let mut session = loaded("A\n1\n2\n3\n");
        assert_eq!(session.preview_rows(2).len(), 2);
        assert_eq!(session.preview_rows(10).len(), 3);

        let payload = DatasetPayload {
            content: Some("!!".into()),
            ..Default::default()
        };
        assert!(session.load_payload(&payload).is_err());
        assert_eq!(session.outcome(), &ParseOutcome::Empty);
        assert!(session.preview_rows(10).is_empty());
    }

    #[test]
    fn export_view_drops_deleted_columns() {
        let mut session = loaded("Name,Email\nAnn,a@x.io\n");
        session.toggle_column("Email");
        let csv = session.export_view(ExportFormat::Csv).expect("csv export");
        assert_eq!(String::from_utf8(csv).expect("utf-8"), "Name\nAnn");
    }

    #[test]
    fn reset_keeps_config() {
        let mut session = PreviewSession::new(ParseConfig::unbounded());
        session.set_delete_list_text("A");
        session.reset();
        assert_eq!(session.delete_list_text(), "");
        assert_eq!(session.config(), &ParseConfig::unbounded());
    }
}

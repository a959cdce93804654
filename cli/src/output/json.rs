use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tabprep::{ParseMethod, PreviewSession, Row, project_rows};

pub fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

#[derive(Serialize)]
pub struct PreviewJson {
    pub method: Option<ParseMethod>,
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl PreviewJson {
    pub fn from_session(session: &PreviewSession, limit: Option<usize>) -> Self {
        let columns = session.display_columns();
        let shown = session.preview_rows(limit.unwrap_or(usize::MAX));
        PreviewJson {
            method: session.outcome().method(),
            total_rows: session.result().map(|r| r.row_count()).unwrap_or(0),
            rows: project_rows(shown, &columns),
            columns,
        }
    }
}

#[derive(Serialize)]
pub struct ColumnsJson {
    pub all_columns: Vec<String>,
    pub display_columns: Vec<String>,
    pub pending_deletions: Vec<String>,
    pub delete_list: String,
}

impl ColumnsJson {
    pub fn from_session(session: &PreviewSession) -> Self {
        ColumnsJson {
            all_columns: session.all_columns(),
            display_columns: session.display_columns(),
            pending_deletions: session.pending_deletions(),
            delete_list: session.delete_list_text().to_string(),
        }
    }
}

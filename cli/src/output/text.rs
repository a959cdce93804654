use anyhow::Result;
use std::io::Write;
use tabprep::PreviewSession;

const MAX_CELL_WIDTH: usize = 40;

pub fn write_preview<W: Write>(
    w: &mut W,
    session: &PreviewSession,
    limit: Option<usize>,
) -> Result<()> {
    let columns = session.display_columns();
    let total = session.result().map(|r| r.row_count()).unwrap_or(0);
    let rows = session.preview_rows(limit.unwrap_or(usize::MAX));

    let method = session
        .outcome()
        .method()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "none".to_string());
    writeln!(
        w,
        "Parsed {} rows x {} columns ({})",
        total,
        columns.len(),
        method
    )?;

    let hidden = session.pending_deletions();
    if !hidden.is_empty() {
        writeln!(w, "Hidden: {}", hidden.join(", "))?;
    }

    if columns.is_empty() {
        return Ok(());
    }
    writeln!(w)?;

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| clip(row.get(c).map(String::as_str).unwrap_or("")))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells
                .iter()
                .map(|r| r[idx].chars().count())
                .chain(std::iter::once(clip(name).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns.iter().map(|c| clip(c)).collect();
    write_line(w, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|n| "-".repeat(*n)).collect();
    write_line(w, &rule, &widths)?;
    for row in &cells {
        write_line(w, row, &widths)?;
    }

    if rows.len() < total {
        writeln!(w, "... {} more rows", total - rows.len())?;
    }
    Ok(())
}

pub fn write_columns<W: Write>(w: &mut W, session: &PreviewSession) -> Result<()> {
    let pending = session.pending_deletions();
    for column in session.all_columns() {
        let marker = if pending.contains(&column) { "x" } else { " " };
        writeln!(w, "[{}] {}", marker, column)?;
    }
    writeln!(w)?;
    writeln!(w, "Delete list: {}", session.delete_list_text())?;
    Ok(())
}

fn write_line<W: Write>(w: &mut W, cells: &[String], widths: &[usize]) -> Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    writeln!(w, "{}", padded.join(" | ").trim_end())?;
    Ok(())
}

fn clip(value: &str) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut out: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabprep::FormatHint;

    fn session(csv: &str) -> PreviewSession {
        let mut session = PreviewSession::default();
        session
            .load_bytes(csv.as_bytes(), &FormatHint::from_file_name("t.csv"))
            .expect("csv decodes");
        session
    }

    #[test]
    fn preview_pads_columns_and_counts_remaining_rows() {
        let session = session("Name,Email\nAnn,a@x.io\nBob,b@x.io\n");
        let mut out = Vec::new();
        write_preview(&mut out, &session, Some(1)).expect("write");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.starts_with("Parsed 2 rows x 2 columns (csv)"));
        assert!(text.contains("Name | Email"));
        assert!(text.contains("Ann  | a@x.io"));
        assert!(text.contains("... 1 more rows"));
    }

    #[test]
    fn columns_listing_marks_deletions() {
        let mut session = session("Name,Email\nAnn,a@x.io\n");
        session.toggle_column("Email");
        let mut out = Vec::new();
        write_columns(&mut out, &session).expect("write");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("[ ] Name\n"));
        assert!(text.contains("[x] Email\n"));
        assert!(text.contains("Delete list: Email"));
    }

    #[test]
    fn long_cells_are_clipped() {
        let long = "y".repeat(100);
        assert_eq!(clip(&long).chars().count(), MAX_CELL_WIDTH);
        assert_eq!(clip("a\nb"), "a b");
    }
}

use tabprep::{ExportFormat, FormatHint, PreviewSession, download_file_name};

fn usage() -> ! {
    eprintln!("Usage: prune_columns <DATASET> <COLUMN>...");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| usage());
    let bytes = std::fs::read(&path)?;

    let mut session = PreviewSession::default();
    session.load_bytes(&bytes, &FormatHint::from_file_name(path.as_str()))?;
    for column in args {
        session.toggle_column(&column);
    }

    println!("hiding: {}", session.pending_deletions().join(", "));
    println!("showing: {}", session.display_columns().join(", "));

    let out = download_file_name(Some(&path), ExportFormat::Csv);
    std::fs::write(&out, session.export_view(ExportFormat::Csv)?)?;
    println!("wrote {}", out);
    Ok(())
}

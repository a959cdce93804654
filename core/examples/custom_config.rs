use tabprep::{ParseConfig, parse_path};

fn usage() -> ! {
    eprintln!("Usage: custom_config <DATASET.csv|DATASET.xlsx>");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| usage());

    let cfg = ParseConfig::builder()
        .csv_row_limit(Some(250))
        .xlsx_row_limit(Some(250))
        .json_fallback(false)
        .build()?;

    let outcome = parse_path(&path, &cfg)?;
    if let Some(message) = outcome.diagnostic() {
        eprintln!("warning: {}", message);
    }

    let result = outcome.into_result();
    println!("columns: {}", result.columns.join(", "));
    println!("rows: {}", result.rows.len());
    Ok(())
}

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000_000 {
        return;
    }

    let text = String::from_utf8_lossy(data);
    let result = tabprep::parse_csv(&text);
    assert!(result.rows.len() <= tabprep::DEFAULT_CSV_ROW_LIMIT);
    for row in &result.rows {
        assert_eq!(row.len(), result.columns.len());
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabprep::{FormatHint, ParseConfig, parse_auto};

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000_000 {
        return;
    }

    let config = ParseConfig::default();
    for hint in [
        FormatHint::new(),
        FormatHint::new().with_declared_type("xlsx"),
        FormatHint::from_file_name("upload.csv"),
    ] {
        let _ = parse_auto(data, &hint, &config);
    }
});

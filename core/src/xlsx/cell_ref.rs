/// Rows in a worksheet (Excel 2007+).
pub const MAX_ROWS: u32 = 1_048_576;
/// Columns in a worksheet, `A` through `XFD`.
pub const MAX_COLS: u32 = 16_384;

/// Parse an A1 reference into zero-based (row, col) indices.
/// Absolute markers (`$B$3`) are accepted. Returns `None` for malformed input.
pub fn cell_ref_to_index(a1: &str) -> Option<(u32, u32)> {
    let a1 = a1.trim();
    if a1.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_letter = false;
    let mut saw_digit = false;

    for ch in a1.chars().filter(|c| *c != '$') {
        if ch.is_ascii_alphabetic() {
            if saw_digit {
                return None;
            }
            saw_letter = true;
            let upper = ch.to_ascii_uppercase() as u8;
            col = col.checked_mul(26)?.checked_add((upper - b'A' + 1) as u32)?;
        } else if ch.is_ascii_digit() {
            saw_digit = true;
            row = row.checked_mul(10)?.checked_add((ch as u8 - b'0') as u32)?;
        } else {
            return None;
        }
    }

    if !saw_letter || !saw_digit || row == 0 || col == 0 || row > MAX_ROWS || col > MAX_COLS {
        return None;
    }

    Some((row - 1, col - 1))
}

/// Parse the one-based `r` attribute of a `<row>` element.
pub fn row_number_to_index(raw: &str) -> Option<u32> {
    let row = raw.trim().parse::<u32>().ok()?;
    if row > MAX_ROWS {
        return None;
    }
    row.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_and_wide_references() {
        assert_eq!(cell_ref_to_index("A1"), Some((0, 0)));
        assert_eq!(cell_ref_to_index("Z10"), Some((9, 25)));
        assert_eq!(cell_ref_to_index("AA1"), Some((0, 26)));
        assert_eq!(cell_ref_to_index("ab7"), Some((6, 27)));
        assert_eq!(cell_ref_to_index("$C$3"), Some((2, 2)));
        assert_eq!(cell_ref_to_index("XFD1048576"), Some((1_048_575, 16_383)));
    }

    #[test]
    fn rejects_malformed_references() {
        for bad in ["", "1A", "A0", "A", "AA0", "A-1", "A1A", "XFE1", "ZZZZZZ1", "A1048577"] {
            assert!(cell_ref_to_index(bad).is_none(), "{bad} should be invalid");
        }
    }

    #[test]
    fn row_numbers() {
        assert_eq!(row_number_to_index("1"), Some(0));
        assert_eq!(row_number_to_index(" 12 "), Some(11));
        assert_eq!(row_number_to_index("0"), None);
        assert_eq!(row_number_to_index("x"), None);
        assert_eq!(row_number_to_index("1048576"), Some(1_048_575));
        assert_eq!(row_number_to_index("1048577"), None);
    }
}

//! Rendering numeric cell values as the text a spreadsheet would display.

use chrono::{Days, NaiveDate, NaiveTime};

/// Render a number in a "General"-like format: integers without a decimal
/// point, otherwise at most ten significant decimals with trailing zeros
/// dropped.
pub fn format_general(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if value.fract() == 0.0 && abs < 1e15 {
        return format!("{}", value as i64);
    }
    if !(1e-9..1e15).contains(&abs) {
        return format!("{value:e}");
    }

    let int_digits = if abs >= 1.0 {
        abs.log10().floor() as i32 + 1
    } else {
        0
    };
    let decimals = (10 - int_digits).clamp(0, 10) as usize;
    trim_fraction(format!("{value:.decimals$}"))
}

fn trim_fraction(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Built-in number format ids that display dates or times.
pub fn is_builtin_date_format(id: u32) -> bool {
    matches!(id, 14..=22 | 27..=36 | 45..=47 | 50..=58)
}

/// True when a custom format code contains date or time tokens outside
/// quoted literals, escapes and bracketed colour/condition sections.
pub fn is_date_format_code(code: &str) -> bool {
    let mut chars = code.chars();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        match ch {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let section: String = chars.by_ref().take_while(|c| *c != ']').collect();
                let section = section.to_ascii_lowercase();
                if matches!(section.as_str(), "h" | "hh" | "m" | "mm" | "s" | "ss") {
                    return true;
                }
            }
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }

    false
}

/// Convert a serial date to ISO text: `YYYY-MM-DD`, `HH:MM:SS` for pure
/// times, or both. Returns `None` for serials outside the calendar.
pub fn format_date_serial(serial: f64, date1904: bool) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let mut days = serial.trunc() as u64;
    let mut seconds = ((serial - serial.trunc()) * 86_400.0).round() as u32;
    if seconds >= 86_400 {
        days += 1;
        seconds -= 86_400;
    }
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;

    if !date1904 && days == 0 {
        return Some(time.format("%H:%M:%S").to_string());
    }

    // The 1900 system counts a nonexistent 1900-02-29 as serial 60.
    let base = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else if days <= 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let date = base.checked_add_days(Days::new(days))?;

    if seconds == 0 {
        Some(date.format("%Y-%m-%d").to_string())
    } else {
        Some(format!(
            "{} {}",
            date.format("%Y-%m-%d"),
            time.format("%H:%M:%S")
        ))
    }
}

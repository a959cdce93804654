use tabprep::{
    ColumnCandidate, ColumnSource, clean_columns, display_columns, parse_delete_list,
    pending_deletions, resolve_columns, serialize_delete_list, toggle_column,
};

mod common;
use common::strings;

const COLUMN_SAMPLES: &[&[&str]] = &[
    &[],
    &[""],
    &["  "],
    &["Name"],
    &[" Name ", "Name", "name"],
    &["A", "", "B", " ", "A", "C ", "C"],
    &["Email", "Email", "Email"],
    &["\tTabbed\t", "Tabbed"],
    &["Company, Inc.", "Company"],
];

const DELETE_TEXTS: &[&str] = &[
    "",
    ",",
    " , ,",
    "A",
    "A, B",
    "B,A,B",
    " Name ,, Email ",
    "Stale, Name",
];

const NAMES: &[&str] = &["A", "B", "Name", "Email", "Stale", "", "  ", "x,y", " B "];

#[test]
fn clean_columns_is_idempotent() {
    for sample in COLUMN_SAMPLES {
        let once = clean_columns(*sample);
        let twice = clean_columns(&once);
        assert_eq!(twice, once, "sample {sample:?}");
        assert!(once.iter().all(|c| !c.is_empty() && c.trim() == c));
    }
}

#[test]
fn resolve_is_first_non_empty_in_priority_order() {
    let parsed_empty = ColumnCandidate::new(ColumnSource::Parsed, [" "]);
    let server = ColumnCandidate::new(ColumnSource::ServerReported, ["Email", "Name"]);
    let cached = ColumnCandidate::new(ColumnSource::Cached, ["Old"]);
    let first_row = ColumnCandidate::new(ColumnSource::FirstRow, ["Row"]);

    assert_eq!(
        resolve_columns(&[first_row.clone(), cached.clone(), server, parsed_empty.clone()]),
        strings(&["Email", "Name"])
    );
    assert_eq!(
        resolve_columns(&[first_row.clone(), parsed_empty, cached]),
        strings(&["Old"])
    );
    assert_eq!(resolve_columns(&[first_row]), strings(&["Row"]));
}

#[test]
fn delete_list_round_trip_is_stable() {
    for text in DELETE_TEXTS {
        let parsed = parse_delete_list(text);
        let again = parse_delete_list(&serialize_delete_list(&parsed));
        assert_eq!(again, parsed, "text {text:?}");
    }
}

#[test]
fn double_toggle_restores_parsed_set() {
    for text in DELETE_TEXTS {
        for name in NAMES {
            let restored = toggle_column(&toggle_column(text, name), name);
            let mut before: Vec<String> = parse_delete_list(text).into_iter().collect();
            let mut after: Vec<String> = parse_delete_list(&restored).into_iter().collect();
            before.sort();
            after.sort();
            assert_eq!(after, before, "text {text:?} name {name:?}");
        }
    }
}

#[test]
fn toggle_preserves_order_of_remaining_items() {
    assert_eq!(toggle_column("A, B, C", "B"), "A, C");
    assert_eq!(toggle_column("A, C", "B"), "A, C, B");
}

#[test]
fn display_columns_is_an_ordered_subsequence() {
    let all = strings(&["Name", "Email", "Phone", "Stale", "A", "B"]);
    for text in DELETE_TEXTS {
        let shown = display_columns(&all, text);
        let deleted = parse_delete_list(text);

        let mut remaining = all.iter();
        for name in &shown {
            assert!(!deleted.contains(name), "{name} should be hidden for {text:?}");
            assert!(
                remaining.any(|c| c == name),
                "{name} out of order for {text:?}"
            );
        }

        let pending = pending_deletions(&all, text);
        assert_eq!(shown.len() + pending.len(), all.len());
    }
}

#[test]
fn stale_names_stay_in_text_but_not_in_pending() {
    let all = strings(&["Name", "Email"]);
    let text = toggle_column("Phone", "Email");
    assert_eq!(text, "Phone, Email");
    assert_eq!(pending_deletions(&all, &text), strings(&["Email"]));
    assert_eq!(display_columns(&all, &text), strings(&["Name"]));
}

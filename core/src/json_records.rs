//! Last-resort reading of a JSON array of objects as a table.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::table::{ParseResult, Row};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonRecordsError {
    #[error("not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("JSON value is not an array")]
    NotAnArray,
    #[error("JSON array holds no objects")]
    NoRecords,
}

/// Columns are the keys of the first object, in document order; every object
/// in the array becomes a row projected onto them. Non-object entries are
/// ignored.
pub fn parse_json_records(text: &str) -> Result<ParseResult, JsonRecordsError> {
    let value: Value = serde_json::from_str(text.trim())?;
    let Value::Array(items) = value else {
        return Err(JsonRecordsError::NotAnArray);
    };

    let objects: Vec<&Map<String, Value>> = items.iter().filter_map(Value::as_object).collect();
    let Some(first) = objects.first() else {
        return Err(JsonRecordsError::NoRecords);
    };
    let columns: Vec<String> = first.keys().cloned().collect();

    let rows = objects
        .iter()
        .map(|object| {
            columns
                .iter()
                .map(|name| {
                    let cell = object.get(name).map(value_text).unwrap_or_default();
                    (name.clone(), cell)
                })
                .collect::<Row>()
        })
        .collect();

    Ok(ParseResult { rows, columns })
}

/// Strings verbatim, `null` as empty, anything else as compact JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_objects_becomes_rows() {
        let result = parse_json_records(
            r#"[{"name":"Ann","age":31,"vip":true},{"name":"Bob","age":null,"extra":"x"}]"#,
        )
        .expect("records should parse");
        assert_eq!(result.columns, vec!["name", "age", "vip"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0]["age"], "31");
        assert_eq!(result.rows[0]["vip"], "true");
        assert_eq!(result.rows[1]["age"], "");
        assert_eq!(result.rows[1]["vip"], "");
        assert!(!result.rows[1].contains_key("extra"));
    }

    #[test]
    fn rejects_non_tabular_json() {
        assert!(matches!(
            parse_json_records("{\"a\":1}"),
            Err(JsonRecordsError::NotAnArray)
        ));
        assert!(matches!(
            parse_json_records("[1, 2, 3]"),
            Err(JsonRecordsError::NoRecords)
        ));
        assert!(matches!(
            parse_json_records("[]"),
            Err(JsonRecordsError::NoRecords)
        ));
        assert!(matches!(
            parse_json_records("a,b\n1,2"),
            Err(JsonRecordsError::Syntax(_))
        ));
    }
}

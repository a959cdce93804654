use serde::Serialize;
use tabprep::{
    ColumnCandidate, ColumnSource, DatasetPayload, DatasetViewResponse, FormatHint, ParseConfig,
    ParseOutcome, Row, display_columns, parse_auto, pending_deletions, resolve_columns,
    rows_to_csv, toggle_column as toggle_in_list,
};
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct ColumnView {
    display_columns: Vec<String>,
    pending_deletions: Vec<String>,
}

#[derive(serde::Deserialize)]
struct ColumnSources {
    #[serde(default)]
    parsed: Vec<String>,
    #[serde(default)]
    server: Vec<String>,
    #[serde(default)]
    cached: Vec<String>,
    #[serde(default)]
    first_row: Vec<String>,
}

#[derive(serde::Deserialize)]
struct RowsInput {
    columns: Vec<String>,
    rows: Vec<Row>,
}

fn to_js(err: String) -> JsValue {
    JsValue::from_str(&err)
}

fn outcome_json(outcome: &ParseOutcome) -> Result<String, String> {
    serde_json::to_string(outcome).map_err(|e| format!("Failed to serialize outcome: {}", e))
}

fn parse_dataset(bytes: &[u8], declared_type: &str, file_name: &str) -> Result<String, String> {
    let mut hint = FormatHint::from_file_name(file_name);
    if !declared_type.trim().is_empty() {
        hint = hint.with_declared_type(declared_type);
    }
    let outcome = parse_auto(bytes, &hint, &ParseConfig::default())
        .map_err(|e| format!("Failed to decode dataset [{}]: {}", e.code(), e))?;
    outcome_json(&outcome)
}

fn parse_payload(json: &str) -> Result<String, String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("Invalid JSON: {}", e))?;
    let payload = if value.get("result").is_some() {
        serde_json::from_value::<DatasetViewResponse>(value)
            .map_err(|e| format!("Not a dataset-view response: {}", e))?
            .result
    } else {
        serde_json::from_value::<DatasetPayload>(value)
            .map_err(|e| format!("Not a dataset payload: {}", e))?
    };
    let outcome = payload
        .parse(&ParseConfig::default())
        .map_err(|e| format!("Failed to decode dataset [{}]: {}", e.code(), e))?;
    outcome_json(&outcome)
}

fn column_view(columns_json: &str, delete_text: &str) -> Result<String, String> {
    let columns: Vec<String> =
        serde_json::from_str(columns_json).map_err(|e| format!("Invalid column list: {}", e))?;
    let view = ColumnView {
        display_columns: display_columns(&columns, delete_text),
        pending_deletions: pending_deletions(&columns, delete_text),
    };
    serde_json::to_string(&view).map_err(|e| e.to_string())
}

fn resolve(sources_json: &str) -> Result<String, String> {
    let sources: ColumnSources =
        serde_json::from_str(sources_json).map_err(|e| format!("Invalid column sources: {}", e))?;
    let resolved = resolve_columns(&[
        ColumnCandidate::new(ColumnSource::Parsed, sources.parsed),
        ColumnCandidate::new(ColumnSource::ServerReported, sources.server),
        ColumnCandidate::new(ColumnSource::Cached, sources.cached),
        ColumnCandidate::new(ColumnSource::FirstRow, sources.first_row),
    ]);
    serde_json::to_string(&resolved).map_err(|e| e.to_string())
}

fn rows_csv(rows_json: &str) -> Result<String, String> {
    let input: RowsInput =
        serde_json::from_str(rows_json).map_err(|e| format!("Invalid rows: {}", e))?;
    Ok(rows_to_csv(&input.columns, &input.rows))
}

/// Parse raw file bytes into a JSON-encoded parse outcome.
#[wasm_bindgen]
pub fn parse_dataset_json(
    bytes: &[u8],
    declared_type: &str,
    file_name: &str,
) -> Result<String, JsValue> {
    parse_dataset(bytes, declared_type, file_name).map_err(to_js)
}

/// Accepts either a full dataset-view response or just its `result` object.
#[wasm_bindgen]
pub fn parse_payload_json(json: &str) -> Result<String, JsValue> {
    parse_payload(json).map_err(to_js)
}

#[wasm_bindgen]
pub fn toggle_column(delete_text: &str, column: &str) -> String {
    toggle_in_list(delete_text, column)
}

#[wasm_bindgen]
pub fn display_columns_json(columns_json: &str, delete_text: &str) -> Result<String, JsValue> {
    column_view(columns_json, delete_text).map_err(to_js)
}

#[wasm_bindgen]
pub fn resolve_columns_json(sources_json: &str) -> Result<String, JsValue> {
    resolve(sources_json).map_err(to_js)
}

#[wasm_bindgen]
pub fn rows_to_csv_json(rows_json: &str) -> Result<String, JsValue> {
    rows_csv(rows_json).map_err(to_js)
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

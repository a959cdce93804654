//! Shapes of the dataset API that feed and consume the parser.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::columns::clean_column_values;
use crate::config::ParseConfig;
use crate::decode::{ContentEncoding, DecodeError};
use crate::dispatch::{DetectedFormat, FormatHint, ParseOutcome, parse_auto};

/// The `result` object of a dataset-view response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPayload {
    pub dataset_name: Option<String>,
    pub dataset_type: Option<String>,
    pub content: Option<String>,
    pub encoding: Option<String>,
}

impl DatasetPayload {
    pub fn hint(&self) -> FormatHint {
        FormatHint {
            declared_type: self.dataset_type.clone(),
            file_name: self.dataset_name.clone(),
        }
    }

    pub fn decode_content(&self) -> Result<Vec<u8>, DecodeError> {
        let encoding = ContentEncoding::from_label(self.encoding.as_deref())?;
        encoding.decode(self.content.as_deref().unwrap_or_default())
    }

    /// Decode `content` and run [`parse_auto`] with the payload's type and
    /// name as the hint. An unsupported type is reported before anything is
    /// decoded.
    pub fn parse(&self, config: &ParseConfig) -> Result<ParseOutcome, DecodeError> {
        let hint = self.hint();
        if let DetectedFormat::Unsupported(label) = hint.detect() {
            return Ok(ParseOutcome::unsupported(&label));
        }
        let bytes = self.decode_content()?;
        parse_auto(&bytes, &hint, config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetViewResponse {
    #[serde(default)]
    pub result: DatasetPayload,
    #[serde(rename = "statusCode", default)]
    pub status_code: Option<u16>,
    #[serde(rename = "statusMessage", default)]
    pub status_message: Option<String>,
}

impl DatasetViewResponse {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// A missing status code counts as success.
    pub fn is_success(&self) -> bool {
        self.status_code.is_none_or(|code| (200..300).contains(&code))
    }
}

/// Server-reported column list, `{ "results": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnsResponse {
    #[serde(default)]
    pub results: Vec<Value>,
}

impl ColumnsResponse {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn columns(&self) -> Vec<String> {
        clean_column_values(&self.results)
    }
}

/// Body of the remove-columns call sent when the user confirms deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveColumnsRequest {
    pub campaign_uuid: String,
    pub columns_to_remove: Vec<String>,
    pub dataset_uuid: String,
}

impl RemoveColumnsRequest {
    pub fn new(
        campaign_uuid: impl Into<String>,
        dataset_uuid: impl Into<String>,
        columns_to_remove: Vec<String>,
    ) -> Self {
        Self {
            campaign_uuid: campaign_uuid.into(),
            columns_to_remove,
            dataset_uuid: dataset_uuid.into(),
        }
    }
}

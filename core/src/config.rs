//! Configuration for dataset parsing.
//!
//! `ParseConfig` centralizes the row caps, archive limits and fallback
//! switches so no parser hardcodes its own guard.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::xlsx::ArchiveLimits;

/// Data rows read from a CSV before the rest is ignored.
pub const DEFAULT_CSV_ROW_LIMIT: usize = 1000;

/// Largest upload accepted by [`crate::validate_upload`] (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    #[serde(alias = "max_csv_rows")]
    pub csv_row_limit: Option<usize>,
    #[serde(alias = "max_xlsx_rows")]
    pub xlsx_row_limit: Option<usize>,
    pub archive: ArchiveLimits,
    pub csv_fallback_for_xlsx: bool,
    pub json_fallback: bool,
    pub max_upload_bytes: u64,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            csv_row_limit: Some(DEFAULT_CSV_ROW_LIMIT),
            xlsx_row_limit: None,
            archive: ArchiveLimits::default(),
            csv_fallback_for_xlsx: true,
            json_fallback: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ParseConfig {
    /// No row caps on either format.
    pub fn unbounded() -> Self {
        Self {
            csv_row_limit: None,
            xlsx_row_limit: None,
            ..Default::default()
        }
    }

    /// Only the declared format is attempted; no CSV or JSON fallbacks.
    pub fn strict() -> Self {
        Self {
            csv_fallback_for_xlsx: false,
            json_fallback: false,
            ..Default::default()
        }
    }

    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder {
            inner: ParseConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_limit(self.csv_row_limit, "csv_row_limit")?;
        ensure_limit(self.xlsx_row_limit, "xlsx_row_limit")?;
        ensure_non_zero(self.archive.max_entries as u64, "archive.max_entries")?;
        ensure_non_zero(
            self.archive.max_part_uncompressed_bytes,
            "archive.max_part_uncompressed_bytes",
        )?;
        ensure_non_zero(
            self.archive.max_total_uncompressed_bytes,
            "archive.max_total_uncompressed_bytes",
        )?;
        ensure_non_zero(self.max_upload_bytes, "max_upload_bytes")?;

        if self.archive.max_part_uncompressed_bytes > self.archive.max_total_uncompressed_bytes {
            return Err(ConfigError::PartLimitExceedsTotal {
                part: self.archive.max_part_uncompressed_bytes,
                total: self.archive.max_total_uncompressed_bytes,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero when set")]
    ZeroLimit { field: &'static str },
    #[error(
        "archive part limit ({part} bytes) must not exceed the total limit ({total} bytes)"
    )]
    PartLimitExceedsTotal { part: u64, total: u64 },
}

fn ensure_limit(value: Option<usize>, field: &'static str) -> Result<(), ConfigError> {
    match value {
        Some(0) => Err(ConfigError::ZeroLimit { field }),
        _ => Ok(()),
    }
}

fn ensure_non_zero(value: u64, field: &'static str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroLimit { field });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ParseConfigBuilder {
    inner: ParseConfig,
}

impl Default for ParseConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseConfigBuilder {
    pub fn new() -> Self {
        ParseConfig::builder()
    }

    pub fn csv_row_limit(mut self, value: Option<usize>) -> Self {
        self.inner.csv_row_limit = value;
        self
    }

    pub fn xlsx_row_limit(mut self, value: Option<usize>) -> Self {
        self.inner.xlsx_row_limit = value;
        self
    }

    pub fn archive_limits(mut self, value: ArchiveLimits) -> Self {
        self.inner.archive = value;
        self
    }

    pub fn csv_fallback_for_xlsx(mut self, value: bool) -> Self {
        self.inner.csv_fallback_for_xlsx = value;
        self
    }

    pub fn json_fallback(mut self, value: bool) -> Self {
        self.inner.json_fallback = value;
        self
    }

    pub fn max_upload_bytes(mut self, value: u64) -> Self {
        self.inner.max_upload_bytes = value;
        self
    }

    pub fn build(self) -> Result<ParseConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cap_csv_but_not_xlsx() {
        let cfg = ParseConfig::default();
        assert_eq!(cfg.csv_row_limit, Some(1000));
        assert_eq!(cfg.xlsx_row_limit, None);
        assert!(cfg.csv_fallback_for_xlsx);
        assert!(cfg.json_fallback);
        assert_eq!(cfg.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn serde_roundtrip_preserves_defaults() {
        let cfg = ParseConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize default config");
        let parsed: ParseConfig = serde_json::from_str(&json).expect("deserialize default config");
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn serde_aliases_and_partial_documents() {
        let json = r#"{ "max_csv_rows": 25, "max_xlsx_rows": 40 }"#;
        let cfg: ParseConfig = serde_json::from_str(json).expect("deserialize with aliases");
        assert_eq!(cfg.csv_row_limit, Some(25));
        assert_eq!(cfg.xlsx_row_limit, Some(40));
        assert_eq!(cfg.archive, ArchiveLimits::default());
    }

    #[test]
    fn builder_rejects_zero_row_limit() {
        let err = ParseConfig::builder()
            .csv_row_limit(Some(0))
            .build()
            .expect_err("zero cap should be rejected");
        assert_eq!(
            err,
            ConfigError::ZeroLimit {
                field: "csv_row_limit"
            }
        );
    }

    #[test]
    fn builder_rejects_part_limit_above_total() {
        let limits = ArchiveLimits {
            max_part_uncompressed_bytes: 10,
            max_total_uncompressed_bytes: 5,
            ..Default::default()
        };
        let err = ParseConfig::builder()
            .archive_limits(limits)
            .build()
            .expect_err("part limit above total should be rejected");
        assert!(matches!(err, ConfigError::PartLimitExceedsTotal { part: 10, total: 5 }));
    }

    #[test]
    fn presets_differ_in_expected_directions() {
        let unbounded = ParseConfig::unbounded();
        let strict = ParseConfig::strict();

        assert!(unbounded.csv_row_limit.is_none());
        assert!(unbounded.validate().is_ok());
        assert!(!strict.csv_fallback_for_xlsx);
        assert!(!strict.json_fallback);
        assert_eq!(strict.csv_row_limit, ParseConfig::default().csv_row_limit);
    }
}

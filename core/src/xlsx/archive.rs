//! ZIP container access for workbook packages.
//!
//! Every part read is checked against [`ArchiveLimits`] before it is
//! inflated, so a hostile upload cannot balloon in memory.

use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error_codes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveLimits {
    pub max_entries: usize,
    pub max_part_uncompressed_bytes: u64,
    pub max_total_uncompressed_bytes: u64,
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_part_uncompressed_bytes: 100 * 1024 * 1024,
            max_total_uncompressed_bytes: 500 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a ZIP container")]
    NotZip,
    #[error("not a spreadsheet package (missing [Content_Types].xml)")]
    NotOpcPackage,
    #[error("archive has too many entries: {entries} (limit: {max_entries})")]
    TooManyEntries { entries: usize, max_entries: usize },
    #[error("part '{path}' is too large: {size} bytes (limit: {limit} bytes)")]
    PartTooLarge { path: String, size: u64, limit: u64 },
    #[error("total uncompressed size exceeds limit: would exceed {limit} bytes")]
    TotalTooLarge { limit: u64 },
    #[error("failed to read ZIP entry '{path}': {reason}")]
    Read { path: String, reason: String },
}

impl ArchiveError {
    pub fn code(&self) -> &'static str {
        match self {
            ArchiveError::Io(_) => error_codes::ARCHIVE_IO,
            ArchiveError::NotZip => error_codes::ARCHIVE_NOT_ZIP,
            ArchiveError::NotOpcPackage => error_codes::ARCHIVE_NOT_OPC,
            ArchiveError::TooManyEntries { .. } => error_codes::ARCHIVE_TOO_MANY_ENTRIES,
            ArchiveError::PartTooLarge { .. } => error_codes::ARCHIVE_PART_TOO_LARGE,
            ArchiveError::TotalTooLarge { .. } => error_codes::ARCHIVE_TOTAL_TOO_LARGE,
            ArchiveError::Read { .. } => error_codes::ARCHIVE_READ,
        }
    }
}

/// Cheap check for the local-file-header signature that opens every ZIP.
pub fn looks_like_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04")
}

pub struct WorkbookArchive<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    limits: ArchiveLimits,
    total_read: u64,
}

impl<'a> WorkbookArchive<'a> {
    pub fn open(bytes: &'a [u8], limits: ArchiveLimits) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(|err| match err {
            ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) => ArchiveError::NotZip,
            ZipError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                ArchiveError::NotZip
            }
            ZipError::Io(e) => ArchiveError::Io(e),
            other => ArchiveError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                other.to_string(),
            )),
        })?;

        if archive.len() > limits.max_entries {
            return Err(ArchiveError::TooManyEntries {
                entries: archive.len(),
                max_entries: limits.max_entries,
            });
        }

        let container = WorkbookArchive {
            archive,
            limits,
            total_read: 0,
        };

        if container.resolve_name("[Content_Types].xml").is_none() {
            return Err(ArchiveError::NotOpcPackage);
        }

        Ok(container)
    }

    /// Exact entry name, or the first entry matching it case-insensitively
    /// once backslashes are normalized.
    fn resolve_name(&self, name: &str) -> Option<String> {
        let mut fallback = None;
        for candidate in self.archive.file_names() {
            if candidate == name {
                return Some(candidate.to_string());
            }
            if fallback.is_none() && candidate.replace('\\', "/").eq_ignore_ascii_case(name) {
                fallback = Some(candidate.to_string());
            }
        }
        fallback
    }

    /// Read a part, or `None` when the archive has no such entry.
    pub fn read_part_optional(&mut self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        let Some(entry_name) = self.resolve_name(name) else {
            return Ok(None);
        };

        let mut file = self
            .archive
            .by_name(&entry_name)
            .map_err(|e| ArchiveError::Read {
                path: entry_name.clone(),
                reason: e.to_string(),
            })?;
        let size = file.size();

        if size > self.limits.max_part_uncompressed_bytes {
            return Err(ArchiveError::PartTooLarge {
                path: entry_name,
                size,
                limit: self.limits.max_part_uncompressed_bytes,
            });
        }

        let new_total = self.total_read.saturating_add(size);
        if new_total > self.limits.max_total_uncompressed_bytes {
            return Err(ArchiveError::TotalTooLarge {
                limit: self.limits.max_total_uncompressed_bytes,
            });
        }

        let mut buf = Vec::with_capacity(size.min(1 << 20) as usize);
        file.read_to_end(&mut buf).map_err(|e| ArchiveError::Read {
            path: entry_name.clone(),
            reason: e.to_string(),
        })?;

        self.total_read = new_total;
        Ok(Some(buf))
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn limits(&self) -> &ArchiveLimits {
        &self.limits
    }
}

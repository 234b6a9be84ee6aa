//! Cleaning-history persistence: one JSON file, newest first, capped.
//!
//! The engine itself never writes history; the caller appends a record
//! after a manual or scheduled batch completes.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::errors::{DmhError, Result};

/// Records kept before the oldest ones fall off.
pub const HISTORY_CAP: usize = 100;

/// Overall outcome of one cleaning batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanStatus {
    Success,
    Partial,
    Failed,
}

impl CleanStatus {
    /// Classify a batch from its counts.
    #[must_use]
    pub const fn from_counts(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (_, 0) => Self::Success,
            (0, _) => Self::Failed,
            _ => Self::Partial,
        }
    }
}

impl std::fmt::Display for CleanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Partial => write!(f, "partial"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One cleaning run, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Local>,
    pub categories: Vec<String>,
    pub freed_display: String,
    pub status: CleanStatus,
}

/// JSON-file-backed history store.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All records, newest first. A missing or unreadable file reads as
    /// empty history rather than an error — old history is not worth
    /// blocking a cleaning run over.
    #[must_use]
    pub fn load(&self) -> Vec<HistoryRecord> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Prepend a record and persist, dropping anything past the cap.
    pub fn append(&self, record: HistoryRecord) -> Result<()> {
        let mut records = self.load();
        records.insert(0, record);
        records.truncate(HISTORY_CAP);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| DmhError::io(parent, source))?;
        }
        let rendered = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, rendered).map_err(|source| DmhError::io(&self.path, source))
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

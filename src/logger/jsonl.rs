//! JSONL activity log: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object, assembled in memory and
//! written with a single `write_all` so a tailing process never sees a
//! partial line. Logging must never take the engine down, so the writer
//! degrades in steps: primary file → stderr (with a `[DMH-LOG]` prefix)
//! → silent discard.

#![allow(missing_docs)]

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Event types matching the engine's activity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ScanCompleted,
    ItemCleaned,
    ItemCleanFailed,
    MaintenanceRun,
    Error,
}

/// A single log entry — every field optional except `ts`, `event`,
/// `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freed_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub succeeded: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: Utc::now().to_rfc3339(),
            event,
            severity,
            label: None,
            path: None,
            size_bytes: None,
            freed_bytes: None,
            succeeded: None,
            failed: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

/// Append-only JSONL writer with graceful degradation.
#[derive(Debug)]
pub struct JsonlWriter {
    path: PathBuf,
    state: WriterState,
}

impl JsonlWriter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: WriterState::Normal,
        }
    }

    /// Append one entry. Never fails; on trouble the writer steps down the
    /// degradation chain and keeps going.
    pub fn append(&mut self, entry: &LogEntry) {
        let Ok(mut line) = serde_json::to_string(entry) else {
            return;
        };
        line.push('\n');

        if self.state == WriterState::Normal && !self.write_to_file(&line) {
            self.state = WriterState::Stderr;
        }
        if self.state == WriterState::Stderr
            && std::io::stderr()
                .write_all(format!("[DMH-LOG] {line}").as_bytes())
                .is_err()
        {
            self.state = WriterState::Discard;
        }
    }

    fn write_to_file(&self, line: &str) -> bool {
        if let Some(parent) = self.path.parent()
            && fs::create_dir_all(parent).is_err()
        {
            return false;
        }
        let Ok(mut file) = OpenOptions::new().append(true).create(true).open(&self.path) else {
            return false;
        };
        file.write_all(line.as_bytes()).is_ok()
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

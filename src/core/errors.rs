//! DMH-prefixed error types with structured error codes.
//!
//! Every failure the engine can produce is represented as data. The cleaning
//! orchestrator folds these into per-item outcome records rather than letting
//! them cross component boundaries as panics.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, DmhError>;

/// Top-level error type for the maintenance engine.
#[derive(Debug, Error)]
pub enum DmhError {
    #[error("[DMH-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[DMH-1002] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[DMH-1003] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[DMH-2001] refusing to delete {path}: not on the safety whitelist")]
    SafetyRejected { path: PathBuf },

    #[error("[DMH-2002] no privileged command is known for system path {path}")]
    UnknownSystemPath { path: PathBuf },

    #[error("[DMH-2101] authorization cancelled or denied for {path}")]
    AuthorizationCancelled { path: PathBuf },

    #[error("[DMH-2102] privileged command for {path} exited with code {code}")]
    CommandFailed { path: PathBuf, code: i32 },

    #[error("[DMH-2103] privileged command for {path} exceeded its timeout")]
    CommandTimeout { path: PathBuf },

    #[error("[DMH-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[DMH-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl DmhError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "DMH-1001",
            Self::ConfigParse { .. } => "DMH-1002",
            Self::Serialization { .. } => "DMH-1003",
            Self::SafetyRejected { .. } => "DMH-2001",
            Self::UnknownSystemPath { .. } => "DMH-2002",
            Self::AuthorizationCancelled { .. } => "DMH-2101",
            Self::CommandFailed { .. } => "DMH-2102",
            Self::CommandTimeout { .. } => "DMH-2103",
            Self::Io { .. } => "DMH-3001",
            Self::Runtime { .. } => "DMH-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Safety rejections and authorization denials are never retried
    /// automatically; the user may retry the latter by hand.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::CommandTimeout { .. } | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for DmhError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for DmhError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

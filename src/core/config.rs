//! Configuration system: TOML file with full defaults for every field.
//!
//! The maintenance policy is deliberately read-only to the engine: the
//! scheduler consumes it on every evaluation, and only the caller (CLI or
//! settings UI) writes `last_run` back after a successful batch.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::errors::{DmhError, Result};

/// Full configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub maintenance: MaintenancePolicy,
    pub paths: PathsConfig,
}

/// Autonomous-maintenance policy knobs.
///
/// Defaults match a conservative desktop install: automatic maintenance is
/// off until the user opts in, and when on it requires mains power and a
/// quarter hour of idle time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaintenancePolicy {
    pub enabled: bool,
    pub require_ac_power: bool,
    pub idle_threshold_seconds: u64,
    pub disk_threshold_enabled: bool,
    pub disk_threshold_percent: f64,
    pub interval_days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Local>>,
}

impl Default for MaintenancePolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            require_ac_power: true,
            idle_threshold_seconds: 900,
            disk_threshold_enabled: false,
            disk_threshold_percent: 90.0,
            interval_days: 30,
            last_run: None,
        }
    }
}

/// Filesystem paths used by dmh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub history_file: PathBuf,
    pub activity_log: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let config_root = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        let data_root = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        Self {
            config_file: config_root.join("dmh").join("config.toml"),
            history_file: data_root.join("dmh").join("history.json"),
            activity_log: data_root.join("dmh").join("activity.jsonl"),
        }
    }
}

impl Config {
    /// Load configuration from `path`. A missing file yields the defaults;
    /// a present-but-malformed file is an error rather than a silent reset.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(DmhError::io(path, source)),
        };
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Persist the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DmhError::io(parent, source))?;
        }
        let rendered = toml::to_string_pretty(self).map_err(|err| DmhError::Serialization {
            context: "toml",
            details: err.to_string(),
        })?;
        fs::write(path, rendered).map_err(|source| DmhError::io(path, source))
    }

    /// Reject values that would make the scheduler misbehave.
    pub fn validate(&self) -> Result<()> {
        let policy = &self.maintenance;
        if !(0.0..=100.0).contains(&policy.disk_threshold_percent) {
            return Err(DmhError::InvalidConfig {
                details: format!(
                    "disk_threshold_percent must be within 0..=100, got {}",
                    policy.disk_threshold_percent
                ),
            });
        }
        if policy.interval_days < 1 {
            return Err(DmhError::InvalidConfig {
                details: format!("interval_days must be at least 1, got {}", policy.interval_days),
            });
        }
        Ok(())
    }
}

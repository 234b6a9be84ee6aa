//! Cleaning orchestrator: dispatches user-space vs. privileged deletion.
//!
//! Every selected item is validated again right before deletion, even though
//! it came from a scan — the validator is cheap and the cost of trusting a
//! stale or forged selection is not. One item's failure never aborts the
//! rest of the batch; all failure is captured as data in the report.

pub mod elevate;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::cleaner::elevate::{
    COMMAND_TIMEOUT, CommandOutcome, PrivilegedRunner, ProcessRunner,
};
use crate::core::errors::{DmhError, Result};
use crate::pkg::manager::PackageManager;
use crate::pkg::targets::CleanupTarget;
use crate::safety::SafetyValidator;
use crate::scanner::ScanResult;

/// Per-item result of a cleaning batch.
#[derive(Debug, Clone, Serialize)]
pub struct CleanOutcome {
    pub label: &'static str,
    pub path: PathBuf,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Aggregated result of a cleaning batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub outcomes: Vec<CleanOutcome>,
    /// Scan-time sizes of the items that succeeded.
    pub bytes_freed: u64,
}

impl CleanReport {
    /// Whether every attempted item succeeded (true for an empty batch).
    #[must_use]
    pub fn is_full_success(&self) -> bool {
        self.failed == 0
    }
}

/// Dispatches deletions for caller-selected scan results.
pub struct Orchestrator {
    manager: PackageManager,
    validator: SafetyValidator,
    runner: Box<dyn PrivilegedRunner>,
    timeout: Duration,
}

impl Orchestrator {
    /// Production orchestrator for the detected manager.
    #[must_use]
    pub fn new(manager: PackageManager) -> Self {
        Self::with_parts(
            manager,
            SafetyValidator::new(manager),
            Box::new(ProcessRunner),
            COMMAND_TIMEOUT,
        )
    }

    /// Full dependency injection, for tests.
    #[must_use]
    pub fn with_parts(
        manager: PackageManager,
        validator: SafetyValidator,
        runner: Box<dyn PrivilegedRunner>,
        timeout: Duration,
    ) -> Self {
        Self {
            manager,
            validator,
            runner,
            timeout,
        }
    }

    /// Clean every selected item independently and aggregate the outcomes.
    pub fn clean(&self, selected: &[ScanResult]) -> CleanReport {
        let mut report = CleanReport::default();
        for item in selected {
            match self.clean_item(item) {
                Ok(()) => {
                    report.succeeded += 1;
                    report.bytes_freed += item.size_bytes;
                    report.outcomes.push(CleanOutcome {
                        label: item.label,
                        path: item.path.clone(),
                        succeeded: true,
                        error_code: None,
                        error_message: None,
                    });
                }
                Err(err) => {
                    report.failed += 1;
                    report.errors.push(err.to_string());
                    report.outcomes.push(CleanOutcome {
                        label: item.label,
                        path: item.path.clone(),
                        succeeded: false,
                        error_code: Some(err.code().to_string()),
                        error_message: Some(err.to_string()),
                    });
                }
            }
        }
        report
    }

    fn clean_item(&self, item: &ScanResult) -> Result<()> {
        // Rejection happens before any filesystem access is attempted.
        if !self.validator.is_safe_to_delete(&item.path) {
            return Err(DmhError::SafetyRejected {
                path: item.path.clone(),
            });
        }
        if item.is_system {
            self.clean_system(&item.path)
        } else {
            clean_user_path(&item.path)
        }
    }

    fn clean_system(&self, path: &Path) -> Result<()> {
        let argv = CleanupTarget::resolve(self.manager, path)
            .and_then(CleanupTarget::command)
            .ok_or_else(|| DmhError::UnknownSystemPath {
                path: path.to_path_buf(),
            })?;

        match self.runner.run(&argv, self.timeout)? {
            CommandOutcome::Success => Ok(()),
            CommandOutcome::AuthorizationCancelled => Err(DmhError::AuthorizationCancelled {
                path: path.to_path_buf(),
            }),
            CommandOutcome::Failed(code) => Err(DmhError::CommandFailed {
                path: path.to_path_buf(),
                code,
            }),
            CommandOutcome::TimedOut => Err(DmhError::CommandTimeout {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Delete a user-space candidate: a file is removed outright; a directory
/// has every file beneath it removed while the directory structure stays in
/// place. Best-effort — a failure partway through is reported but files
/// already removed stay removed.
fn clean_user_path(path: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        // Already gone; nothing left to do.
        return Ok(());
    };

    if !meta.is_dir() {
        return fs::remove_file(path).map_err(|source| DmhError::io(path, source));
    }

    let mut failures: Vec<(PathBuf, std::io::Error)> = Vec::new();
    remove_files_under(path, &mut failures);
    match failures.into_iter().next() {
        None => Ok(()),
        Some((failed_path, source)) => Err(DmhError::io(failed_path, source)),
    }
}

fn remove_files_under(dir: &Path, failures: &mut Vec<(PathBuf, std::io::Error)>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            failures.push((dir.to_path_buf(), source));
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            remove_files_under(&path, failures);
        } else if let Err(source) = fs::remove_file(&path) {
            // Symlinks and regular files alike: the link itself goes,
            // never its destination.
            failures.push((path, source));
        }
    }
}

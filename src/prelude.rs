//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use disk_maintenance_helper::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, MaintenancePolicy};
pub use crate::core::errors::{DmhError, Result};

// Catalog and scanning
pub use crate::catalog::{Category, build_catalog};
pub use crate::catalog::sizing::{compute_size, format_size};
pub use crate::scanner::{ScanResult, scan};

// Package manager
pub use crate::pkg::manager::PackageManager;
pub use crate::pkg::targets::CleanupTarget;

// Safety and cleaning
pub use crate::cleaner::{CleanReport, Orchestrator};
pub use crate::cleaner::elevate::{CommandOutcome, PrivilegedRunner, ProcessRunner};
pub use crate::safety::SafetyValidator;

// Scheduling and history
pub use crate::history::{CleanStatus, HistoryRecord, HistoryStore};
pub use crate::sched::probes::{LinuxProbe, SystemProbe};
pub use crate::sched::{MaintenanceSummary, Scheduler, Trigger};

#![forbid(unsafe_code)]

//! Disk Maintenance Helper (dmh) — safe periodic disk-space reclamation for
//! Linux desktops.
//!
//! The engine is deliberately small and paranoid:
//! 1. **Catalog + scanner** — a fixed set of cache/log/package-cache
//!    locations is measured and offered as candidates; nothing else ever is.
//! 2. **Safety validator** — the single choke point every deletion passes
//!    through: deny-first forbidden prefixes, then an explicit allow-list.
//! 3. **Resolver + orchestrator** — user-space candidates are deleted
//!    directly; system candidates map to exact, pre-registered privileged
//!    commands.
//! 4. **Scheduler** — decides whether unattended maintenance may run right
//!    now (power, idle, disk pressure, interval) and runs it on the
//!    user-space subset only.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use disk_maintenance_helper::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use disk_maintenance_helper::pkg::manager::PackageManager;
//! use disk_maintenance_helper::safety::SafetyValidator;
//! ```

pub mod prelude;

pub mod catalog;
pub mod cleaner;
pub mod core;
pub mod history;
pub mod logger;
pub mod pkg;
pub mod safety;
pub mod scanner;
pub mod sched;

//! Autonomous maintenance scheduling.
//!
//! `may_run_now` is a pure decision function re-evaluated on every tick;
//! the only carried state is the date of the last disk-pressure trigger,
//! which limits that branch to once per calendar day. Unattended runs
//! touch user-space categories only — system paths always wait for an
//! explicit, confirmed selection.

pub mod probes;

use chrono::{DateTime, Local, NaiveDate};
use parking_lot::Mutex;
use serde::Serialize;

use crate::catalog::Category;
use crate::catalog::sizing::format_size;
use crate::cleaner::{CleanReport, Orchestrator};
use crate::core::config::MaintenancePolicy;
use crate::scanner::{ScanResult, scan};
use crate::sched::probes::{LinuxProbe, SystemProbe};

/// What prompted this evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Routine tick: only the configured interval can make the run due.
    Interval,
    /// Disk-pressure tick: high usage may pre-empt the interval, at most
    /// once per calendar day.
    DiskPressure,
}

/// Result of a completed unattended run, for the caller to persist.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceSummary {
    pub timestamp: DateTime<Local>,
    /// Labels of the categories that were actually cleaned.
    pub categories: Vec<&'static str>,
    pub bytes_freed: u64,
    pub freed_display: String,
    pub report: CleanReport,
}

/// Evaluates the maintenance policy and drives unattended runs.
pub struct Scheduler {
    probe: Box<dyn SystemProbe>,
    last_disk_check: Mutex<Option<NaiveDate>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::with_probe(Box::new(LinuxProbe::new()))
    }
}

impl Scheduler {
    /// Production scheduler with the real Linux probes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler with an injected probe, for deterministic tests.
    #[must_use]
    pub fn with_probe(probe: Box<dyn SystemProbe>) -> Self {
        Self {
            probe,
            last_disk_check: Mutex::new(None),
        }
    }

    /// Whether unattended maintenance is permitted right now.
    ///
    /// Checks short-circuit in a fixed order: enabled, power, idle, the
    /// once-per-day disk-pressure branch, and finally the interval.
    pub fn may_run_now(&self, policy: &MaintenancePolicy, trigger: Trigger) -> bool {
        if !policy.enabled {
            return false;
        }
        if policy.require_ac_power && !self.probe.on_ac_power() {
            return false;
        }
        if self.probe.idle_seconds() < policy.idle_threshold_seconds {
            return false;
        }

        if trigger == Trigger::DiskPressure && policy.disk_threshold_enabled {
            let today = Local::now().date_naive();
            // Compare-and-set under one lock acquisition so concurrent
            // ticks cannot both claim today's disk check.
            let mut last_check = self.last_disk_check.lock();
            if *last_check != Some(today)
                && self.probe.disk_usage_percent() >= policy.disk_threshold_percent
            {
                *last_check = Some(today);
                // Urgent disk pressure pre-empts the interval.
                return true;
            }
        }

        interval_elapsed(policy)
    }

    /// One unattended maintenance pass: scan, keep user-space items only,
    /// clean, summarize.
    ///
    /// Returns `None` when there was nothing to do or nothing succeeded.
    /// The caller persists the summary to history and stamps
    /// `policy.last_run` — disk-triggered and interval-triggered runs
    /// update the same clock.
    pub fn run_once(
        &self,
        catalog: &[Category],
        orchestrator: &Orchestrator,
    ) -> Option<MaintenanceSummary> {
        let user_items: Vec<ScanResult> = scan(catalog)
            .into_iter()
            .filter(|item| !item.is_system)
            .collect();
        if user_items.is_empty() {
            return None;
        }

        let report = orchestrator.clean(&user_items);
        if report.succeeded == 0 {
            return None;
        }

        let categories: Vec<&'static str> = report
            .outcomes
            .iter()
            .filter(|outcome| outcome.succeeded)
            .map(|outcome| outcome.label)
            .collect();
        Some(MaintenanceSummary {
            timestamp: Local::now(),
            categories,
            bytes_freed: report.bytes_freed,
            freed_display: format_size(report.bytes_freed),
            report,
        })
    }
}

fn interval_elapsed(policy: &MaintenancePolicy) -> bool {
    match policy.last_run {
        // Never having run counts as due.
        None => true,
        Some(last_run) => (Local::now() - last_run).num_days() >= policy.interval_days,
    }
}

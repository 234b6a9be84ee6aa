//! System condition probes consulted by the scheduler.
//!
//! All three probes degrade toward the harmless answer: power reads as
//! mains when undeterminable (a desktop without a battery must not be
//! blocked), idle reads as zero (assume the user is active), and disk
//! usage reads as zero (no phantom pressure trigger).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Seam for the scheduler's environment checks.
pub trait SystemProbe: Send + Sync {
    /// Whether the machine is currently on mains power.
    fn on_ac_power(&self) -> bool;
    /// Seconds since the last user input.
    fn idle_seconds(&self) -> u64;
    /// Used percentage of the monitored filesystem.
    fn disk_usage_percent(&self) -> f64;
}

/// Production probe: sysfs power supplies, `xprintidle`, statvfs on `/`.
#[derive(Debug, Clone)]
pub struct LinuxProbe {
    power_supply_root: PathBuf,
    disk_root: PathBuf,
}

impl Default for LinuxProbe {
    fn default() -> Self {
        Self {
            power_supply_root: PathBuf::from("/sys/class/power_supply"),
            disk_root: PathBuf::from("/"),
        }
    }
}

impl LinuxProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe against explicit roots, for tests with sysfs-shaped fixtures.
    #[must_use]
    pub fn with_roots(power_supply_root: PathBuf, disk_root: PathBuf) -> Self {
        Self {
            power_supply_root,
            disk_root,
        }
    }
}

impl SystemProbe for LinuxProbe {
    fn on_ac_power(&self) -> bool {
        // No power-supply directory means no battery to worry about.
        let Ok(supplies) = fs::read_dir(&self.power_supply_root) else {
            return true;
        };
        for supply in supplies.flatten() {
            let kind = fs::read_to_string(supply.path().join("type")).unwrap_or_default();
            if kind.trim() == "Mains" {
                if let Ok(online) = fs::read_to_string(supply.path().join("online")) {
                    return online.trim() == "1";
                }
            }
        }
        true
    }

    fn idle_seconds(&self) -> u64 {
        let Ok(output) = Command::new("xprintidle").output() else {
            return 0;
        };
        if !output.status.success() {
            return 0;
        }
        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse::<u64>()
            .map_or(0, |millis| millis / 1000)
    }

    fn disk_usage_percent(&self) -> f64 {
        disk_usage_percent_of(&self.disk_root)
    }
}

#[cfg(unix)]
fn disk_usage_percent_of(path: &Path) -> f64 {
    let Ok(stats) = nix::sys::statvfs::statvfs(path) else {
        return 0.0;
    };
    let fragment = u64::from(stats.fragment_size());
    let total = stats.blocks() * fragment;
    if total == 0 {
        return 0.0;
    }
    let used = (stats.blocks() - stats.blocks_free()) * fragment;
    #[allow(clippy::cast_precision_loss)]
    {
        (used as f64 / total as f64) * 100.0
    }
}

#[cfg(not(unix))]
fn disk_usage_percent_of(_path: &Path) -> f64 {
    0.0
}

//! Cleanable system targets and their privileged commands.
//!
//! Every system-space location the engine may ever touch is a variant of
//! [`CleanupTarget`]; the match arms below are the complete privileged
//! command surface. A path that resolves to no variant has no command, and
//! the orchestrator reports it instead of improvising one.
//!
//! Two kinds of target exist:
//! - **directory targets** point at a real cache/log directory;
//! - **marker targets** stand in for an action with no directory of its own
//!   (package autoremove/orphan removal). Marker paths live under the
//!   reserved virtual prefix [`ACTION_ROOT`], which is never created on
//!   disk, and are honored by exact equality only.

use std::path::{Path, PathBuf};

use crate::pkg::manager::PackageManager;

/// Virtual prefix for marker paths. Nothing is ever created here.
pub const ACTION_ROOT: &str = "/var/lib/dmh/actions";

/// Shell pipeline that rotates out archived logs, truncates live ones, and
/// vacuums the journal. Run under `pkexec sh -c`.
const LOG_VACUUM_PIPELINE: &str = r"find /var/log -type f -regex '.*\.\(gz\|[0-9]+\)$' -delete && find /var/log -type f -name '*.log' -exec truncate -s 0 {} + && journalctl --vacuum-time=1s";

/// One cleanable system-space target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupTarget {
    AptArchiveCache,
    AptAutoremove,
    PacmanPackageCache,
    PacmanOrphans,
    DnfMetadataCache,
    DnfAutoremove,
    ZypperPackageCache,
    ZypperUnneeded,
    YumMetadataCache,
    YumAutoremove,
    SystemLogs,
    Coredumps,
}

impl CleanupTarget {
    /// The two targets every installation has regardless of package manager.
    pub const GENERIC: [Self; 2] = [Self::SystemLogs, Self::Coredumps];

    /// The per-manager table: the real cache directory first, then the
    /// autoremove/orphans marker.
    #[must_use]
    pub const fn for_manager(manager: PackageManager) -> &'static [Self] {
        match manager {
            PackageManager::Apt => &[Self::AptArchiveCache, Self::AptAutoremove],
            PackageManager::Pacman => &[Self::PacmanPackageCache, Self::PacmanOrphans],
            PackageManager::Dnf => &[Self::DnfMetadataCache, Self::DnfAutoremove],
            PackageManager::Zypper => &[Self::ZypperPackageCache, Self::ZypperUnneeded],
            PackageManager::Yum => &[Self::YumMetadataCache, Self::YumAutoremove],
            PackageManager::Unknown => &[],
        }
    }

    /// The manager a target belongs to, or `None` for the generic targets.
    #[must_use]
    pub const fn manager(self) -> Option<PackageManager> {
        match self {
            Self::AptArchiveCache | Self::AptAutoremove => Some(PackageManager::Apt),
            Self::PacmanPackageCache | Self::PacmanOrphans => Some(PackageManager::Pacman),
            Self::DnfMetadataCache | Self::DnfAutoremove => Some(PackageManager::Dnf),
            Self::ZypperPackageCache | Self::ZypperUnneeded => Some(PackageManager::Zypper),
            Self::YumMetadataCache | Self::YumAutoremove => Some(PackageManager::Yum),
            Self::SystemLogs | Self::Coredumps => None,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AptArchiveCache
            | Self::PacmanPackageCache
            | Self::DnfMetadataCache
            | Self::ZypperPackageCache
            | Self::YumMetadataCache => "Package cache",
            Self::AptAutoremove
            | Self::PacmanOrphans
            | Self::DnfAutoremove
            | Self::ZypperUnneeded
            | Self::YumAutoremove => "Unused packages",
            Self::SystemLogs => "System logs",
            Self::Coredumps => "Crash dumps",
        }
    }

    /// Display description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AptArchiveCache
            | Self::PacmanPackageCache
            | Self::DnfMetadataCache
            | Self::ZypperPackageCache
            | Self::YumMetadataCache => "Downloaded package files kept by the package manager",
            Self::AptAutoremove | Self::DnfAutoremove | Self::YumAutoremove => {
                "Packages installed as dependencies that nothing needs anymore"
            }
            Self::PacmanOrphans => "Orphaned packages no installed package depends on",
            Self::ZypperUnneeded => "Packages reported as no longer needed",
            Self::SystemLogs => "Rotated and archived system log files, journal included",
            Self::Coredumps => "Crash dumps collected by systemd-coredump",
        }
    }

    /// Whether this target is an action marker rather than a real directory.
    #[must_use]
    pub const fn is_marker(self) -> bool {
        matches!(
            self,
            Self::AptAutoremove
                | Self::PacmanOrphans
                | Self::DnfAutoremove
                | Self::ZypperUnneeded
                | Self::YumAutoremove
        )
    }

    /// The identity path: a real directory for directory targets, a virtual
    /// marker path for action targets. This is what the safety validator and
    /// the orchestrator see.
    #[must_use]
    pub fn path(self) -> PathBuf {
        match self {
            Self::AptArchiveCache => PathBuf::from("/var/cache/apt/archives"),
            Self::AptAutoremove => marker_path("apt-autoremove"),
            Self::PacmanPackageCache => PathBuf::from("/var/cache/pacman/pkg"),
            Self::PacmanOrphans => marker_path("pacman-orphans"),
            Self::DnfMetadataCache => PathBuf::from("/var/cache/dnf"),
            Self::DnfAutoremove => marker_path("dnf-autoremove"),
            Self::ZypperPackageCache => PathBuf::from("/var/cache/zypp/packages"),
            Self::ZypperUnneeded => marker_path("zypper-unneeded"),
            Self::YumMetadataCache => PathBuf::from("/var/cache/yum"),
            Self::YumAutoremove => marker_path("yum-autoremove"),
            Self::SystemLogs => PathBuf::from("/var/log"),
            Self::Coredumps => PathBuf::from("/var/lib/systemd/coredump"),
        }
    }

    /// What the scanner stats to decide existence and size. Directory
    /// targets probe themselves; marker targets probe the manager binary,
    /// which proves the action is available and gives a stable nonzero size.
    #[must_use]
    pub fn probe_path(self) -> Option<PathBuf> {
        if self.is_marker() {
            self.manager().and_then(PackageManager::binary_path)
        } else {
            Some(self.path())
        }
    }

    /// The literal privileged argument vector for this target.
    ///
    /// `None` means the target is recognized but has no non-interactive
    /// command (zypper's unneeded-packages action); the orchestrator
    /// surfaces that as an unknown-system-path failure.
    #[must_use]
    pub fn command(self) -> Option<Vec<String>> {
        match self {
            Self::AptArchiveCache => Some(argv(&["pkexec", "apt-get", "clean"])),
            Self::AptAutoremove => Some(argv(&["pkexec", "apt-get", "autoremove", "-y"])),
            Self::PacmanPackageCache => {
                Some(argv(&["pkexec", "pacman", "-Scc", "--noconfirm"]))
            }
            // Orphan removal is inherently a pipeline: query, then feed the
            // result to the remover.
            Self::PacmanOrphans => Some(argv(&[
                "sh",
                "-c",
                "pacman -Qtdq | xargs -r pkexec pacman -Rns --noconfirm",
            ])),
            Self::DnfMetadataCache => Some(argv(&["pkexec", "dnf", "clean", "all"])),
            Self::DnfAutoremove => Some(argv(&["pkexec", "dnf", "autoremove", "-y"])),
            Self::ZypperPackageCache => Some(argv(&["pkexec", "zypper", "clean", "--all"])),
            Self::ZypperUnneeded => None,
            Self::YumMetadataCache => Some(argv(&["pkexec", "yum", "clean", "all"])),
            Self::YumAutoremove => Some(argv(&["pkexec", "yum", "autoremove", "-y"])),
            Self::SystemLogs => Some(argv(&["pkexec", "sh", "-c", LOG_VACUUM_PIPELINE])),
            Self::Coredumps => Some(argv(&[
                "pkexec",
                "sh",
                "-c",
                "rm -rf /var/lib/systemd/coredump/*",
            ])),
        }
    }

    /// Map a path back to the target it identifies, for the given manager.
    ///
    /// Comparison is exact equality — a marker is never matched by prefix,
    /// and a manager only resolves its own table plus the generic targets.
    #[must_use]
    pub fn resolve(manager: PackageManager, path: &Path) -> Option<Self> {
        Self::for_manager(manager)
            .iter()
            .chain(Self::GENERIC.iter())
            .copied()
            .find(|target| target.path() == path)
    }
}

fn marker_path(action: &str) -> PathBuf {
    Path::new(ACTION_ROOT).join(action)
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

//! Safety-validator regression suite: the allow-list must never widen.
//!
//! These tests pin the most security-sensitive behavior in the crate: no
//! forbidden prefix is ever deletable, markers validate by exact equality
//! only, and traversal cannot smuggle a forbidden path past the gate.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use disk_maintenance_helper::pkg::manager::PackageManager;
use disk_maintenance_helper::pkg::targets::CleanupTarget;
use disk_maintenance_helper::safety::{FORBIDDEN_PREFIXES, SafetyValidator};

const ALL_MANAGERS: [PackageManager; 6] = [
    PackageManager::Apt,
    PackageManager::Pacman,
    PackageManager::Dnf,
    PackageManager::Zypper,
    PackageManager::Yum,
    PackageManager::Unknown,
];

fn validator_for(manager: PackageManager) -> SafetyValidator {
    SafetyValidator::with_user_cache_root(manager, Path::new("/home/tester/.cache"))
}

#[test]
fn no_manager_can_unlock_a_forbidden_prefix() {
    for manager in ALL_MANAGERS {
        let validator = validator_for(manager);
        for prefix in FORBIDDEN_PREFIXES {
            assert!(
                !validator.is_safe_to_delete(Path::new(prefix)),
                "{manager}: {prefix} must stay forbidden"
            );
            let child = Path::new(prefix).join("anything");
            assert!(
                !validator.is_safe_to_delete(&child),
                "{manager}: {} must stay forbidden",
                child.display()
            );
        }
    }
}

#[test]
fn alternate_spellings_of_forbidden_paths_are_rejected() {
    let validator = validator_for(PackageManager::Apt);
    for spelling in [
        "/etc/",
        "/etc/.",
        "/etc/./passwd",
        "/etc/../etc",
        "/../etc",
        "/usr/bin/../bin/apt",
        "/var/log/../../etc/passwd",
    ] {
        assert!(
            !validator.is_safe_to_delete(Path::new(spelling)),
            "{spelling} must be rejected after canonicalization"
        );
    }
}

#[test]
fn every_registered_marker_validates_exactly_once() {
    for manager in ALL_MANAGERS {
        let validator = validator_for(manager);
        for target in CleanupTarget::for_manager(manager) {
            if !target.is_marker() {
                continue;
            }
            let marker = target.path();
            assert!(
                validator.is_safe_to_delete(&marker),
                "{manager}: marker {} must validate",
                marker.display()
            );

            // Sharing a prefix is not equality.
            let mut extended = marker.clone().into_os_string();
            extended.push("x");
            assert!(!validator.is_safe_to_delete(Path::new(&extended)));
            assert!(!validator.is_safe_to_delete(&marker.join("below")));
            assert!(!validator.is_safe_to_delete(marker.parent().unwrap()));
        }
    }
}

#[test]
fn markers_of_other_managers_never_validate() {
    for manager in ALL_MANAGERS {
        let validator = validator_for(manager);
        for other in ALL_MANAGERS {
            if other == manager {
                continue;
            }
            for target in CleanupTarget::for_manager(other) {
                if target.is_marker() {
                    assert!(
                        !validator.is_safe_to_delete(&target.path()),
                        "{manager} must reject {other}'s marker"
                    );
                }
            }
        }
    }
}

#[test]
fn cache_directories_are_manager_scoped() {
    let apt = validator_for(PackageManager::Apt);
    assert!(apt.is_safe_to_delete(Path::new("/var/cache/apt/archives")));
    assert!(!apt.is_safe_to_delete(Path::new("/var/cache/pacman/pkg")));

    let pacman = validator_for(PackageManager::Pacman);
    assert!(pacman.is_safe_to_delete(Path::new("/var/cache/pacman/pkg")));
    assert!(!pacman.is_safe_to_delete(Path::new("/var/cache/apt/archives")));
}

#[test]
fn traversal_out_of_every_allowed_root_is_rejected() {
    for manager in ALL_MANAGERS {
        let validator = validator_for(manager);
        for root in ["/var/log", "/var/lib/systemd/coredump"] {
            let escape = PathBuf::from(root).join("../../etc/passwd");
            assert!(
                !validator.is_safe_to_delete(&escape),
                "{manager}: {} must not escape",
                escape.display()
            );
        }
    }
}

#[test]
fn the_unknown_manager_still_allows_generic_system_roots() {
    let validator = validator_for(PackageManager::Unknown);
    assert!(validator.is_safe_to_delete(Path::new("/var/log")));
    assert!(validator.is_safe_to_delete(Path::new("/var/lib/systemd/coredump")));
    assert!(!validator.is_safe_to_delete(Path::new("/var/cache/apt/archives")));
}

proptest! {
    // Dot-free suffixes cannot traverse, so everything under /etc must be
    // rejected no matter what the rest of the path looks like.
    #[test]
    fn nothing_under_etc_is_ever_deletable(suffix in "[a-z0-9/_-]{0,40}") {
        let validator = validator_for(PackageManager::Apt);
        let path = PathBuf::from(format!("/etc/{suffix}"));
        prop_assert!(!validator.is_safe_to_delete(&path));
    }

    #[test]
    fn marker_extensions_are_never_deletable(suffix in "[a-z0-9_-]{1,20}") {
        let validator = validator_for(PackageManager::Apt);
        let marker = CleanupTarget::AptAutoremove.path();

        let mut sibling = marker.clone().into_os_string();
        sibling.push(format!("-{suffix}"));
        prop_assert!(!validator.is_safe_to_delete(Path::new(&sibling)));
        prop_assert!(!validator.is_safe_to_delete(&marker.join(&suffix)));
    }

    // Default deny: a path under an unrelated root is rejected for every
    // manager, regardless of spelling.
    #[test]
    fn unrelated_paths_are_rejected_for_every_manager(suffix in "[a-z0-9/_-]{0,40}") {
        let path = PathBuf::from(format!("/srv/unrelated/{suffix}"));
        for manager in ALL_MANAGERS {
            prop_assert!(!validator_for(manager).is_safe_to_delete(&path));
        }
    }
}

//! The safety whitelist: the sole authority on whether a path may be deleted.
//!
//! Every deletion in the crate, user-space or privileged, passes through
//! [`SafetyValidator::is_safe_to_delete`]. The rules, in order:
//!
//! 1. canonicalize the candidate — comparisons never happen on raw input;
//! 2. deny-first: anything under a critical system-root prefix is rejected,
//!    and nothing on the allow side can override that;
//! 3. allow only exact matches or separator-bounded descendants of the
//!    explicitly registered roots, or exact matches of registered marker
//!    paths (markers are never matched by prefix);
//! 4. everything else is rejected.
//!
//! The allow-list grows only by registering new explicit entries at
//! construction. There is no wildcard and no default-allow.

use std::collections::HashSet;
use std::env;
use std::path::{Component, Path, PathBuf};

use crate::pkg::manager::PackageManager;
use crate::pkg::targets::CleanupTarget;

/// Critical system roots. Never deletable, regardless of any allow-list
/// entry or marker. Fixed at compile time and not extensible at runtime.
pub const FORBIDDEN_PREFIXES: [&str; 10] = [
    "/bin",
    "/boot",
    "/dev",
    "/etc",
    "/lib",
    "/proc",
    "/sys",
    "/usr/bin",
    "/usr/lib",
    "/usr/sbin",
];

/// Session allow-list, frozen at construction.
#[derive(Debug)]
pub struct SafetyValidator {
    allowed_roots: Vec<PathBuf>,
    markers: HashSet<PathBuf>,
}

impl SafetyValidator {
    /// Build the allow-list for the detected manager, rooting user-space
    /// permission at the real `~/.cache`. When no cache directory can be
    /// determined, no user-space root is registered at all.
    #[must_use]
    pub fn new(manager: PackageManager) -> Self {
        Self::build(manager, dirs::cache_dir().as_deref())
    }

    /// Construction with an explicit user-cache root, for tests and for
    /// callers that resolve the home directory themselves.
    #[must_use]
    pub fn with_user_cache_root(manager: PackageManager, user_cache_root: &Path) -> Self {
        Self::build(manager, Some(user_cache_root))
    }

    fn build(manager: PackageManager, user_cache_root: Option<&Path>) -> Self {
        let mut allowed_roots = vec![
            canonicalize_lenient(Path::new("/var/log")),
            canonicalize_lenient(Path::new("/var/lib/systemd/coredump")),
        ];
        let mut markers = HashSet::new();

        for target in CleanupTarget::for_manager(manager) {
            let path = canonicalize_lenient(&target.path());
            if target.is_marker() {
                markers.insert(path);
            } else {
                allowed_roots.push(path);
            }
        }

        if let Some(root) = user_cache_root {
            allowed_roots.push(canonicalize_lenient(root));
        }

        Self {
            allowed_roots,
            markers,
        }
    }

    /// The single choke point before any deletion.
    #[must_use]
    pub fn is_safe_to_delete(&self, path: &Path) -> bool {
        let canonical = canonicalize_lenient(path);

        // Deny-first: absolute priority, markers included.
        if FORBIDDEN_PREFIXES
            .iter()
            .any(|prefix| canonical.starts_with(prefix))
        {
            return false;
        }

        // Markers: exact equality only, never a prefix match.
        if self.markers.contains(&canonical) {
            return true;
        }

        // Real directories: exact match or separator-bounded descendant.
        self.allowed_roots
            .iter()
            .any(|root| canonical.starts_with(root))
    }

    /// Registered marker paths, for diagnostics.
    #[must_use]
    pub fn markers(&self) -> &HashSet<PathBuf> {
        &self.markers
    }
}

/// Resolve a path to an absolute, normalized form.
///
/// Existing paths resolve through the filesystem so symlinks cannot alias
/// past the checks. Nonexistent paths (markers, not-yet-scanned caches) fall
/// back to syntactic normalization of `.` and `..` components, which is
/// exactly what makes traversal like `allowed/../../etc/passwd` land on the
/// forbidden prefix it was aimed at.
#[must_use]
pub fn canonicalize_lenient(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    if let Ok(resolved) = std::fs::canonicalize(&absolute) {
        return resolved;
    }

    let mut kept: Vec<Component<'_>> = Vec::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(kept.last(), Some(Component::Normal(_))) {
                    kept.pop();
                }
            }
            other => kept.push(other),
        }
    }
    kept.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn apt_validator() -> SafetyValidator {
        SafetyValidator::with_user_cache_root(PackageManager::Apt, Path::new("/home/tester/.cache"))
    }

    #[test]
    fn forbidden_roots_are_rejected() {
        let validator = apt_validator();
        for prefix in FORBIDDEN_PREFIXES {
            assert!(
                !validator.is_safe_to_delete(Path::new(prefix)),
                "{prefix} must be rejected"
            );
        }
    }

    #[test]
    fn forbidden_descendants_are_rejected() {
        let validator = apt_validator();
        for path in [
            "/etc/passwd",
            "/boot/vmlinuz",
            "/usr/bin/apt",
            "/usr/sbin/init",
            "/lib/modules",
            "/dev/sda",
            "/proc/1",
            "/sys/kernel",
        ] {
            assert!(
                !validator.is_safe_to_delete(Path::new(path)),
                "{path} must be rejected"
            );
        }
    }

    #[test]
    fn sibling_names_of_forbidden_roots_are_not_forbidden_matches() {
        // Component-bounded matching: "/binaries" does not match "/bin".
        // It is still rejected, but by default-deny, not the forbidden rule.
        let validator = apt_validator();
        assert!(!validator.is_safe_to_delete(Path::new("/binaries/thing")));
    }

    #[test]
    fn registered_system_roots_are_allowed() {
        let validator = apt_validator();
        assert!(validator.is_safe_to_delete(Path::new("/var/log")));
        assert!(validator.is_safe_to_delete(Path::new("/var/lib/systemd/coredump")));
        assert!(validator.is_safe_to_delete(Path::new("/var/cache/apt/archives")));
    }

    #[test]
    fn descendants_of_allowed_roots_are_allowed() {
        let validator = apt_validator();
        assert!(validator.is_safe_to_delete(Path::new("/var/cache/apt/archives/x.deb")));
        assert!(validator.is_safe_to_delete(Path::new("/var/lib/systemd/coredump/core.1234")));
    }

    #[test]
    fn other_managers_caches_are_not_allowed() {
        let validator = apt_validator();
        assert!(!validator.is_safe_to_delete(Path::new("/var/cache/pacman/pkg")));
        assert!(!validator.is_safe_to_delete(Path::new("/var/cache/dnf")));
        // Not even the parent of our own cache.
        assert!(!validator.is_safe_to_delete(Path::new("/var/cache")));
    }

    #[test]
    fn markers_validate_by_exact_equality() {
        let validator = apt_validator();
        let marker = CleanupTarget::AptAutoremove.path();
        assert!(validator.is_safe_to_delete(&marker));
    }

    #[test]
    fn marker_prefix_sharing_paths_are_rejected() {
        let validator = apt_validator();
        let marker = CleanupTarget::AptAutoremove.path();

        let mut extended = marker.as_os_str().to_os_string();
        extended.push("-extra");
        assert!(!validator.is_safe_to_delete(Path::new(&extended)));

        assert!(!validator.is_safe_to_delete(&marker.join("child")));
        assert!(!validator.is_safe_to_delete(marker.parent().unwrap()));
    }

    #[test]
    fn other_managers_markers_are_rejected() {
        let validator = apt_validator();
        assert!(!validator.is_safe_to_delete(&CleanupTarget::PacmanOrphans.path()));
        assert!(!validator.is_safe_to_delete(&CleanupTarget::DnfAutoremove.path()));
    }

    #[test]
    fn traversal_out_of_an_allowed_root_is_rejected() {
        let validator = apt_validator();
        assert!(!validator.is_safe_to_delete(Path::new("/var/log/../../etc/passwd")));
        assert!(!validator.is_safe_to_delete(Path::new(
            "/var/cache/apt/archives/../../../../etc/passwd"
        )));
    }

    #[test]
    fn traversal_within_an_allowed_root_is_still_allowed() {
        let validator = apt_validator();
        assert!(validator.is_safe_to_delete(Path::new("/var/cache/apt/archives/sub/../x.deb")));
    }

    #[test]
    fn relative_paths_are_resolved_before_comparison() {
        let validator = apt_validator();
        assert!(!validator.is_safe_to_delete(Path::new("etc/passwd")));
        assert!(!validator.is_safe_to_delete(Path::new("../../../etc")));
    }

    #[test]
    fn arbitrary_paths_are_rejected_by_default() {
        let validator = apt_validator();
        assert!(!validator.is_safe_to_delete(Path::new("/home/tester/documents")));
        assert!(!validator.is_safe_to_delete(Path::new("/opt/app")));
        assert!(!validator.is_safe_to_delete(Path::new("/var/spool/mail")));
        assert!(!validator.is_safe_to_delete(Path::new("/")));
    }

    #[test]
    fn user_cache_root_and_descendants_are_allowed() {
        let tmp = TempDir::new().unwrap();
        let cache_root = tmp.path().canonicalize().unwrap();
        fs::create_dir_all(cache_root.join("thumbnails")).unwrap();

        let validator =
            SafetyValidator::with_user_cache_root(PackageManager::Unknown, &cache_root);
        assert!(validator.is_safe_to_delete(&cache_root));
        assert!(validator.is_safe_to_delete(&cache_root.join("thumbnails")));
        assert!(validator.is_safe_to_delete(&cache_root.join("thumbnails/img.png")));
    }

    #[test]
    fn escaping_the_user_cache_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let cache_root = tmp.path().canonicalize().unwrap();
        let validator =
            SafetyValidator::with_user_cache_root(PackageManager::Unknown, &cache_root);

        assert!(!validator.is_safe_to_delete(&cache_root.join("..")));
        assert!(!validator.is_safe_to_delete(&cache_root.join("../sibling")));
        assert!(!validator.is_safe_to_delete(&cache_root.join("a/../../etc/passwd")));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_aliases_resolve_before_the_check() {
        // A symlink inside the allowed root pointing outside it must be
        // judged by its destination, not its location.
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("cache")).unwrap();
        fs::create_dir_all(tmp.path().join("outside")).unwrap();
        let cache = tmp.path().join("cache").canonicalize().unwrap();
        let outside = tmp.path().join("outside").canonicalize().unwrap();
        let link = cache.join("escape");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        let validator = SafetyValidator::with_user_cache_root(PackageManager::Unknown, &cache);
        assert!(!validator.is_safe_to_delete(&link));
    }

    #[test]
    fn canonicalize_lenient_normalizes_nonexistent_paths() {
        let input = Path::new("/no/such/root/foo/../bar");
        assert_eq!(canonicalize_lenient(input), Path::new("/no/such/root/bar"));
    }

    #[test]
    fn canonicalize_lenient_keeps_parent_at_root() {
        assert_eq!(canonicalize_lenient(Path::new("/../etc")), Path::new("/etc"));
    }
}

//! The category catalog: every location the engine will ever offer to clean.
//!
//! Built once at startup from the detected package manager plus a fixed list
//! of universal categories. Entry order is display priority only; nothing
//! downstream depends on it.

pub mod sizing;

use std::path::{Path, PathBuf};

use crate::pkg::manager::PackageManager;
use crate::pkg::targets::CleanupTarget;

/// One cleanable location, immutable after catalog construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Display label.
    pub label: &'static str,
    /// Identity path: a real directory, or a virtual marker path for
    /// package-manager actions. This is what validation and cleaning see.
    pub path: PathBuf,
    /// What the scanner stats for existence and size. Identical to `path`
    /// for directory categories; the manager binary for marker categories.
    pub probe_path: PathBuf,
    /// Whether deletion requires privilege escalation.
    pub is_system: bool,
    /// Display description.
    pub description: &'static str,
}

impl Category {
    fn system(target: CleanupTarget, probe_path: PathBuf) -> Self {
        Self {
            label: target.label(),
            path: target.path(),
            probe_path,
            is_system: true,
            description: target.description(),
        }
    }

    fn user(label: &'static str, path: PathBuf, description: &'static str) -> Self {
        Self {
            label,
            probe_path: path.clone(),
            path,
            is_system: false,
            description,
        }
    }
}

/// Build the catalog for the detected manager, rooting user categories at
/// the real `~/.cache`.
#[must_use]
pub fn build_catalog(manager: PackageManager) -> Vec<Category> {
    let cache_root = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    build_catalog_with(manager, &cache_root)
}

/// Catalog construction with an explicit user-cache root, so tests can point
/// the user categories at a fixture directory.
#[must_use]
pub fn build_catalog_with(manager: PackageManager, user_cache_root: &Path) -> Vec<Category> {
    let mut catalog = Vec::new();

    // Manager-specific entries first: the real cache directory, then the
    // autoremove/orphans marker. A marker without a probe (binary missing)
    // is an action that cannot run, so it is not offered.
    for target in CleanupTarget::for_manager(manager) {
        if let Some(probe) = target.probe_path() {
            catalog.push(Category::system(*target, probe));
        }
    }

    for target in CleanupTarget::GENERIC {
        if let Some(probe) = target.probe_path() {
            catalog.push(Category::system(target, probe));
        }
    }

    catalog.push(Category::user(
        "Thumbnail cache",
        user_cache_root.join("thumbnails"),
        "Image thumbnails generated by file managers",
    ));
    catalog.push(Category::user(
        "Firefox cache",
        user_cache_root.join("mozilla"),
        "Firefox disk cache",
    ));
    catalog.push(Category::user(
        "Chrome cache",
        user_cache_root.join("google-chrome"),
        "Google Chrome disk cache",
    ));

    catalog
}

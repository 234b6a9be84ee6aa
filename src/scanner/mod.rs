//! Catalog scanner: turns categories into sized, selectable candidates.
//!
//! Scanning is a pure read. It never deletes or modifies anything, and it
//! never surfaces errors — an unreadable location measures as zero and is
//! simply not offered as a candidate.

use std::path::PathBuf;

use serde::Serialize;

use crate::catalog::Category;
use crate::catalog::sizing::{compute_size, format_size};

/// One scan candidate. Immutable; superseded by the next scan.
///
/// Invariant: `size_bytes > 0` — empty categories are never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub label: &'static str,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub size_display: String,
    pub is_system: bool,
    pub description: &'static str,
}

/// Scan the catalog: keep every category whose probe path exists and holds
/// a nonzero number of bytes.
#[must_use]
pub fn scan(catalog: &[Category]) -> Vec<ScanResult> {
    let mut results = Vec::new();
    for category in catalog {
        if !category.probe_path.exists() {
            continue;
        }
        let size_bytes = compute_size(&category.probe_path);
        if size_bytes == 0 {
            continue;
        }
        results.push(ScanResult {
            label: category.label,
            path: category.path.clone(),
            size_bytes,
            size_display: format_size(size_bytes),
            is_system: category.is_system,
            description: category.description,
        });
    }
    results
}

//! Best-effort size measurement and human-readable size formatting.
//!
//! Measurement never fails: unreadable entries are omitted from the sum and
//! an unreadable root measures as zero. An unreadable location is not an
//! actionable maintenance candidate, so there is nothing useful to report.

use std::fs;
use std::path::{Path, PathBuf};

/// Recursively sum the sizes of all regular files under `path`.
///
/// Symlinked entries are skipped entirely — never followed, never counted —
/// so a link cannot double-count content or escape the tree being measured.
pub fn compute_size(path: &Path) -> u64 {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return 0;
    };
    if meta.file_type().is_symlink() {
        return 0;
    }
    if meta.is_file() {
        return meta.len();
    }
    if !meta.is_dir() {
        return 0;
    }

    let mut total = 0u64;
    let mut queue: Vec<PathBuf> = vec![path.to_path_buf()];
    while let Some(dir) = queue.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                queue.push(entry.path());
            } else if file_type.is_file()
                && let Ok(meta) = entry.metadata()
            {
                total += meta.len();
            }
        }
    }
    total
}

/// Render a byte count as a two-decimal human-readable string, e.g. `1.50 MB`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_path_measures_zero() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(compute_size(&tmp.path().join("absent")), 0);
    }

    #[test]
    fn empty_directory_measures_zero() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(compute_size(tmp.path()), 0);
    }

    #[test]
    fn single_file_measures_its_length() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("data.bin");
        fs::write(&file, vec![0u8; 4096]).unwrap();
        assert_eq!(compute_size(&file), 4096);
    }

    #[test]
    fn nested_directories_sum_all_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();
        fs::write(tmp.path().join("top.log"), vec![0u8; 100]).unwrap();
        fs::write(tmp.path().join("a/mid.log"), vec![0u8; 200]).unwrap();
        fs::write(tmp.path().join("a/b/c/deep.log"), vec![0u8; 300]).unwrap();
        assert_eq!(compute_size(tmp.path()), 600);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_entries_are_not_counted() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        fs::create_dir_all(&real).unwrap();
        fs::write(real.join("payload.bin"), vec![0u8; 500]).unwrap();

        let measured = tmp.path().join("measured");
        fs::create_dir_all(&measured).unwrap();
        fs::write(measured.join("own.bin"), vec![0u8; 50]).unwrap();
        std::os::unix::fs::symlink(&real, measured.join("link-dir")).unwrap();
        std::os::unix::fs::symlink(real.join("payload.bin"), measured.join("link-file")).unwrap();

        assert_eq!(compute_size(&measured), 50);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_root_measures_zero() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        fs::create_dir_all(&real).unwrap();
        fs::write(real.join("payload.bin"), vec![0u8; 500]).unwrap();
        let link = tmp.path().join("alias");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert_eq!(compute_size(&link), 0);
    }

    #[test]
    fn format_size_steps_through_units() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(500), "500.00 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(2 * 1024_u64.pow(4)), "2.00 TB");
    }

    #[test]
    fn format_size_saturates_at_terabytes() {
        assert_eq!(format_size(2048 * 1024_u64.pow(4)), "2048.00 TB");
    }
}

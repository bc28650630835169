//! Directory size computation
//!
//! Subdirectories are walked from an explicit stack of pending paths, so
//! deep trees do not grow the call stack.

use crate::config::DEFAULT_MAX_PATH_LEN;
use crate::core::SizeReport;
use crate::error::Result;
use crate::fs::{DirReader, EntryKind};
use std::path::{Path, PathBuf};

/// Sums regular file sizes under a directory
#[derive(Debug, Clone)]
pub struct SizeScanner {
    recursive: bool,
    max_path_len: usize,
}

impl Default for SizeScanner {
    fn default() -> Self {
        Self {
            recursive: false,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }
}

impl SizeScanner {
    /// Scanner over direct children only
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Limit the length of joined entry paths
    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }

    /// Measure `root`.
    ///
    /// Failing to open `root` itself is an error. Failures below it are
    /// logged, recorded in the report and skipped.
    pub fn scan(&self, root: &Path) -> Result<SizeReport> {
        let mut report = SizeReport::default();
        let mut pending: Vec<PathBuf> = Vec::new();

        let reader = DirReader::open(root)
            .map_err(|e| {
                tracing::error!("Could not measure '{}': {}", root.display(), e);
                e
            })?
            .with_max_path_len(self.max_path_len);
        self.scan_dir(reader, &mut report, &mut pending);

        while let Some(dir) = pending.pop() {
            match DirReader::open(&dir) {
                Ok(reader) => {
                    self.scan_dir(reader.with_max_path_len(self.max_path_len), &mut report, &mut pending)
                }
                Err(e) => report.add_failure(&dir, e),
            }
        }

        tracing::debug!(
            "Measured {}: {} bytes in {} files",
            root.display(),
            report.total,
            report.files
        );
        Ok(report)
    }

    fn scan_dir(&self, reader: DirReader, report: &mut SizeReport, pending: &mut Vec<PathBuf>) {
        report.dirs += 1;
        let dir = reader.path().to_path_buf();
        let mut subdirs = Vec::new();

        for item in reader {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    report.add_failure(&dir, e);
                    continue;
                }
            };

            match entry.kind {
                EntryKind::File => report.add_file(entry.size),
                EntryKind::Directory if self.recursive => subdirs.push(entry.path),
                _ => {}
            }
        }

        // Reversed so the first subdirectory listed is popped first.
        pending.extend(subdirs.into_iter().rev());
    }
}

/// Total size of the regular files directly inside `path`
pub fn dir_size(path: impl AsRef<Path>) -> Result<SizeReport> {
    SizeScanner::new().scan(path.as_ref())
}

/// Total size of all regular files anywhere below `path`
pub fn dir_size_recursive(path: impl AsRef<Path>) -> Result<SizeReport> {
    SizeScanner::new().recursive(true).scan(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, size: usize) {
        File::create(dir.join(name))
            .unwrap()
            .write_all(&vec![b'x'; size])
            .unwrap();
    }

    fn nested_tree() -> TempDir {
        let root = TempDir::new().unwrap();
        let level1 = root.path().join("a");
        let level2 = level1.join("b");
        std::fs::create_dir_all(&level2).unwrap();

        create_test_file(root.path(), "ten", 10);
        create_test_file(&level1, "twenty", 20);
        create_test_file(&level2, "thirty", 30);
        root
    }

    #[test]
    fn test_recursive_size() {
        let root = nested_tree();
        let report = dir_size_recursive(root.path()).unwrap();

        assert_eq!(report.total, 60);
        assert_eq!(report.files, 3);
        assert_eq!(report.dirs, 3);
        assert!(report.is_complete());
    }

    #[test]
    fn test_shallow_size_ignores_subdirectories() {
        let root = nested_tree();
        let report = dir_size(root.path()).unwrap();

        assert_eq!(report.total, 10);
        assert_eq!(report.files, 1);
        assert_eq!(report.dirs, 1);
    }

    #[test]
    fn test_empty_directory_is_zero() {
        let root = TempDir::new().unwrap();
        let report = dir_size_recursive(root.path()).unwrap();
        assert_eq!(report.total, 0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_missing_root_is_error() {
        let root = TempDir::new().unwrap();
        assert!(dir_size(root.path().join("missing")).is_err());
        assert!(dir_size_recursive(root.path().join("missing")).is_err());
    }

    #[test]
    fn test_path_limit_failure_is_recorded() {
        let root = TempDir::new().unwrap();
        create_test_file(root.path(), "ok", 4);
        create_test_file(root.path(), "this-name-is-far-too-long", 8);

        let limit = root.path().join("ok").as_os_str().len();
        let report = SizeScanner::new()
            .with_max_path_len(limit)
            .scan(root.path())
            .unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.is_complete());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let root = nested_tree();
        let locked = root.path().join("a");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits, so only check when they apply.
        let blocked = std::fs::read_dir(&locked).is_err();
        let report = dir_size_recursive(root.path()).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        if blocked {
            assert_eq!(report.total, 10);
            assert_eq!(report.failures.len(), 1);
            assert_eq!(report.failures[0].path, locked);
        } else {
            assert_eq!(report.total, 60);
        }
    }
}

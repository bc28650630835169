//! Directory tree copy
//!
//! Mirrors a source directory into an existing destination directory,
//! depth first, using a stack of pending (source, destination) pairs.

use crate::config::CopyOptions;
use crate::core::TreeCopyReport;
use crate::error::{FsError, Result};
use crate::fs::path::join_bounded;
use crate::fs::{metadata, DirReader, EntryKind, FileCopier};
use std::path::{Path, PathBuf};

/// Copies whole directory trees
#[derive(Debug, Clone, Default)]
pub struct TreeCopier {
    copier: FileCopier,
}

impl TreeCopier {
    /// Create a tree copier with the given options
    pub fn new(options: CopyOptions) -> Self {
        Self {
            copier: FileCopier::new(options),
        }
    }

    fn max_path_len(&self) -> usize {
        self.copier.options().max_path_len
    }

    /// Copy the contents of `source` into `dest`.
    ///
    /// `dest` must already be a directory; it is never created. Failures on
    /// individual files or subdirectories are logged and recorded in the
    /// report while the walk continues.
    pub fn copy_tree(&self, source: &Path, dest: &Path) -> Result<TreeCopyReport> {
        if !metadata::is_dir(dest) {
            let err = FsError::DestinationNotDirectory(dest.to_path_buf());
            tracing::error!("{}", err);
            return Err(err);
        }

        let reader = DirReader::open(source)
            .map_err(|e| {
                tracing::error!("Could not copy tree '{}': {}", source.display(), e);
                e
            })?
            .with_max_path_len(self.max_path_len());

        if is_overlap(source, dest) {
            let err = FsError::SourceDestinationOverlap {
                source_dir: source.to_path_buf(),
                destination: dest.to_path_buf(),
            };
            tracing::error!("{}", err);
            return Err(err);
        }

        let mut report = TreeCopyReport::default();
        let mut pending: Vec<(PathBuf, PathBuf)> = Vec::new();
        self.copy_dir(reader, dest, &mut report, &mut pending);

        while let Some((src_dir, dst_dir)) = pending.pop() {
            match DirReader::open(&src_dir) {
                Ok(reader) => {
                    let reader = reader.with_max_path_len(self.max_path_len());
                    self.copy_dir(reader, &dst_dir, &mut report, &mut pending);
                }
                Err(e) => report.add_failure(&src_dir, e),
            }
        }

        tracing::debug!(
            "Copied tree {} -> {}: {} files, {} directories, {} failures",
            source.display(),
            dest.display(),
            report.files_copied,
            report.dirs_created,
            report.failures.len()
        );
        Ok(report)
    }

    fn copy_dir(
        &self,
        reader: DirReader,
        dst_dir: &Path,
        report: &mut TreeCopyReport,
        pending: &mut Vec<(PathBuf, PathBuf)>,
    ) {
        let src_dir = reader.path().to_path_buf();
        let mut subdirs = Vec::new();

        for item in reader {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    report.add_failure(&src_dir, e);
                    continue;
                }
            };

            if entry.kind == EntryKind::Unsupported {
                report.skipped += 1;
                continue;
            }

            let target = match join_bounded(dst_dir, entry.file_name(), self.max_path_len()) {
                Ok(target) => target,
                Err(e) => {
                    report.add_failure(&entry.path, e);
                    continue;
                }
            };

            match entry.kind {
                EntryKind::File => match self.copier.copy_inner(&entry.path, &target) {
                    Ok(bytes) => report.add_file(bytes),
                    Err(e) => report.add_failure(&entry.path, e),
                },
                EntryKind::Directory => match std::fs::create_dir(&target) {
                    Ok(()) => {
                        report.dirs_created += 1;
                        subdirs.push((entry.path, target));
                    }
                    Err(e) => report.add_failure(
                        &target,
                        FsError::CreateDir {
                            path: target.clone(),
                            source: e,
                        },
                    ),
                },
                EntryKind::Unsupported => {}
            }
        }

        pending.extend(subdirs.into_iter().rev());
    }
}

/// Copy the contents of `source` into the existing directory `dest`
pub fn copy_tree(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<TreeCopyReport> {
    TreeCopier::default().copy_tree(source.as_ref(), dest.as_ref())
}

fn normalize_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// True if either directory contains the other
fn is_overlap(source: &Path, dest: &Path) -> bool {
    let source = normalize_path(source);
    let dest = normalize_path(dest);
    dest.starts_with(&source) || source.starts_with(&dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::read_file;
    use std::collections::BTreeMap;
    use std::fs::File;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tracing_subscriber::fmt::MakeWriter;
    use walkdir::WalkDir;

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn create_test_file(dir: &Path, name: &str, data: &[u8]) {
        File::create(dir.join(name)).unwrap().write_all(data).unwrap();
    }

    /// Relative path -> file bytes (None for directories)
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
        WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .map(|e| e.unwrap())
            .map(|e| {
                let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
                let data = if e.file_type().is_file() {
                    Some(read_file(e.path()).unwrap().into_bytes())
                } else {
                    None
                };
                (rel, data)
            })
            .collect()
    }

    fn sample_tree() -> TempDir {
        let src = TempDir::new().unwrap();
        let a = src.path().join("a");
        let b = a.join("b");
        std::fs::create_dir_all(&b).unwrap();
        std::fs::create_dir(src.path().join("empty")).unwrap();

        create_test_file(src.path(), "top.txt", b"top");
        create_test_file(&a, "mid.bin", &[0u8, 1, 2, 3]);
        create_test_file(&b, "deep.txt", b"deep contents");
        create_test_file(&b, "zero", b"");
        src
    }

    #[test]
    fn test_copy_tree_reproduces_source() {
        let src = sample_tree();
        let dst = TempDir::new().unwrap();

        let report = copy_tree(src.path(), dst.path()).unwrap();

        assert!(report.is_success());
        assert_eq!(report.files_copied, 4);
        assert_eq!(report.dirs_created, 3);
        assert_eq!(report.bytes_copied, 3 + 4 + 13);
        assert_eq!(snapshot(src.path()), snapshot(dst.path()));
    }

    #[test]
    fn test_missing_destination_fails() {
        let src = sample_tree();
        let parent = TempDir::new().unwrap();
        let dst = parent.path().join("not-created");

        let err = copy_tree(src.path(), &dst).unwrap_err();
        assert!(matches!(err, FsError::DestinationNotDirectory(_)));
        assert!(!dst.exists());
    }

    #[test]
    fn test_destination_is_file_fails() {
        let src = sample_tree();
        let parent = TempDir::new().unwrap();
        create_test_file(parent.path(), "file", b"x");

        let err = copy_tree(src.path(), parent.path().join("file")).unwrap_err();
        assert!(matches!(err, FsError::DestinationNotDirectory(_)));
    }

    #[test]
    fn test_missing_source_fails() {
        let parent = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let err = copy_tree(parent.path().join("missing"), dst.path()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_overlapping_trees_rejected() {
        let src = sample_tree();
        let inside = src.path().join("a");

        let err = copy_tree(src.path(), &inside).unwrap_err();
        assert!(matches!(err, FsError::SourceDestinationOverlap { .. }));

        let err = copy_tree(&inside, src.path()).unwrap_err();
        assert!(matches!(err, FsError::SourceDestinationOverlap { .. }));
    }

    #[test]
    fn test_existing_subdirectory_is_reported() {
        let src = sample_tree();
        let dst = TempDir::new().unwrap();
        std::fs::create_dir(dst.path().join("a")).unwrap();

        let report = copy_tree(src.path(), dst.path()).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, dst.path().join("a"));
        assert!(matches!(report.failures[0].error, FsError::CreateDir { .. }));
        // The rest of the tree is still copied.
        assert!(dst.path().join("top.txt").is_file());
        assert!(dst.path().join("empty").is_dir());
        assert!(!dst.path().join("a/mid.bin").exists());
    }

    #[test]
    fn test_file_failure_does_not_abort_walk() {
        let src = sample_tree();
        let dst = TempDir::new().unwrap();
        // A directory where a file should go makes that one copy fail.
        std::fs::create_dir(dst.path().join("top.txt")).unwrap();

        let report = copy_tree(src.path(), dst.path()).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, FsError::DestinationOpen { .. }));
        assert_eq!(report.failures[0].path, dst.path().join("top.txt"));
        assert_eq!(report.files_copied, 3);
        assert!(dst.path().join("a/b/deep.txt").is_file());
    }

    #[test]
    fn test_each_walk_failure_logged_once_as_warning() {
        let src = sample_tree();
        let dst = TempDir::new().unwrap();
        std::fs::create_dir(dst.path().join("top.txt")).unwrap();
        std::fs::create_dir(dst.path().join("a")).unwrap();

        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let report = tracing::subscriber::with_default(subscriber, || {
            copy_tree(src.path(), dst.path()).unwrap()
        });

        let logs = capture.contents();
        assert_eq!(report.failures.len(), 2);
        assert_eq!(logs.matches("WARN").count(), 2);
        assert_eq!(logs.matches("ERROR").count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let src = sample_tree();
        let dst = TempDir::new().unwrap();
        std::os::unix::fs::symlink(src.path().join("top.txt"), src.path().join("link")).unwrap();

        let report = copy_tree(src.path(), dst.path()).unwrap();

        assert!(report.is_success());
        assert_eq!(report.skipped, 1);
        assert!(std::fs::symlink_metadata(dst.path().join("link")).is_err());
    }

    #[test]
    fn test_custom_chunk_size() {
        let src = sample_tree();
        let dst = TempDir::new().unwrap();

        let copier = TreeCopier::new(CopyOptions {
            chunk_size: 3,
            ..Default::default()
        });
        let report = copier.copy_tree(src.path(), dst.path()).unwrap();

        assert!(report.is_success());
        assert_eq!(snapshot(src.path()), snapshot(dst.path()));
    }
}

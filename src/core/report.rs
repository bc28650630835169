//! Outcome reports for directory walks
//!
//! Walks keep going after a failing entry; each failure is kept here so
//! the caller decides whether a partial result is acceptable.

use crate::error::FsError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A failure tied to one path during a walk
#[derive(Debug)]
pub struct PathFailure {
    /// Path that failed
    pub path: PathBuf,
    /// What went wrong
    pub error: FsError,
}

impl PathFailure {
    /// Build a failure, taking the path from the error when it has one
    pub fn new(fallback: &Path, error: FsError) -> Self {
        let path = error
            .path()
            .cloned()
            .unwrap_or_else(|| fallback.to_path_buf());
        Self { path, error }
    }
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.path.display(), self.error)
    }
}

/// Result of summing file sizes under a directory
#[derive(Debug, Default)]
pub struct SizeReport {
    /// Sum of regular file sizes in bytes
    pub total: u64,
    /// Number of regular files counted
    pub files: u64,
    /// Number of directories read, including the root
    pub dirs: u64,
    /// Entries or subtrees that could not be measured
    pub failures: Vec<PathFailure>,
}

impl SizeReport {
    /// True if every entry was measured
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn add_file(&mut self, size: u64) {
        self.total += size;
        self.files += 1;
    }

    pub(crate) fn add_failure(&mut self, fallback: &Path, error: FsError) {
        tracing::warn!("Skipping {}: {}", fallback.display(), error);
        self.failures.push(PathFailure::new(fallback, error));
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!(
            "{} ({} bytes) in {} files, {} directories",
            humansize::format_size(self.total, humansize::BINARY),
            self.total,
            self.files,
            self.dirs
        );
        print_failures(&self.failures);
    }
}

/// Result of copying a directory tree
#[derive(Debug, Default)]
pub struct TreeCopyReport {
    /// Files copied successfully
    pub files_copied: u64,
    /// Bytes written across all copied files
    pub bytes_copied: u64,
    /// Destination directories created
    pub dirs_created: u64,
    /// Entries that are neither files nor directories
    pub skipped: u64,
    /// Files, directories or subtrees that failed
    pub failures: Vec<PathFailure>,
}

impl TreeCopyReport {
    /// Check if the copy was completely successful
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn add_file(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied += bytes;
    }

    pub(crate) fn add_failure(&mut self, fallback: &Path, error: FsError) {
        tracing::warn!("Skipping {}: {}", fallback.display(), error);
        self.failures.push(PathFailure::new(fallback, error));
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Copy Summary ===");
        println!("Files copied:    {}", self.files_copied);
        println!(
            "Bytes copied:    {}",
            humansize::format_size(self.bytes_copied, humansize::BINARY)
        );
        println!("Directories:     {}", self.dirs_created);
        println!("Skipped:         {}", self.skipped);
        print_failures(&self.failures);
    }
}

fn print_failures(failures: &[PathFailure]) {
    if !failures.is_empty() {
        println!("\nFailures: {}", failures.len());
        for failure in failures {
            println!("  {}", failure);
        }
    }
}

//! Existence, type and size queries
//!
//! Each query issues a single metadata call (following symlinks, like
//! `stat`) and interprets the result.

use crate::error::{IoResultExt, Result};
use crate::fs::EntryKind;
use std::path::Path;

/// True if metadata can be read for `path`
pub fn exists(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path).is_ok()
}

/// True if `path` is a regular file. Metadata failures yield `false`.
pub fn is_file(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}

/// True if `path` is a directory. Metadata failures yield `false`.
pub fn is_dir(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path)
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false)
}

/// Size in bytes reported by metadata.
///
/// Unlike a zero sentinel, a missing or unreadable path is an error, so an
/// empty file and a failed query can be told apart.
pub fn size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).with_path(path)?;
    Ok(metadata.len())
}

/// Classify `path` as file, directory or unsupported
pub fn file_kind(path: impl AsRef<Path>) -> Result<EntryKind> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).with_path(path)?;
    Ok(EntryKind::from(metadata.file_type()))
}

//! # fskit - Thin Filesystem Wrappers
//!
//! Small, synchronous helpers for command-line tools that need basic
//! filesystem access without the OS-call boilerplate.
//!
//! ## Features
//!
//! - **Metadata Queries**: `exists`, `is_file`, `is_dir`, `size`
//! - **Whole-file Reads**: contents and exact byte count in one call
//! - **Chunked File Copy**: short writes and interrupted calls retried
//! - **Directory Enumeration**: name, path, type, size and mtime per entry
//! - **Directory Sizes**: shallow or recursive, with per-path failures
//! - **Tree Copy**: mirror a directory into an existing destination
//!
//! Failures are returned as [`FsError`] and logged through `tracing` at
//! the point of detection. The library never installs a subscriber, so it
//! stays silent unless the application sets one up.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fskit::fs::{copy_file, list_dir, read_file};
//! use fskit::core::dir_size_recursive;
//!
//! let content = read_file("Cargo.toml").unwrap();
//! println!("{} bytes", content.size());
//!
//! copy_file("Cargo.toml", "/tmp/Cargo.toml.bak").unwrap();
//!
//! for entry in list_dir("src").unwrap() {
//!     println!("{}", entry);
//! }
//!
//! let report = dir_size_recursive("src").unwrap();
//! println!("{} bytes in {} files", report.total, report.files);
//! ```
//!
//! ## Tree Copy
//!
//! ```no_run
//! use fskit::config::CopyOptions;
//! use fskit::core::TreeCopier;
//! use std::path::Path;
//!
//! let copier = TreeCopier::new(CopyOptions {
//!     chunk_size: 64 * 1024,
//!     ..Default::default()
//! });
//!
//! let report = copier
//!     .copy_tree(Path::new("/source"), Path::new("/existing/destination"))
//!     .unwrap();
//!
//! if !report.is_success() {
//!     for failure in &report.failures {
//!         eprintln!("{}", failure);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;

// Re-export commonly used types
pub use crate::config::CopyOptions;
pub use crate::core::{copy_tree, dir_size, dir_size_recursive, SizeReport, TreeCopier, TreeCopyReport};
pub use crate::error::{FsError, Result};
pub use crate::fs::{
    copy_file, exists, is_dir, is_file, list_dir, read_file, size, DirReader, Entry, EntryKind,
    FileContent, FileCopier,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

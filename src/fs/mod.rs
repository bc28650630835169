//! File system operations module
//!
//! Thin wrappers over metadata queries, whole-file reads, chunked file
//! copies and directory enumeration.

mod entry;
pub mod metadata;
mod operations;
pub mod path;
mod read;

pub use entry::*;
pub use metadata::{exists, file_kind, is_dir, is_file, size};
pub use operations::*;
pub use path::join_bounded;
pub use read::*;

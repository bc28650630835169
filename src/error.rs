//! Error types for fskit
//!
//! Every wrapper converts the underlying OS failure into one of these
//! variants, carrying the offending path so callers and logs can tell
//! exactly which entry failed.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fskit operations
#[derive(Error, Debug)]
pub enum FsError {
    /// I/O error during a metadata or directory operation
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Copy source could not be opened for reading
    #[error("Could not open source file '{path}': {source}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copy destination could not be opened or created for writing
    #[error("Could not open destination file '{path}': {source}")]
    DestinationOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failure on an open file
    #[error("Could not read file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Write failure on an open file
    #[error("Could not write file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Deferred write failure reported when closing a file
    #[error("Could not close file '{path}': {source}")]
    Close {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory could not be created
    #[error("Could not create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source and destination are the same file
    #[error("Source and destination are the same: {0}")]
    SameSourceAndDestination(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Tree copy destination is missing or not a directory
    #[error("Destination '{0}' does not exist or is not a directory")]
    DestinationNotDirectory(PathBuf),

    /// Source and destination trees contain one another
    #[error("Source and destination directories overlap: '{source_dir}' <-> '{destination}'")]
    SourceDestinationOverlap {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    /// Joined path exceeds the configured limit
    #[error("Path too long ({len} > {limit} bytes): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        limit: usize,
    },

    /// Entry name cannot be joined onto a parent
    #[error("Invalid entry name: {0:?}")]
    InvalidName(String),

    /// File content is not valid text
    #[error("File '{path}' is not valid UTF-8")]
    InvalidData { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FsError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O error, promoting `NotFound` to [`FsError::NotFound`]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.into())
        } else {
            Self::io(path, source)
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The underlying OS error, if this variant wraps one
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            Self::Io { source, .. }
            | Self::SourceOpen { source, .. }
            | Self::DestinationOpen { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Close { source, .. }
            | Self::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Check if this error means the path does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            _ => self
                .io_source()
                .map(|e| e.kind() == std::io::ErrorKind::NotFound)
                .unwrap_or(false),
        }
    }

    /// Check if this error is a permission issue
    pub fn is_permission_error(&self) -> bool {
        self.io_source()
            .map(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
            .unwrap_or(false)
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::NotFound(path)
            | Self::SourceOpen { path, .. }
            | Self::DestinationOpen { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Close { path, .. }
            | Self::CreateDir { path, .. }
            | Self::SameSourceAndDestination(path)
            | Self::NotADirectory(path)
            | Self::DestinationNotDirectory(path)
            | Self::PathTooLong { path, .. }
            | Self::InvalidData { path } => Some(path),
            Self::SourceDestinationOverlap { source_dir, .. } => Some(source_dir),
            Self::InvalidName(_) | Self::Config(_) => None,
        }
    }
}

/// Result type alias for fskit operations
pub type Result<T> = std::result::Result<T, FsError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| FsError::from_io(path, e))
    }
}

//! Directory entry enumeration
//!
//! [`DirReader`] wraps an open directory handle and yields one [`Entry`]
//! per child, with size and modification time filled in for regular files.

use crate::config::DEFAULT_MAX_PATH_LEN;
use crate::error::{FsError, Result};
use crate::fs::metadata;
use crate::fs::path::{is_dot_entry, join_bounded};
use chrono::{DateTime, Local, Utc};
use serde::{Serialize, Serializer};
use std::ffi::OsStr;
use std::fmt;
use std::fs::ReadDir;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Classification of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Anything else (symlink, socket, fifo, device)
    Unsupported,
}

impl EntryKind {
    /// Short uppercase label used when printing entries
    pub fn label(&self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Directory => "DIR",
            Self::Unsupported => "OTHER",
        }
    }
}

impl From<std::fs::FileType> for EntryKind {
    fn from(file_type: std::fs::FileType) -> Self {
        if file_type.is_file() {
            Self::File
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Unsupported
        }
    }
}

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Entry name within its directory
    pub name: String,
    /// Directory path joined with the name
    pub path: PathBuf,
    /// Entry type as reported by the directory listing
    pub kind: EntryKind,
    /// Size in bytes (regular files only, 0 otherwise)
    pub size: u64,
    /// Modification time (regular files only)
    #[serde(serialize_with = "serialize_mtime")]
    pub modified: Option<SystemTime>,
}

impl Entry {
    /// True for regular files
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// True for directories
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Raw entry name, without the lossy UTF-8 conversion of `name`
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }
}

fn serialize_mtime<S: Serializer>(
    modified: &Option<SystemTime>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match modified {
        Some(time) => serializer.serialize_str(&DateTime::<Utc>::from(*time).to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} {}", self.kind.label(), self.path.display())?;
        if self.kind == EntryKind::File {
            write!(
                f,
                "  {}",
                humansize::format_size(self.size, humansize::BINARY)
            )?;
            if let Some(time) = self.modified {
                let local: DateTime<Local> = time.into();
                write!(f, "  {}", local.format("%Y-%m-%d %H:%M:%S"))?;
            }
        }
        Ok(())
    }
}

/// Open directory handle producing [`Entry`] records
#[derive(Debug)]
pub struct DirReader {
    path: PathBuf,
    inner: ReadDir,
    max_path_len: usize,
}

impl DirReader {
    /// Open `path` for enumeration
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = open_dir(path)?;
        tracing::debug!("Opened directory {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        })
    }

    /// Limit the length of joined entry paths
    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }

    /// Directory being read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the next entry, skipping `.` and `..`.
    ///
    /// Returns `Ok(None)` at end of directory. A failure for one entry is
    /// returned as an error, after which the reader can still be advanced.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        loop {
            let raw = match self.inner.next() {
                None => return Ok(None),
                Some(Ok(raw)) => raw,
                Some(Err(e)) => return Err(FsError::io(&self.path, e)),
            };

            let name = raw.file_name();
            if is_dot_entry(&name) {
                continue;
            }

            return self.build_entry(&raw).map(Some);
        }
    }

    fn build_entry(&self, raw: &std::fs::DirEntry) -> Result<Entry> {
        let name = raw.file_name();
        let path = join_bounded(&self.path, &name, self.max_path_len)?;

        let kind = raw
            .file_type()
            .map(EntryKind::from)
            .map_err(|e| FsError::io(&path, e))?;

        let (size, modified) = if kind == EntryKind::File {
            let meta = raw.metadata().map_err(|e| FsError::io(&path, e))?;
            (meta.len(), meta.modified().ok())
        } else {
            (0, None)
        };

        Ok(Entry {
            name: name.to_string_lossy().into_owned(),
            path,
            kind,
            size,
            modified,
        })
    }
}

impl Iterator for DirReader {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

/// Collect every entry of a directory, failing on the first bad entry
pub fn list_dir(path: impl AsRef<Path>) -> Result<Vec<Entry>> {
    let path = path.as_ref();
    let entries = DirReader::open(path).and_then(|reader| reader.collect());
    if let Err(e) = &entries {
        tracing::error!("Could not list '{}': {}", path.display(), e);
    }
    entries
}

/// Open a directory handle, classifying failures
fn open_dir(path: &Path) -> Result<ReadDir> {
    std::fs::read_dir(path).map_err(|e| {
        if metadata::exists(path) && !metadata::is_dir(path) {
            FsError::NotADirectory(path.to_path_buf())
        } else {
            FsError::from_io(path, e)
        }
    })
}

//! Whole-file reads

use crate::error::{FsError, Result};
use crate::fs::metadata;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Contents of a file read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    buffer: Vec<u8>,
    size: u64,
}

impl FileContent {
    /// Number of bytes actually read
    pub fn size(&self) -> u64 {
        self.size
    }

    /// True if the file was empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Raw bytes, binary safe
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// View the content as text
    pub fn as_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.buffer)
    }

    /// Take ownership of the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl AsRef<[u8]> for FileContent {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

/// Read an entire file into memory.
///
/// The buffer is sized from a metadata query up front. An empty file is a
/// successful read of zero bytes.
pub fn read_file(path: impl AsRef<Path>) -> Result<FileContent> {
    let path = path.as_ref();

    let mut file = File::open(path).map_err(|e| {
        tracing::error!("Could not open file '{}': {}", path.display(), e);
        FsError::SourceOpen {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    // The size is only a capacity hint; the file may change between calls.
    let expected = metadata::size(path).unwrap_or(0);
    let mut buffer = Vec::with_capacity(expected as usize);

    file.read_to_end(&mut buffer).map_err(|e| {
        tracing::error!("Could not read file '{}': {}", path.display(), e);
        FsError::Read {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    tracing::debug!("Read {} bytes from {}", buffer.len(), path.display());

    let size = buffer.len() as u64;
    Ok(FileContent { buffer, size })
}

/// Read an entire file as UTF-8 text
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let content = read_file(path)?;
    String::from_utf8(content.into_bytes()).map_err(|_| {
        tracing::error!("File '{}' is not valid UTF-8", path.display());
        FsError::InvalidData {
            path: path.to_path_buf(),
        }
    })
}

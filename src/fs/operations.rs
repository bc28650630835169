//! Chunked file copy
//!
//! Copies go through fixed-size chunks with an explicit write loop, so
//! short writes and interrupted calls are handled rather than hidden
//! behind a buffered writer.

use crate::config::{CopyOptions, MAX_CHUNK_SIZE};
use crate::error::{FsError, Result};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

/// File copier
#[derive(Debug, Clone, Default)]
pub struct FileCopier {
    options: CopyOptions,
}

impl FileCopier {
    /// Create a new file copier with the given options
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }

    /// Create with default options
    pub fn default_copier() -> Self {
        Self::new(CopyOptions::default())
    }

    /// Options in effect
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Copy `source` to `dest`, returning the number of bytes copied.
    ///
    /// The destination is created or truncated. Its parent directory must
    /// already exist.
    pub fn copy(&self, source: &Path, dest: &Path) -> Result<u64> {
        let result = self.copy_inner(source, dest);
        match &result {
            Ok(bytes) => {
                tracing::debug!(
                    "Copied {} -> {} ({} bytes)",
                    source.display(),
                    dest.display(),
                    bytes
                );
            }
            Err(e) => tracing::error!("{}", e),
        }
        result
    }

    /// Copy without logging; walks record failures themselves.
    pub(crate) fn copy_inner(&self, source: &Path, dest: &Path) -> Result<u64> {
        let mut src_file = File::open(source).map_err(|e| FsError::SourceOpen {
            path: source.to_path_buf(),
            source: e,
        })?;

        ensure_distinct(&src_file, source, dest)?;

        let mut dst_file = self.open_destination(dest)?;

        // On error both handles drop here, each closed exactly once.
        let bytes = copy_chunks(
            &mut src_file,
            &mut dst_file,
            self.options.chunk_size,
            source,
            dest,
        )?;

        close_checked(dst_file, dest)?;
        drop(src_file);

        Ok(bytes)
    }

    fn open_destination(&self, dest: &Path) -> Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.options.create_mode);
        }

        options.open(dest).map_err(|e| FsError::DestinationOpen {
            path: dest.to_path_buf(),
            source: e,
        })
    }
}

/// Copy a file with default options
pub fn copy_file(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    FileCopier::default_copier().copy(source.as_ref(), dest.as_ref())
}

/// Refuse to copy a file onto itself, including through a hard link
#[cfg(unix)]
fn ensure_distinct(src_file: &File, source: &Path, dest: &Path) -> Result<()> {
    use std::os::unix::fs::MetadataExt;

    let src_meta = src_file.metadata().map_err(|e| FsError::io(source, e))?;
    if let Ok(dst_meta) = std::fs::metadata(dest) {
        if src_meta.dev() == dst_meta.dev() && src_meta.ino() == dst_meta.ino() {
            return Err(FsError::SameSourceAndDestination(dest.to_path_buf()));
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_distinct(_src_file: &File, source: &Path, dest: &Path) -> Result<()> {
    if let (Ok(src), Ok(dst)) = (std::fs::canonicalize(source), std::fs::canonicalize(dest)) {
        if src == dst {
            return Err(FsError::SameSourceAndDestination(dest.to_path_buf()));
        }
    }
    Ok(())
}

/// Pump `reader` into `writer` one chunk at a time
pub(crate) fn copy_chunks<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
    source: &Path,
    dest: &Path,
) -> Result<u64> {
    let mut buffer = vec![0u8; chunk_size.clamp(1, MAX_CHUNK_SIZE)];
    let mut total = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(FsError::Read {
                    path: source.to_path_buf(),
                    source: e,
                })
            }
        };

        write_chunk(writer, &buffer[..bytes_read], dest)?;
        total += bytes_read as u64;
        tracing::trace!("Wrote chunk of {} bytes to {}", bytes_read, dest.display());
    }

    writer.flush().map_err(|e| FsError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(total)
}

/// Write one chunk, advancing past short writes and retrying interrupts
fn write_chunk<W: Write>(writer: &mut W, chunk: &[u8], dest: &Path) -> Result<()> {
    let mut offset = 0;
    while offset < chunk.len() {
        match writer.write(&chunk[offset..]) {
            Ok(0) => {
                return Err(FsError::Write {
                    path: dest.to_path_buf(),
                    source: std::io::Error::new(ErrorKind::WriteZero, "failed to write chunk"),
                })
            }
            Ok(n) => offset += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(FsError::Write {
                    path: dest.to_path_buf(),
                    source: e,
                })
            }
        }
    }
    Ok(())
}

/// Close a file and surface errors the kernel defers until close
#[cfg(unix)]
fn close_checked(file: File, path: &Path) -> Result<()> {
    use std::os::unix::io::IntoRawFd;

    let fd = file.into_raw_fd();
    // The descriptor is released even when close reports an error.
    if unsafe { libc::close(fd) } == -1 {
        return Err(FsError::Close {
            path: path.to_path_buf(),
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn close_checked(file: File, _path: &Path) -> Result<()> {
    drop(file);
    Ok(())
}

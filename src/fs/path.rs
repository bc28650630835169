//! Bounded path joining
//!
//! Joins a directory path and a single entry name, rejecting results
//! longer than a caller-supplied limit instead of truncating them.

use crate::error::{FsError, Result};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Join `name` onto `parent`, failing if the result exceeds `limit` bytes.
///
/// `name` must be exactly one normal path component: empty names, `.`,
/// `..`, absolute paths and names containing a separator are rejected
/// with [`FsError::InvalidName`].
pub fn join_bounded(parent: &Path, name: impl AsRef<OsStr>, limit: usize) -> Result<PathBuf> {
    let name = name.as_ref();
    validate_name(name)?;

    let joined = parent.join(name);
    let len = joined.as_os_str().len();
    if len > limit {
        return Err(FsError::PathTooLong {
            path: joined,
            len,
            limit,
        });
    }
    Ok(joined)
}

fn validate_name(name: &OsStr) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(FsError::InvalidName(name.to_string_lossy().into_owned())),
    }
}

/// True for the `.` and `..` pseudo-entries some platforms report
pub(crate) fn is_dot_entry(name: &OsStr) -> bool {
    name == "." || name == ".."
}

//! Capability-based filesystem helpers built on `cap-std` and `camino`.
#![forbid(unsafe_code)]

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Resolve the ambient base directory and relative suffix for a parent path.
fn base_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, &Utf8Path)> {
    let (base, relative) = if parent.is_absolute() {
        let relative = parent
            .strip_prefix("/")
            .map_err(|_| io::Error::other("failed to strip root from absolute path"))?;
        (Utf8Path::new("/"), relative)
    } else {
        (Utf8Path::new("."), parent)
    };
    let dir = fs_utf8::Dir::open_ambient_dir(base, ambient_authority())?;
    Ok((dir, relative))
}

/// Ensure the parent directory for `path` exists.
///
/// # Errors
/// Propagates I/O errors from opening the base directory or creating the
/// missing components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (dir, relative) = base_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    dir.create_dir_all(relative)?;
    Ok(())
}

/// Report whether `path` names an existing regular file.
///
/// Any failure to open the containing directory or read metadata is treated
/// as "not a file".
#[must_use]
pub fn file_is_file(path: &Utf8Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let parent = path
        .parent()
        .filter(|candidate| !candidate.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.metadata(name))
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

//! Filesystem utility functions
//!
//! The mover treats key files as opaque blobs: no parsing, no validation.
//! All operations are deliberately non-recursive - accounts are flat
//! directories of key files, and anything nested inside `~/.ssh`
//! (e.g. a `controlmasters/` socket dir) is none of our business.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Copy every regular file directly inside `src` into `dst`.
///
/// Files already present in `dst` under the same name are overwritten.
/// Subdirectories are ignored, not recursed into. `dst` is created if absent.
/// Permission bits travel with each file (`fs::copy`), which matters for
/// private keys that sshd insists are 0600.
///
/// # Errors
/// Returns `Error::Io` if `src` does not exist or is not a directory, if
/// `dst` cannot be created, or if any individual copy fails. An empty `src`
/// is a valid no-op.
pub fn copy_files(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(Error::Io {
            path: src.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "source directory does not exist",
            ),
        });
    }

    fs::create_dir_all(dst).map_err(Error::io(dst))?;

    for entry in fs::read_dir(src).map_err(Error::io(src))? {
        let entry = entry.map_err(Error::io(src))?;
        let src_path = entry.path();

        let file_type = entry.file_type().map_err(Error::io(&src_path))?;
        if !file_type.is_file() {
            continue;
        }

        let dst_path = dst.join(entry.file_name());
        fs::copy(&src_path, &dst_path).map_err(Error::io(&src_path))?;
    }

    Ok(())
}

/// Delete every regular file directly inside `dir`.
///
/// Subdirectories are left untouched. A directory with no files, or a
/// missing directory, is a no-op.
pub fn clear_files(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).map_err(Error::io(dir))? {
        let entry = entry.map_err(Error::io(dir))?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(Error::io(&path))?;
        if file_type.is_file() {
            fs::remove_file(&path).map_err(Error::io(&path))?;
        }
    }

    Ok(())
}

/// Total size in bytes of the regular files directly inside `dir`.
///
/// Display helper for `list`; accounts are flat, so no recursion.
pub fn dir_size(dir: &Path) -> std::io::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            total += metadata.len();
        }
    }
    Ok(total)
}

/// Number of regular files directly inside `dir`.
pub fn file_count(dir: &Path) -> std::io::Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        if entry?.file_type()?.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

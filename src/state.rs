//! Persisted switcher state: the current-account marker and the switch lock.
//!
//! The marker file (`.current`) contains the bare account name and nothing
//! else, byte-compatible with earlier versions of this tool, so existing
//! `~/.ssh-key-switcher` trees keep working. A missing, empty, or unreadable
//! marker is the explicit "unset" state - never an error. Whether the name
//! points at a real account is the switch controller's problem; this module
//! is a plain key/value store.

use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths::Paths;

/// Read the current-account marker.
///
/// Returns `None` on a missing or unreadable marker file, and on content
/// that trims down to nothing. Trailing whitespace (a stray newline from a
/// hand edit, say) is stripped.
pub fn read_current(paths: &Paths) -> Option<String> {
    let content = fs::read_to_string(&paths.current_file).ok()?;
    let name = content.trim_end();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Overwrite the current-account marker with `name`.
///
/// Atomic write pattern: write to a temp file in the same directory, then
/// rename over the marker. A crash mid-write never leaves a torn marker.
pub fn write_current(paths: &Paths, name: &str) -> Result<()> {
    if let Some(parent) = paths.current_file.parent() {
        fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }

    let temp_path = paths.current_file.with_extension("tmp");
    fs::write(&temp_path, name).map_err(Error::io(&temp_path))?;
    fs::rename(&temp_path, &paths.current_file).map_err(Error::io(&paths.current_file))?;

    Ok(())
}

/// Advisory lock held for the duration of a switch operation.
///
/// Two racing invocations interleaving copy/delete/write steps would corrupt
/// the marker invariant or lose key files outright; an exclusive flock on a
/// file in the storage root closes that race. Released on drop, so every
/// exit path - including error propagation - unlocks.
pub struct SwitchLock {
    file: fs::File,
}

impl SwitchLock {
    /// Acquire the lock, blocking until it is available.
    pub fn acquire(paths: &Paths) -> Result<Self> {
        Self::acquire_path(&paths.lock_file)
    }

    fn acquire_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::io(parent))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(Error::io(path))?;

        file.lock_exclusive().map_err(Error::io(path))?;

        Ok(Self { file })
    }
}

impl Drop for SwitchLock {
    fn drop(&mut self) {
        // Release the lock (ignore errors during drop)
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

//! Test utilities shared across test modules
//!
//! Common helpers for testing, avoiding duplication across test suites.

use crate::paths::Paths;
use tempfile::TempDir;

/// Create a Paths struct for testing using a temporary directory
///
/// Mimics the real `~/.ssh` / `~/.ssh-key-switcher` layout inside the temp
/// directory so tests never touch the real home.
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    Paths {
        ssh_dir: temp_dir.path().join(".ssh"),
        storage_dir: temp_dir.path().join(".ssh-key-switcher"),
        current_file: temp_dir.path().join(".ssh-key-switcher/.current"),
        lock_file: temp_dir.path().join(".ssh-key-switcher/.lock"),
    }
}

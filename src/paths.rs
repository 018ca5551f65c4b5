use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::PathBuf;

/// All computed paths used by ssh-key-switcher.
///
/// Both roots are plain struct fields rather than global constants so that
/// tests can point an instance at temporary directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~/.ssh - the directory the SSH client actually reads keys from
    pub ssh_dir: PathBuf,
    /// ~/.ssh-key-switcher - one subdirectory per stored account
    pub storage_dir: PathBuf,
    /// ~/.ssh-key-switcher/.current - name of the account loaded into ~/.ssh
    pub current_file: PathBuf,
    /// ~/.ssh-key-switcher/.lock - advisory lock held across switch operations
    pub lock_file: PathBuf,
}

impl Paths {
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
        let home = base_dirs.home_dir();

        let ssh_dir = home.join(".ssh");
        let storage_dir = home.join(".ssh-key-switcher");
        let current_file = storage_dir.join(".current");
        let lock_file = storage_dir.join(".lock");

        Ok(Self {
            ssh_dir,
            storage_dir,
            current_file,
            lock_file,
        })
    }

    /// Get the storage path for a named account; does not touch disk.
    pub fn account_dir(&self, name: &str) -> PathBuf {
        self.storage_dir.join(name)
    }

    /// Ensure the storage root exists, creating missing parents.
    ///
    /// Idempotent; fails if the path exists but is not a directory.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir).with_context(|| {
            format!(
                "Failed to create storage directory: {:?}",
                self.storage_dir
            )
        })?;
        Ok(())
    }
}

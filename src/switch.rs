//! Account switching logic.
//!
//! This module implements the core mechanism of ssh-key-switcher: moving key
//! files between the active `~/.ssh` directory and per-account storage, while
//! keeping the current-account marker in step with what is actually loaded.
//!
//! The switch protocol is best-effort sequential, not transactional. There is
//! no rollback; what makes it safe is ordering. The outgoing account's files
//! are copied into storage before anything gets deleted, so the only loss
//! window is between clearing the active directory and loading the target -
//! and even then the pre-switch snapshot survives in storage.

use crate::accounts::{account_exists, validate_account_name};
use crate::error::{Error, Result};
use crate::fs_utils::{clear_files, copy_files, file_count};
use crate::paths::Paths;
use crate::state::{SwitchLock, read_current, write_current};

/// Declare an existing account as the one currently loaded.
///
/// Records `name` in the marker, then snapshots the active directory's files
/// into the account's storage, overwriting whatever was stored there before.
/// This is the designated way to adopt the present `~/.ssh` contents as a
/// named account - including the first-run case where no marker exists yet.
pub fn set_current(paths: &Paths, name: &str) -> Result<()> {
    validate_account_name(name)?;
    let _lock = SwitchLock::acquire(paths)?;

    if !account_exists(paths, name) {
        return Err(Error::AccountNotFound(name.to_string()));
    }

    write_current(paths, name)?;
    copy_files(&paths.ssh_dir, &paths.account_dir(name))?;

    Ok(())
}

/// Switch the active directory over to `name`.
///
/// Protocol, in order:
/// 1. save the outgoing account's files into its storage slot
/// 2. clear the active directory
/// 3. load the target account's files into the active directory
/// 4. record `name` in the marker
///
/// With no marker set there is no outgoing account to save: an empty (or
/// missing) active directory is fine and the save step is skipped, but a
/// non-empty one fails with [`Error::NoCurrentAccount`] before anything is
/// touched - clearing keys that were never snapshotted would lose them.
///
/// If `name` turns out not to exist, the active directory has already been
/// cleared by then and stays empty; [`Error::LoadFailed`] names the intact
/// snapshot to recover from.
pub fn switch_to(paths: &Paths, name: &str) -> Result<()> {
    validate_account_name(name)?;
    let _lock = SwitchLock::acquire(paths)?;

    let from = read_current(paths);

    match &from {
        Some(from) => {
            // Must complete before any deletion; on failure the active
            // directory has not been mutated at all.
            if paths.ssh_dir.is_dir() {
                copy_files(&paths.ssh_dir, &paths.account_dir(from))?;
            }
        }
        None => {
            let active_files = match file_count(&paths.ssh_dir) {
                Ok(n) => n,
                Err(_) => 0, // missing active dir: nothing to save
            };
            if active_files > 0 {
                return Err(Error::NoCurrentAccount);
            }
        }
    }

    clear_files(&paths.ssh_dir)?;

    if !account_exists(paths, name) {
        let snapshot = match &from {
            Some(from) => paths.account_dir(from),
            None => paths.storage_dir.clone(),
        };
        return Err(Error::LoadFailed {
            name: name.to_string(),
            snapshot,
        });
    }

    copy_files(&paths.account_dir(name), &paths.ssh_dir)?;
    write_current(paths, name)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::create_account;
    use crate::test_utils::setup_test_paths;
    use std::fs;
    use tempfile::TempDir;

    fn write_keys(dir: &std::path::Path, files: &[(&str, &str)]) {
        fs::create_dir_all(dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    fn read_key(dir: &std::path::Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap()
    }

    #[test]
    fn test_set_current_requires_existing_account() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        write_keys(&paths.ssh_dir, &[("id_rsa", "key")]);

        let err = set_current(&paths, "missing").unwrap_err();
        assert!(matches!(err, Error::AccountNotFound(_)));
        assert_eq!(read_current(&paths), None);
    }

    #[test]
    fn test_set_current_snapshots_and_records() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        write_keys(&paths.ssh_dir, &[("id_rsa", "secret"), ("id_rsa.pub", "pub")]);
        create_account(&paths, "work").unwrap();

        set_current(&paths, "work").unwrap();

        assert_eq!(read_current(&paths), Some("work".to_string()));
        assert_eq!(read_key(&paths.account_dir("work"), "id_rsa"), "secret");
        assert_eq!(read_key(&paths.account_dir("work"), "id_rsa.pub"), "pub");
        // Active directory untouched
        assert_eq!(read_key(&paths.ssh_dir, "id_rsa"), "secret");
    }

    #[test]
    fn test_set_current_overwrites_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        create_account(&paths, "work").unwrap();
        write_keys(&paths.account_dir("work"), &[("id_rsa", "stale")]);
        write_keys(&paths.ssh_dir, &[("id_rsa", "fresh")]);

        set_current(&paths, "work").unwrap();

        assert_eq!(read_key(&paths.account_dir("work"), "id_rsa"), "fresh");
    }

    #[test]
    fn test_switch_saves_outgoing_and_loads_target() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        write_keys(&paths.ssh_dir, &[("id_rsa", "work-key")]);
        create_account(&paths, "work").unwrap();
        set_current(&paths, "work").unwrap();

        create_account(&paths, "personal").unwrap();
        write_keys(&paths.account_dir("personal"), &[("id_ed25519", "home-key")]);

        switch_to(&paths, "personal").unwrap();

        assert_eq!(read_current(&paths), Some("personal".to_string()));
        assert_eq!(read_key(&paths.ssh_dir, "id_ed25519"), "home-key");
        assert!(!paths.ssh_dir.join("id_rsa").exists());
        // Outgoing account's snapshot still intact in storage
        assert_eq!(read_key(&paths.account_dir("work"), "id_rsa"), "work-key");
    }

    #[test]
    fn test_switch_round_trip_restores_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        write_keys(&paths.ssh_dir, &[("id_rsa", "x"), ("id_rsa.pub", "y")]);
        create_account(&paths, "a").unwrap();
        set_current(&paths, "a").unwrap();
        create_account(&paths, "b").unwrap();

        switch_to(&paths, "b").unwrap();
        switch_to(&paths, "a").unwrap();

        assert_eq!(read_key(&paths.ssh_dir, "id_rsa"), "x");
        assert_eq!(read_key(&paths.ssh_dir, "id_rsa.pub"), "y");
        assert_eq!(read_current(&paths), Some("a".to_string()));
    }

    #[test]
    fn test_switch_unset_marker_empty_active_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        fs::create_dir_all(&paths.ssh_dir).unwrap();
        create_account(&paths, "work").unwrap();
        write_keys(&paths.account_dir("work"), &[("id_rsa", "key")]);

        // Nothing to save must not be an error
        switch_to(&paths, "work").unwrap();

        assert_eq!(read_key(&paths.ssh_dir, "id_rsa"), "key");
        assert_eq!(read_current(&paths), Some("work".to_string()));
    }

    #[test]
    fn test_switch_unset_marker_missing_active_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        create_account(&paths, "work").unwrap();
        write_keys(&paths.account_dir("work"), &[("id_rsa", "key")]);

        switch_to(&paths, "work").unwrap();

        assert_eq!(read_key(&paths.ssh_dir, "id_rsa"), "key");
    }

    #[test]
    fn test_switch_unset_marker_nonempty_active_dir_refuses() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        write_keys(&paths.ssh_dir, &[("id_rsa", "unsaved")]);
        create_account(&paths, "work").unwrap();

        let err = switch_to(&paths, "work").unwrap_err();
        assert!(matches!(err, Error::NoCurrentAccount));
        // Nothing was touched
        assert_eq!(read_key(&paths.ssh_dir, "id_rsa"), "unsaved");
    }

    #[test]
    fn test_switch_to_nonexistent_leaves_active_dir_empty() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        write_keys(&paths.ssh_dir, &[("id_rsa", "key")]);
        create_account(&paths, "work").unwrap();
        set_current(&paths, "work").unwrap();

        let err = switch_to(&paths, "missing").unwrap_err();
        match err {
            Error::LoadFailed { name, snapshot } => {
                assert_eq!(name, "missing");
                assert_eq!(snapshot, paths.account_dir("work"));
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }

        // Documented behavior: the active directory is left empty...
        assert_eq!(fs::read_dir(&paths.ssh_dir).unwrap().count(), 0);
        // ...but the pre-switch snapshot is intact and recoverable
        assert_eq!(read_key(&paths.account_dir("work"), "id_rsa"), "key");
        switch_to(&paths, "work").unwrap();
        assert_eq!(read_key(&paths.ssh_dir, "id_rsa"), "key");
    }

    #[test]
    fn test_switch_rejects_invalid_name() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        write_keys(&paths.ssh_dir, &[("id_rsa", "key")]);

        let err = switch_to(&paths, "../../etc").unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert_eq!(read_key(&paths.ssh_dir, "id_rsa"), "key");
    }

    /// The full worked example: adopt the starting keys as `work`, switch to
    /// `personal`, and switch back.
    #[test]
    fn test_full_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        paths.ensure_dirs().unwrap();
        write_keys(&paths.ssh_dir, &[("id_rsa", "orig-priv"), ("id_rsa.pub", "orig-pub")]);

        create_account(&paths, "work").unwrap();
        set_current(&paths, "work").unwrap();
        assert_eq!(read_key(&paths.account_dir("work"), "id_rsa"), "orig-priv");
        assert_eq!(read_current(&paths), Some("work".to_string()));

        create_account(&paths, "personal").unwrap();
        // Keys dropped into storage by hand
        write_keys(
            &paths.account_dir("personal"),
            &[("id_ed25519", "p-priv"), ("id_ed25519.pub", "p-pub")],
        );

        switch_to(&paths, "personal").unwrap();
        assert_eq!(read_key(&paths.ssh_dir, "id_ed25519"), "p-priv");
        assert!(!paths.ssh_dir.join("id_rsa").exists());
        assert_eq!(read_key(&paths.account_dir("work"), "id_rsa"), "orig-priv");
        assert_eq!(read_current(&paths), Some("personal".to_string()));

        switch_to(&paths, "work").unwrap();
        assert_eq!(read_key(&paths.ssh_dir, "id_rsa"), "orig-priv");
        assert_eq!(read_key(&paths.ssh_dir, "id_rsa.pub"), "orig-pub");
        assert!(!paths.ssh_dir.join("id_ed25519").exists());
        assert_eq!(read_current(&paths), Some("work".to_string()));
    }
}

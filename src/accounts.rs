//! Account storage management.
//!
//! An account is nothing more than a named subdirectory of the storage root
//! holding a flat snapshot of key files. This module owns the on-disk
//! collection: listing, creation, existence checks, and the naming rules
//! that keep account names safe to use as path components.

use std::fs;

use crate::error::{Error, Result};
use crate::paths::Paths;

/// List stored account names, sorted.
///
/// Only direct subdirectories count; the `.current` marker and `.lock` file
/// living in the storage root are regular files and never show up here.
pub fn list_accounts(paths: &Paths) -> Result<Vec<String>> {
    let mut accounts = Vec::new();

    if paths.storage_dir.is_dir() {
        for entry in fs::read_dir(&paths.storage_dir).map_err(Error::io(&paths.storage_dir))? {
            let entry = entry.map_err(Error::io(&paths.storage_dir))?;
            let path = entry.path();
            #[allow(clippy::collapsible_if)]
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    accounts.push(name.to_string());
                }
            }
        }
    }

    accounts.sort();
    Ok(accounts)
}

/// Check if an account's storage directory exists.
pub fn account_exists(paths: &Paths, name: &str) -> bool {
    paths.account_dir(name).is_dir()
}

/// Validate an account name.
///
/// Only alphanumeric characters, underscores, and hyphens. This rules out
/// path separators and `..`, so a name can never escape the storage root.
pub fn validate_account_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty",
        });
    }

    if name.chars().count() > 64 {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "name cannot be longer than 64 characters",
        });
    }

    // Allow a-z, A-Z, 0-9, -, _
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "only alphanumeric characters, hyphens (-), and underscores (_) are allowed",
        });
    }

    Ok(())
}

/// Create an account's storage directory.
///
/// Idempotent: an account that already exists is left exactly as it is,
/// stored key files included.
pub fn create_account(paths: &Paths, name: &str) -> Result<()> {
    validate_account_name(name)?;

    let account_dir = paths.account_dir(name);
    fs::create_dir_all(&account_dir).map_err(Error::io(&account_dir))?;

    Ok(())
}

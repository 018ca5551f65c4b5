//! Diagnostic tool for ssh-key-switcher.
//!
//! Implements the `doctor` subcommand, which checks the setup for common
//! issues:
//! - Existence of the storage root and active ssh directory.
//! - Marker validity (does it name an account that actually exists?).
//! - Per-account inventory (empty snapshots are worth a warning).
//! - Stale lock files.
//!
//! It reports issues to the user with a pass/fail/warn status.

use anstyle::AnsiColor;

use crate::accounts::list_accounts;
use crate::fs_utils::file_count;
use crate::paths::Paths;
use crate::state::read_current;
use crate::ui::Ui;

/// Run the doctor diagnostics
pub fn run_doctor(paths: &Paths, ui: &Ui) {
    ui.section("ssh-key-switcher Doctor");
    ui.newline();

    // 1. Directories
    check_step(ui, "Directories", || {
        let mut ok = true;

        if paths.storage_dir.is_dir() {
            ui.println(format!(
                "  {} Storage root exists: {}",
                ui.icon_ok(),
                paths.storage_dir.display()
            ));
        } else if paths.storage_dir.exists() {
            ui.println(format!(
                "  {} Storage root path exists but is not a directory: {}",
                ui.icon_err(),
                paths.storage_dir.display()
            ));
            ok = false;
        } else {
            ui.println(format!(
                "  {} Storage root missing (created on first use): {}",
                ui.icon_warn(),
                paths.storage_dir.display()
            ));
        }

        if paths.ssh_dir.is_dir() {
            ui.println(format!(
                "  {} Active ssh directory exists: {}",
                ui.icon_ok(),
                paths.ssh_dir.display()
            ));
        } else {
            // Not necessarily an error: a fresh machine may have no ~/.ssh yet
            ui.println(format!(
                "  {} Active ssh directory missing: {}",
                ui.icon_warn(),
                paths.ssh_dir.display()
            ));
        }

        ok
    });

    // 2. Current-account marker
    check_step(ui, "Current-Account Marker", || {
        match read_current(paths) {
            Some(name) => {
                ui.println(format!("  {} Marker names account: {}", ui.icon_info(), name));
                if paths.account_dir(&name).is_dir() {
                    ui.println(format!(
                        "  {} Account storage directory exists",
                        ui.icon_ok()
                    ));
                    true
                } else {
                    ui.println(format!(
                        "  {} Account storage directory MISSING - switching will fail until it is recreated",
                        ui.icon_err()
                    ));
                    false
                }
            }
            None => {
                ui.println(format!(
                    "  {} No current account recorded (fresh setup, or marker unreadable)",
                    ui.icon_info()
                ));
                let active_files = file_count(&paths.ssh_dir).unwrap_or(0);
                if active_files > 0 {
                    ui.println(format!(
                        "  {} {} unsaved file(s) in the active ssh directory; run 'current <name>' to adopt them",
                        ui.icon_warn(),
                        active_files
                    ));
                }
                true
            }
        }
    });

    // 3. Accounts
    check_step(ui, "Accounts", || {
        let accounts = match list_accounts(paths) {
            Ok(a) => a,
            Err(e) => {
                ui.println(format!("  {} Failed to list accounts: {}", ui.icon_err(), e));
                return false;
            }
        };

        if accounts.is_empty() {
            ui.println(format!("  {} No accounts found", ui.icon_warn()));
            return true;
        }

        ui.println(format!("  Found {} account(s):", accounts.len()));
        for name in accounts {
            match file_count(&paths.account_dir(&name)) {
                Ok(0) => ui.println(format!(
                    "    {} {} (empty - no keys saved yet)",
                    ui.icon_warn(),
                    name
                )),
                Ok(n) => ui.println(format!("    {} {} ({} file(s))", ui.icon_ok(), name, n)),
                Err(e) => ui.println(format!("    {} {} (unreadable: {})", ui.icon_err(), name, e)),
            }
        }
        true
    });

    // 4. Lock file
    check_step(ui, "Lock File", || {
        if paths.lock_file.exists() {
            // Presence alone is normal; the lock is advisory and the file stays behind
            ui.println(format!(
                "  {} Lock file present: {}",
                ui.icon_info(),
                paths.lock_file.display()
            ));
        } else {
            ui.println(format!("  {} No lock file (never switched yet)", ui.icon_info()));
        }
        true
    });
}

fn check_step<F>(ui: &Ui, name: &str, check_fn: F)
where
    F: FnOnce() -> bool,
{
    ui.println(ui.bold(format!("Checking {}...", name)));
    let success = check_fn();
    if !success {
        ui.println(ui.colored("  Issues detected!", AnsiColor::Red));
    }
    ui.newline();
}

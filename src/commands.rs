//! High-level command orchestration for the CLI.
//!
//! This module contains the handler functions for each CLI subcommand
//! (`list`, `create`, `current`, `switch`, ...). It coordinates:
//! - `crate::ui` for output styling.
//! - `crate::paths` for filesystem locations.
//! - `crate::accounts` for the account store.
//! - `crate::switch` for the switch protocol.
//! - `crate::state` for the current-account marker.

use anstyle::AnsiColor;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::accounts::{create_account, list_accounts};
use crate::doctor::run_doctor;
use crate::fs_utils::{dir_size, file_count};
use crate::paths::Paths;
use crate::state::read_current;
use crate::switch;
use crate::ui::Ui;

/// List all stored accounts, marking the current one
pub fn list(paths: &Paths, ui: &Ui) -> Result<()> {
    paths.ensure_dirs()?;
    let accounts = list_accounts(paths)?;

    if accounts.is_empty() {
        ui.warn("No accounts found.");
        ui.newline();
        ui.println("Create one with:");
        ui.println(format!("  {} create <name>", ui.bold("ssh-key-switcher")));
        return Ok(());
    }

    let current = read_current(paths);

    let mut table = ui.simple_table();
    table.set_header(vec![
        ui.header_cell(""),
        ui.header_cell("Account"),
        ui.header_cell("Keys"),
        ui.header_cell("Size"),
        ui.header_cell("Last saved"),
        ui.header_cell("Status"),
    ]);

    for name in &accounts {
        let is_current = Some(name.as_str()) == current.as_deref();
        let icon = if is_current { ui.icon_ok() } else { " " };
        let status_cell = if is_current {
            ui.colored_cell("current", AnsiColor::Green)
        } else {
            ui.cell("-")
        };

        let account_dir = paths.account_dir(name);
        let keys = file_count(&account_dir)
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "?".to_string());
        let size = dir_size(&account_dir)
            .map(format_bytes)
            .unwrap_or_else(|_| "?".to_string());

        table.add_row(vec![
            ui.cell(icon),
            ui.cell(name),
            ui.cell(keys),
            ui.cell(size),
            ui.cell(last_saved(&account_dir)),
            status_cell,
        ]);
    }

    ui.section("Accounts");
    ui.println(table.to_string());
    ui.println(ui.dim(format!("Storage root: {}", paths.storage_dir.display())));

    // The marker can outlive its account if someone deletes the directory
    if let Some(ref name) = current {
        if !accounts.contains(name) {
            ui.newline();
            ui.warn(format!(
                "Marker names account '{}', which has no storage directory.",
                name
            ));
        }
    }

    Ok(())
}

/// Create a new (empty) account
pub fn create(paths: &Paths, name: &str, ui: &Ui) -> Result<()> {
    paths.ensure_dirs()?;
    create_account(paths, name)?;

    ui.ok(format!("Created account '{}'", name));
    ui.newline();
    ui.println("To save your current keys under it:");
    ui.println(format!("  ssh-key-switcher current {}", name));

    Ok(())
}

/// Set an existing account as current, snapshotting the active keys into it
pub fn current(paths: &Paths, name: &str, ui: &Ui) -> Result<()> {
    paths.ensure_dirs()?;
    switch::set_current(paths, name)?;

    ui.ok(format!(
        "Current account is now '{}'; keys from {} saved to {}",
        name,
        paths.ssh_dir.display(),
        paths.account_dir(name).display()
    ));

    Ok(())
}

/// Switch the active keys over to another account
pub fn switch_account(paths: &Paths, name: &str, ui: &Ui) -> Result<()> {
    paths.ensure_dirs()?;

    let spinner = ui.spinner(format!("Switching to account '{}'...", name));

    match switch::switch_to(paths, name) {
        Ok(()) => {
            ui.spinner_finish_ok(&spinner, format!("Active account: {}", name));
            Ok(())
        }
        Err(e) => {
            ui.spinner_finish_err(&spinner, format!("Failed to switch: {}", e));
            Err(e.into())
        }
    }
}

/// Run diagnostics on the switcher setup
pub fn doctor(paths: &Paths, ui: &Ui) -> Result<()> {
    run_doctor(paths, ui);
    Ok(())
}

/// Most recent modification time among an account's files, for display
fn last_saved(dir: &Path) -> String {
    let newest = std::fs::read_dir(dir)
        .ok()
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .filter_map(|m| m.modified().ok())
        .max();

    match newest {
        Some(time) => {
            let dt: DateTime<Utc> = time.into();
            dt.format("%Y-%m-%d %H:%M").to_string()
        }
        None => "-".to_string(),
    }
}

/// Format bytes as human-readable string
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

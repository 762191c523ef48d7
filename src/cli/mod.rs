//! Command-line interface definitions for the `backupstore` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `backupstore` binary.
#[derive(Debug, Parser)]
#[command(
    name = "backupstore",
    about = "List and inspect volumes and backups held in a backup store",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// List volumes and their backups.
    #[command(name = "list", about = "List volumes and their backups as JSON")]
    List(ListCommand),
    /// Describe a single backup.
    #[command(name = "inspect", about = "Describe one backup, identified by its URL, as JSON")]
    Inspect(InspectCommand),
}

/// Arguments for the `backupstore list` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ListCommand {
    /// Volume to list. Lists every volume when omitted.
    #[arg(value_name = "VOLUME")]
    pub(crate) volume: Option<String>,
    /// Destination locator, for example `vfs:///srv/backups`.
    ///
    /// Falls back to `BACKUPSTORE_DESTINATION` or `destination` in
    /// `backupstore.toml`.
    #[arg(long, value_name = "LOCATOR")]
    pub(crate) dest: Option<String>,
    /// Storage driver the listed volumes must belong to.
    ///
    /// Falls back to `BACKUPSTORE_STORAGE_DRIVER` or `storage_driver` in
    /// `backupstore.toml`.
    #[arg(long = "driver", value_name = "ID")]
    pub(crate) storage_driver: Option<String>,
}

/// Arguments for the `backupstore inspect` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct InspectCommand {
    /// Backup URL as printed by `backupstore list`.
    #[arg(value_name = "URL")]
    pub(crate) url: String,
    /// Require the backup URL to belong to this destination.
    #[arg(long, value_name = "LOCATOR")]
    pub(crate) dest: Option<String>,
}

//! Binary entry point for the `backupstore` CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use backupstore::{
    BackupStoreError, DriverRegistry, InspectOrchestrator, ListOrchestrator, StoreConfig,
    config::ConfigError,
};

mod cli;

use cli::{Cli, InspectCommand, ListCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] BackupStoreError),
    #[error("failed to write output: {0}")]
    Output(String),
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = StoreConfig::load_without_cli_args()?;
    config.validate()?;
    init_tracing(&config.log_filter);

    let registry = DriverRegistry::with_defaults();
    dispatch(cli, &config, &registry, io::stdout().lock())
}

fn dispatch(
    cli: Cli,
    config: &StoreConfig,
    registry: &DriverRegistry,
    out: impl Write,
) -> Result<(), CliError> {
    match cli {
        Cli::List(command) => list_command(&command, config, registry, out),
        Cli::Inspect(command) => inspect_command(&command, registry, out),
    }
}

fn list_command(
    command: &ListCommand,
    config: &StoreConfig,
    registry: &DriverRegistry,
    out: impl Write,
) -> Result<(), CliError> {
    let destination = config.resolve_destination(command.dest.as_deref())?;
    let storage_driver = config.resolve_storage_driver(command.storage_driver.as_deref())?;
    let volume = command.volume.as_deref().unwrap_or_default();

    let listing = ListOrchestrator::new(registry).list(volume, &destination, &storage_driver)?;
    write_json(out, &listing)
}

fn inspect_command(
    command: &InspectCommand,
    registry: &DriverRegistry,
    out: impl Write,
) -> Result<(), CliError> {
    let orchestrator = InspectOrchestrator::new(registry);
    let detail = match command.dest.as_deref() {
        Some(destination) => orchestrator.inspect_backup_within(&command.url, destination)?,
        None => orchestrator.inspect_backup(&command.url)?,
    };
    write_json(out, &detail)
}

fn init_tracing(log_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_filter))
        .unwrap_or_else(|_| EnvFilter::new(backupstore::config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn write_json(mut target: impl Write, value: &impl Serialize) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut target, value)
        .map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(target).map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

//! SnapShop - Command line entry point
//!
//! Loads settings, restores the stored session and runs one command.

mod cli;
mod commands;

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use snapshop_infrastructure::{DEFAULT_LOG_FILTER, FileKeyValueStore, SettingsRepository, init_tracing};

use crate::cli::Cli;
use crate::commands::App;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(DEFAULT_LOG_FILTER);

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = SettingsRepository::new().load().await?;
    let config = cli.connection.apply(settings);
    tracing::debug!(?config, "configuration loaded");

    let storage = Arc::new(FileKeyValueStore::at_default_location()?);
    let app = App::bootstrap(config, storage).await?;
    app.run(cli.command).await?;
    Ok(())
}

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, CliError};
use hoard_client::{Hoard, HttpApi};
use log::{debug, error};

mod cli;
mod commands;
mod logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // The user has already seen a flash message or a redirect for these
        Err(CliError::Store(e)) => {
            debug!("Command failed: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.client_config()?;
    debug!("Using API at {}", config.base_url);

    let api = HttpApi::new(&config).map_err(CliError::Client)?;
    let hoard = Hoard::new(api, cli.token.clone());

    commands::run(&hoard, cli.command).await
}

//! Flicker Service CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use flicker_service::cli::commands;
use flicker_service::cli::{handle_error, Cli, Commands};
use flicker_service::domain::models::Config;
use flicker_service::infrastructure::config::ConfigLoader;
use flicker_service::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;
    let _logger = LoggerImpl::init(&LogConfig::try_from(&config.logging)?)?;

    match cli.command {
        Commands::Scenarios(args) => commands::scenarios::execute(args, &config, cli.json).map(|()| true),
        Commands::Check(args) => commands::check::execute(args, &config, cli.json),
        Commands::Config(args) => commands::config::execute(args, &config, cli.json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => handle_error(err, json),
    }
}

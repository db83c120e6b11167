//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::check::CheckArgs;
use crate::cli::commands::config::ConfigArgs;
use crate::cli::commands::scenarios::ScenariosArgs;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "flicker-service")]
#[command(about = "Detect flicker in recorded UI state traces", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .flicker/config.yaml and .flicker/local.yaml)
    #[arg(short, long, global = true, env = "FLICKER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the scenario instances found in a trace dump
    Scenarios(ScenariosArgs),

    /// Run the assertions of every detected scenario
    Check(CheckArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

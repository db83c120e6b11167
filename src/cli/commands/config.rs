//! `config` subcommand.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Inspect and validate configuration
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration action
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Check a configuration file without running anything
    Validate {
        /// Configuration file to check
        path: PathBuf,
    },
}

/// Effective configuration.
#[derive(Debug, Serialize)]
pub struct ConfigShowOutput {
    /// Merged configuration.
    #[serde(flatten)]
    pub config: Config,
}

impl CommandOutput for ConfigShowOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .unwrap_or_else(|e| format!("Failed to render configuration: {e}"))
    }
}

/// Outcome of validating one configuration file.
#[derive(Debug, Serialize)]
pub struct ConfigValidateOutput {
    /// File that was validated.
    pub path: String,
    /// Whether it loaded and validated.
    pub valid: bool,
    /// Why it is invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput for ConfigValidateOutput {
    fn to_human(&self) -> String {
        match &self.error {
            None => format!("{}: valid", self.path),
            Some(error) => format!("{}: invalid\n  {error}", self.path),
        }
    }
}

/// Returns `false` when validation failed.
pub fn execute(args: ConfigArgs, config: &Config, json_mode: bool) -> Result<bool> {
    match args.command {
        ConfigCommands::Show => {
            output(&ConfigShowOutput { config: config.clone() }, json_mode);
            Ok(true)
        }
        ConfigCommands::Validate { path } => {
            let error = ConfigLoader::load_from_file(&path).err().map(|e| format!("{e:#}"));
            let out = ConfigValidateOutput {
                path: path.display().to_string(),
                valid: error.is_none(),
                error,
            };
            output(&out, json_mode);
            Ok(out.valid)
        }
    }
}

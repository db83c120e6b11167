//! Serializable service configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the flicker service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scenario selection
    #[serde(default)]
    pub scenarios: ScenarioSelection,

    /// Per-assertion stability overrides
    #[serde(default)]
    pub assertions: StabilityOverrides,

    /// Evaluation behaviour
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Which scenario types are extracted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioSelection {
    /// Explicit allow-list; empty keeps the registry defaults
    #[serde(default)]
    pub enabled: Vec<String>,

    /// Scenario types switched off
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// Assertion names forced to a stability class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StabilityOverrides {
    /// Names forced to `BLOCKING`
    #[serde(default)]
    pub blocking: Vec<String>,

    /// Names forced to `NON_BLOCKING`
    #[serde(default)]
    pub non_blocking: Vec<String>,
}

/// Evaluation behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluationConfig {
    /// Exit non-zero when a blocking assertion fails
    #[serde(default = "default_fail_on_blocking")]
    pub fail_on_blocking: bool,
}

const fn default_fail_on_blocking() -> bool {
    true
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            fail_on_blocking: default_fail_on_blocking(),
        }
    }
}

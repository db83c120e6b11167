//! Layered configuration loading: defaults, YAML files and environment.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::scenario::ScenarioType;
use crate::services::assertion_templates::TemplateKind;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Log level outside the accepted set.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Log format outside the accepted set.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Rotation policy outside the accepted set.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    /// Scenario name that is not a known type.
    #[error("Unknown scenario type: {0}")]
    UnknownScenario(String),

    /// Override naming no known template.
    #[error("Unknown assertion: {0}")]
    UnknownAssertion(String),

    /// Assertion listed under both stability overrides.
    #[error("Assertion {0} is listed as both blocking and non_blocking")]
    ConflictingStability(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .flicker/config.yaml (project config)
    /// 3. .flicker/local.yaml (project local overrides, optional)
    /// 4. Environment variables (FLICKER_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".flicker/config.yaml"))
            .merge(Yaml::file(".flicker/local.yaml"))
            .merge(Env::prefixed("FLICKER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file; environment variables still win
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("FLICKER_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        for name in config.scenarios.enabled.iter().chain(&config.scenarios.disabled) {
            if name.parse::<ScenarioType>().is_err() {
                return Err(ConfigError::UnknownScenario(name.clone()));
            }
        }

        let assertions = &config.assertions;
        for name in assertions.blocking.iter().chain(&assertions.non_blocking) {
            let kind = name.split('(').next().unwrap_or(name);
            if kind.parse::<TemplateKind>().is_err() {
                return Err(ConfigError::UnknownAssertion(name.clone()));
            }
        }
        if let Some(name) = assertions
            .blocking
            .iter()
            .find(|n| assertions.non_blocking.contains(n))
        {
            return Err(ConfigError::ConflictingStability(name.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{ScenarioSelection, StabilityOverrides};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
logging:
  level: debug
  format: json
  rotation: hourly
scenarios:
  disabled: [LAUNCHER_QUICK_SWITCH]
assertions:
  blocking: [EntireScreenCoveredAlways]
evaluation:
  fail_on_blocking: false
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.scenarios.disabled, vec!["LAUNCHER_QUICK_SWITCH"]);
        assert!(!config.evaluation.fail_on_blocking);
        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_validate_unknown_scenario() {
        let config = Config {
            scenarios: ScenarioSelection {
                enabled: vec![],
                disabled: vec!["APP_DANCE".to_string()],
            },
            ..Config::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::UnknownScenario(name)) if name == "APP_DANCE"
        ));
    }

    #[test]
    fn test_validate_unknown_assertion() {
        let config = Config {
            assertions: StabilityOverrides {
                blocking: vec!["AppLayerDances(OPENING_APP)".to_string()],
                non_blocking: vec![],
            },
            ..Config::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::UnknownAssertion(_))
        ));
    }

    #[test]
    fn test_validate_conflicting_stability() {
        let name = "AppLayerIsVisibleAtEnd(OPENING_APP)".to_string();
        let config = Config {
            assertions: StabilityOverrides {
                blocking: vec![name.clone()],
                non_blocking: vec![name],
            },
            ..Config::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ConflictingStability(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  level: warn\nevaluation:\n  fail_on_blocking: false").unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.evaluation.fail_on_blocking);
        assert_eq!(config.logging.format, "pretty");
    }
}

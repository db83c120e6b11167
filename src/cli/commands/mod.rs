//! CLI command implementations.

pub mod check;
pub mod config;
pub mod scenarios;

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::models::{Config, ScenarioType, TraceBundle};
use crate::infrastructure::TraceDump;
use crate::services::FlickerService;

/// Read a dump and build a service honouring `--scenario` on top of the config.
pub(crate) fn prepare(
    dump: &Path,
    config: &Config,
    only: &[ScenarioType],
) -> Result<(TraceBundle, FlickerService)> {
    let bundle = TraceDump::read(dump)?;

    let mut config = config.clone();
    if !only.is_empty() {
        config.scenarios.enabled = only.iter().map(ToString::to_string).collect();
        config.scenarios.disabled.retain(|name| {
            name.parse::<ScenarioType>()
                .map_or(true, |t| !only.contains(&t))
        });
    }
    let service = FlickerService::from_config(&config).context("Invalid scenario selection")?;
    Ok((bundle, service))
}

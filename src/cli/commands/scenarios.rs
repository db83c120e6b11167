//! `scenarios` subcommand: list the scenarios found in a trace dump.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ScenarioSummary, ScenarioType};
use crate::services::ExtractionIssue;

use super::prepare;

/// List the scenario instances found in a trace dump
#[derive(Args, Debug)]
pub struct ScenariosArgs {
    /// Trace dump (JSON)
    pub dump: PathBuf,

    /// Only detect these scenario types (repeatable)
    #[arg(short, long = "scenario", value_name = "TYPE")]
    pub scenarios: Vec<ScenarioType>,
}

/// Result of a `scenarios` run.
#[derive(Debug, Serialize)]
pub struct ScenarioListOutput {
    /// Detected instances.
    pub scenarios: Vec<ScenarioSummary>,
    /// Occurrences that were skipped.
    pub extraction_failures: Vec<ExtractionIssue>,
}

impl CommandOutput for ScenarioListOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = Vec::new();
        if self.scenarios.is_empty() {
            lines.push("No scenarios detected.".to_string());
        } else {
            lines.push(format!("Detected {} scenario(s):", self.scenarios.len()));
            lines.push(formatter.format_scenarios(&self.scenarios));
        }
        if !self.extraction_failures.is_empty() {
            lines.push(format!("\n{} extraction failure(s):", self.extraction_failures.len()));
            lines.push(formatter.format_extraction_issues(&self.extraction_failures));
        }
        lines.join("\n")
    }
}

/// Detect scenarios in the dump and print them.
pub fn execute(args: ScenariosArgs, config: &Config, json_mode: bool) -> Result<()> {
    let (bundle, service) = prepare(&args.dump, config, &args.scenarios)?;
    let report = service.detect_scenarios(&bundle);

    let out = ScenarioListOutput {
        scenarios: report.instances.iter().map(ScenarioSummary::from).collect(),
        extraction_failures: report.failures.iter().map(ExtractionIssue::from).collect(),
    };
    output(&out, json_mode);
    Ok(())
}

//! `check` subcommand: run every generated assertion over a trace dump.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::progress::{create_progress_bar, create_spinner, ProgressBarExt};
use crate::cli::output::table::{supports_color, TableFormatter};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AssertionResult, Config, RunSummary, ScenarioSummary, ScenarioType};
use crate::infrastructure::JsonLinesSink;
use crate::services::ExtractionIssue;

use super::prepare;

/// Run the flicker assertions over a trace dump
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Trace dump (JSON)
    pub dump: PathBuf,

    /// Only check these scenario types (repeatable)
    #[arg(short, long = "scenario", value_name = "TYPE")]
    pub scenarios: Vec<ScenarioType>,

    /// Exit with status 1 when a blocking assertion fails (overrides config)
    #[arg(long, conflicts_with = "no_fail_on_blocking")]
    pub fail_on_blocking: bool,

    /// Exit with status 0 even when a blocking assertion fails (overrides config)
    #[arg(long)]
    pub no_fail_on_blocking: bool,

    /// Show failed assertions only
    #[arg(long)]
    pub failures_only: bool,

    /// Also write every result as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub results: Option<PathBuf>,
}

impl CheckArgs {
    /// Flags win over `evaluation.fail_on_blocking`.
    pub const fn fails_on_blocking(&self, config: &Config) -> bool {
        if self.fail_on_blocking {
            true
        } else if self.no_fail_on_blocking {
            false
        } else {
            config.evaluation.fail_on_blocking
        }
    }
}

/// Result of a `check` run.
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    /// Dump that was checked.
    pub dump: String,
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Instances that were checked.
    pub scenarios: Vec<ScenarioSummary>,
    /// Occurrences that were skipped.
    pub extraction_failures: Vec<ExtractionIssue>,
    /// Assertion outcomes.
    pub summary: RunSummary,
    /// Hide passing assertions in human output.
    #[serde(skip)]
    pub failures_only: bool,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = vec![format!(
            "Checked {} ({} scenario(s), run {})",
            self.dump,
            self.scenarios.len(),
            self.summary.run_id
        )];

        let shown: Vec<AssertionResult> = if self.failures_only {
            self.summary.failures().cloned().collect()
        } else {
            self.summary.results.clone()
        };
        if !shown.is_empty() {
            lines.push(formatter.format_results(&shown));
        }

        for failure in self.summary.failures() {
            if let Some(detail) = &failure.failure {
                lines.push(format!("\n{} [{}]\n{}", failure.name, failure.scenario_id, detail.message));
            }
        }

        if !self.extraction_failures.is_empty() {
            lines.push(format!("\n{} extraction failure(s):", self.extraction_failures.len()));
            lines.push(formatter.format_extraction_issues(&self.extraction_failures));
        }

        let verdict = format!(
            "\n{} total, {} passed, {} failed ({} blocking)",
            self.summary.total, self.summary.passed, self.summary.failed, self.summary.blocking_failures
        );
        let verdict = if !supports_color() {
            verdict
        } else if self.summary.blocking_failures > 0 {
            style(verdict).red().bold().to_string()
        } else if self.summary.failed > 0 {
            style(verdict).yellow().to_string()
        } else {
            style(verdict).green().to_string()
        };
        lines.push(verdict);
        lines.join("\n")
    }
}

/// Run the check. Returns `false` when the process should exit with status 1.
pub fn execute(args: CheckArgs, config: &Config, json_mode: bool) -> Result<bool> {
    let (bundle, service) = prepare(&args.dump, config, &args.scenarios)?;

    let spinner = create_spinner("Detecting scenarios", !json_mode);
    let report = service.detect_scenarios(&bundle);
    spinner.finish_success(format!("{} scenario(s) detected", report.instances.len()));

    let progress = create_progress_bar(report.instances.len() as u64, !json_mode);
    let mut assertions = Vec::new();
    for instance in &report.instances {
        progress.set_message(instance.id().to_string());
        assertions.extend(service.generate_assertions(instance)?);
        progress.inc(1);
    }
    progress.finish_success(format!("{} assertion(s) generated", assertions.len()));

    let spinner = create_spinner("Evaluating assertions", !json_mode);
    let summary = match &args.results {
        Some(path) => {
            let mut sink = JsonLinesSink::create(path)?;
            let summary = service.evaluate_into(&assertions, &bundle, &mut sink);
            sink.finish()?;
            summary
        }
        None => service.evaluate(&assertions, &bundle),
    };
    if summary.is_success() {
        spinner.finish_success("Evaluation complete");
    } else {
        spinner.finish_error(format!("{} blocking failure(s)", summary.blocking_failures));
    }

    let success = !args.fails_on_blocking(config) || summary.is_success();

    let out = CheckOutput {
        dump: args.dump.display().to_string(),
        generated_at: Utc::now(),
        scenarios: report.instances.iter().map(ScenarioSummary::from).collect(),
        extraction_failures: report.failures.iter().map(ExtractionIssue::from).collect(),
        summary,
        failures_only: args.failures_only,
    };
    output(&out, json_mode);
    Ok(success)
}

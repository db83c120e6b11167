//! Table output formatting for CLI commands
//!
//! Renders scenario instances, assertion results and extraction issues using comfy-table.

use crate::domain::models::{AssertionResult, ScenarioSummary, Stability};
use crate::services::ExtractionIssue;
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::truncate;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<usize>,
}

impl TableFormatter {
    /// Formatter with colors when the terminal supports them.
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Formatter with explicit color and width settings.
    pub fn with_config(use_colors: bool, max_width: Option<usize>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// One row per scenario instance.
    pub fn format_scenarios(&self, scenarios: &[ScenarioSummary]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["ID", "Type", "Start", "End", "Duration", "Transition"]));

        for scenario in scenarios {
            let transition = scenario
                .transition_id
                .map_or_else(|| "-".to_string(), |id| format!("#{id}"));
            table.add_row(vec![
                Cell::new(&scenario.id),
                Cell::new(scenario.scenario_type.to_string()),
                Cell::new(scenario.start),
                Cell::new(scenario.end),
                Cell::new(scenario.end - scenario.start),
                Cell::new(transition),
            ]);
        }

        table.to_string()
    }

    /// One row per assertion result.
    pub fn format_results(&self, results: &[AssertionResult]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Assertion", "Scenario", "Stability", "Result", "Message"]));

        for result in results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            let status_cell = if self.use_colors {
                Cell::new(status).fg(result_color(result))
            } else {
                Cell::new(format!("{} {status}", result_icon(result)))
            };
            let message = result
                .failure
                .as_ref()
                .map_or_else(|| "-".to_string(), |f| truncate(&f.message, 60));

            table.add_row(vec![
                Cell::new(&result.name),
                Cell::new(&result.scenario_id),
                Cell::new(stability_label(result.stability)),
                status_cell,
                Cell::new(message),
            ]);
        }

        table.to_string()
    }

    /// One row per extraction failure.
    pub fn format_extraction_issues(&self, issues: &[ExtractionIssue]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Scenario", "Occurrence", "Kind", "Message"]));

        for issue in issues {
            let kind = if self.use_colors {
                Cell::new(issue.kind).fg(Color::Yellow)
            } else {
                Cell::new(issue.kind)
            };
            table.add_row(vec![
                Cell::new(&issue.scenario_type),
                Cell::new(issue.occurrence),
                kind,
                Cell::new(truncate(&issue.message, 60)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(u16::try_from(width).unwrap_or(u16::MAX));
        }
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if color output is supported
pub(crate) fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }
    true
}

const fn stability_label(stability: Stability) -> &'static str {
    match stability {
        Stability::Blocking => "blocking",
        Stability::NonBlocking => "non-blocking",
    }
}

fn result_color(result: &AssertionResult) -> Color {
    match (result.passed, result.stability) {
        (true, _) => Color::Green,
        (false, Stability::Blocking) => Color::Red,
        (false, Stability::NonBlocking) => Color::Yellow,
    }
}

fn result_icon(result: &AssertionResult) -> &'static str {
    match (result.passed, result.stability) {
        (true, _) => "✓",
        (false, Stability::Blocking) => "✗",
        (false, Stability::NonBlocking) => "!",
    }
}

//! Facade running scenario detection, assertion generation and evaluation.

use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::errors::FlickerResult;
use crate::domain::models::assertion_result::RunSummary;
use crate::domain::models::config::Config;
use crate::domain::models::scenario::{ScenarioInstance, ScenarioSummary};
use crate::domain::ports::{ResultSink, TraceReader};

use super::assertion_factory::{AssertionFactory, ScenarioAssertion};
use super::assertion_runner::AssertionRunner;
use super::scenario_extractor::{ExtractionFailure, ExtractionReport, ScenarioExtractor};
use super::scenario_registry::ScenarioRegistry;

/// Extraction failure in reportable form.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionIssue {
    /// Scenario being extracted.
    pub scenario_type: String,
    /// Zero-based tag occurrence.
    pub occurrence: usize,
    /// Error kind, e.g. `MissingTransitionError`.
    pub kind: &'static str,
    /// Rendered error.
    pub message: String,
}

impl From<&ExtractionFailure> for ExtractionIssue {
    fn from(failure: &ExtractionFailure) -> Self {
        Self {
            scenario_type: failure.scenario_type.to_string(),
            occurrence: failure.occurrence,
            kind: failure.error.kind(),
            message: failure.error.to_string(),
        }
    }
}

/// Everything one `process` call produced.
#[derive(Debug, Clone, Serialize)]
pub struct FlickerReport {
    /// Instances that were extracted.
    pub scenarios: Vec<ScenarioSummary>,
    /// Occurrences that produced no instance.
    pub extraction_failures: Vec<ExtractionIssue>,
    /// Assertion outcomes.
    pub summary: RunSummary,
}

/// Entry point of the engine.
#[derive(Debug, Clone, Default)]
pub struct FlickerService {
    factory: AssertionFactory,
    runner: AssertionRunner,
}

impl FlickerService {
    /// Service over `registry` with default stabilities.
    pub fn new(registry: ScenarioRegistry) -> Self {
        Self {
            factory: AssertionFactory::new(registry),
            runner: AssertionRunner::new(),
        }
    }

    /// Build from configuration: scenario selection and stability overrides.
    pub fn from_config(config: &Config) -> FlickerResult<Self> {
        let registry = ScenarioRegistry::builtin().with_selection(&config.scenarios)?;
        Ok(Self {
            factory: AssertionFactory::new(registry).with_overrides(config.assertions.clone()),
            runner: AssertionRunner::new(),
        })
    }

    /// Registry the service draws scenarios from.
    pub const fn registry(&self) -> &ScenarioRegistry {
        self.factory.registry()
    }

    /// Extracts instances of every enabled scenario.
    #[instrument(skip_all)]
    pub fn detect_scenarios(&self, reader: &dyn TraceReader) -> ExtractionReport {
        let report = self.registry().extractor().extract(reader);
        info!(
            instances = report.instances.len(),
            failures = report.failures.len(),
            "scenario detection complete"
        );
        report
    }

    /// Binds the instance's assertion set to it.
    #[instrument(skip_all, fields(scenario = %instance.id()))]
    pub fn generate_assertions(&self, instance: &ScenarioInstance) -> FlickerResult<Vec<ScenarioAssertion>> {
        self.factory.generate(instance)
    }

    /// Runs `assertions` against the traces.
    #[instrument(skip_all, fields(assertions = assertions.len()))]
    pub fn evaluate(&self, assertions: &[ScenarioAssertion], reader: &dyn TraceReader) -> RunSummary {
        self.runner.run(assertions, reader, None)
    }

    /// Like [`Self::evaluate`], also pushing each result to `sink`.
    pub fn evaluate_into(
        &self,
        assertions: &[ScenarioAssertion],
        reader: &dyn TraceReader,
        sink: &mut dyn ResultSink,
    ) -> RunSummary {
        self.runner.run(assertions, reader, Some(sink))
    }

    /// Detect, generate and evaluate in one pass.
    #[instrument(skip_all)]
    pub fn process(&self, reader: &dyn TraceReader) -> FlickerResult<FlickerReport> {
        let report = self.detect_scenarios(reader);
        let mut assertions = Vec::new();
        for instance in &report.instances {
            assertions.extend(self.generate_assertions(instance)?);
        }
        let summary = self.evaluate(&assertions, reader);

        Ok(FlickerReport {
            scenarios: report.instances.iter().map(ScenarioSummary::from).collect(),
            extraction_failures: report.failures.iter().map(ExtractionIssue::from).collect(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::bundle::TraceBundle;
    use crate::domain::models::config::ScenarioSelection;

    #[test]
    fn test_empty_bundle_produces_empty_report() {
        let service = FlickerService::new(ScenarioRegistry::builtin());
        let report = service.process(&TraceBundle::new()).unwrap();
        assert!(report.scenarios.is_empty());
        assert_eq!(report.summary.total, 0);
        assert!(report.summary.is_success());
    }

    #[test]
    fn test_from_config_rejects_unknown_scenario() {
        let config = Config {
            scenarios: ScenarioSelection {
                enabled: vec!["BOGUS".to_string()],
                disabled: vec![],
            },
            ..Config::default()
        };
        assert!(FlickerService::from_config(&config).is_err());
    }
}

//! Executes scenario assertions and aggregates their results.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::domain::models::assertion_result::{AssertionResult, RunSummary};
use crate::domain::models::bundle::TraceBundle;
use crate::domain::models::scenario::ScenarioType;
use crate::domain::models::trace::TimeRange;
use crate::domain::ports::{ResultSink, TraceReader};

use super::assertion_factory::ScenarioAssertion;

/// Runs assertions one at a time; a failing assertion never stops the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertionRunner;

impl AssertionRunner {
    /// A runner.
    pub const fn new() -> Self {
        Self
    }

    /// Names reported for each assertion, suffixed `_0`, `_1`, ... in
    /// first-seen order when the same name repeats within a scenario type.
    fn report_names(assertions: &[ScenarioAssertion]) -> Vec<String> {
        let mut totals: HashMap<(ScenarioType, &str), usize> = HashMap::new();
        for a in assertions {
            *totals.entry((a.scenario_type, a.name.as_str())).or_default() += 1;
        }
        let mut seen: HashMap<(ScenarioType, &str), usize> = HashMap::new();
        assertions
            .iter()
            .map(|a| {
                let key = (a.scenario_type, a.name.as_str());
                if totals.get(&key).copied().unwrap_or(0) > 1 {
                    let index = seen.entry(key).or_default();
                    let name = format!("{}_{}", a.name, index);
                    *index += 1;
                    name
                } else {
                    a.name.clone()
                }
            })
            .collect()
    }

    fn run_one(assertion: &ScenarioAssertion, name: String, slice: &TraceBundle) -> AssertionResult {
        let chain = match &assertion.chain {
            Ok(chain) => chain,
            Err(error) => {
                return AssertionResult::failed(
                    name,
                    &assertion.scenario_id,
                    assertion.stability,
                    error.clone(),
                );
            }
        };

        let Some(trace) = slice.trace(assertion.trace_kind) else {
            debug!(
                assertion = %name,
                kind = %assertion.trace_kind,
                "trace not available; skipping"
            );
            return AssertionResult::passed(name, &assertion.scenario_id, assertion.stability);
        };

        match chain.evaluate(trace) {
            Ok(()) => AssertionResult::passed(name, &assertion.scenario_id, assertion.stability),
            Err(error) => {
                AssertionResult::failed(name, &assertion.scenario_id, assertion.stability, error)
            }
        }
    }

    /// Run every assertion, pushing results to `sink` in evaluation order.
    pub fn run(
        &self,
        assertions: &[ScenarioAssertion],
        reader: &dyn TraceReader,
        mut sink: Option<&mut dyn ResultSink>,
    ) -> RunSummary {
        let names = Self::report_names(assertions);
        let mut cached: Option<(TimeRange, TraceBundle)> = None;
        let mut results = Vec::with_capacity(assertions.len());

        for (assertion, name) in assertions.iter().zip(names) {
            let slice = match cached.take() {
                Some((range, bundle)) if range == assertion.range => (range, bundle),
                _ => (assertion.range, reader.slice(assertion.range)),
            };
            let result = Self::run_one(assertion, name, &slice.1);
            cached = Some(slice);

            if let Some(failure) = &result.failure {
                if result.is_blocking_failure() {
                    warn!(
                        assertion = %result.name,
                        scenario = %result.scenario_id,
                        cause = failure.cause.kind(),
                        "blocking assertion failed"
                    );
                } else {
                    debug!(
                        assertion = %result.name,
                        scenario = %result.scenario_id,
                        cause = failure.cause.kind(),
                        "assertion failed"
                    );
                }
            }
            if let Some(sink) = sink.as_deref_mut() {
                sink.record(&result);
            }
            results.push(result);
        }

        let summary = RunSummary::from_results(results);
        info!(
            run_id = %summary.run_id,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            blocking_failures = summary.blocking_failures,
            "assertion run complete"
        );
        summary
    }
}

//! Outcome of evaluating assertions against scenario instances.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

use super::fact::Fact;
use crate::domain::errors::FlickerError;

/// Severity of an assertion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stability {
    /// A failure fails the overall run.
    #[default]
    Blocking,
    /// A failure is recorded only.
    NonBlocking,
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocking => write!(f, "BLOCKING"),
            Self::NonBlocking => write!(f, "NON_BLOCKING"),
        }
    }
}

fn serialize_cause<S: Serializer>(cause: &FlickerError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(cause.kind())
}

/// Why an assertion failed.
#[derive(Debug, Clone, Serialize)]
pub struct AssertionFailure {
    /// Rendered error message.
    pub message: String,
    /// Diagnostics copied from the cause.
    pub facts: Vec<Fact>,
    /// Underlying error; serialized as its kind.
    #[serde(serialize_with = "serialize_cause")]
    pub cause: FlickerError,
}

impl From<FlickerError> for AssertionFailure {
    fn from(cause: FlickerError) -> Self {
        Self {
            message: cause.to_string(),
            facts: cause.facts().to_vec(),
            cause,
        }
    }
}

/// Result of one assertion against one scenario instance.
#[derive(Debug, Clone, Serialize)]
pub struct AssertionResult {
    /// Assertion name.
    pub name: String,
    /// Instance the assertion ran against.
    pub scenario_id: String,
    /// Severity class.
    pub stability: Stability,
    /// Whether the assertion held.
    pub passed: bool,
    /// Present iff `passed` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<AssertionFailure>,
}

impl AssertionResult {
    /// A passing result.
    pub fn passed(name: impl Into<String>, scenario_id: impl Into<String>, stability: Stability) -> Self {
        Self {
            name: name.into(),
            scenario_id: scenario_id.into(),
            stability,
            passed: true,
            failure: None,
        }
    }

    /// A failing result carrying `cause`.
    pub fn failed(
        name: impl Into<String>,
        scenario_id: impl Into<String>,
        stability: Stability,
        cause: FlickerError,
    ) -> Self {
        Self {
            name: name.into(),
            scenario_id: scenario_id.into(),
            stability,
            passed: false,
            failure: Some(AssertionFailure::from(cause)),
        }
    }

    /// Failed and blocking.
    pub fn is_blocking_failure(&self) -> bool {
        !self.passed && self.stability == Stability::Blocking
    }
}

/// Aggregate of one evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Unique id of this pass.
    pub run_id: Uuid,
    /// Number of results.
    pub total: usize,
    /// Results that passed.
    pub passed: usize,
    /// Results that failed.
    pub failed: usize,
    /// Failed results marked blocking.
    pub blocking_failures: usize,
    /// Every result, in evaluation order.
    pub results: Vec<AssertionResult>,
}

impl RunSummary {
    /// Counts results under a fresh run id.
    pub fn from_results(results: Vec<AssertionResult>) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let blocking_failures = results.iter().filter(|r| r.is_blocking_failure()).count();
        Self {
            run_id: Uuid::new_v4(),
            total: results.len(),
            passed,
            failed: results.len() - passed,
            blocking_failures,
            results,
        }
    }

    /// False iff any blocking assertion failed.
    pub const fn is_success(&self) -> bool {
        self.blocking_failures == 0
    }

    /// Failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> FlickerError {
        FlickerError::MissingContext {
            component: "OPENING_APP".to_string(),
            expected: 1,
            actual: 0,
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary::from_results(vec![
            AssertionResult::passed("A", "COMMON#0", Stability::Blocking),
            AssertionResult::failed("B", "COMMON#0", Stability::NonBlocking, missing()),
            AssertionResult::passed("C", "COMMON#0", Stability::Blocking),
        ]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.is_success());
    }

    #[test]
    fn test_blocking_failure_fails_run() {
        let summary = RunSummary::from_results(vec![AssertionResult::failed(
            "A",
            "COMMON#0",
            Stability::Blocking,
            missing(),
        )]);
        assert!(!summary.is_success());
        assert_eq!(summary.blocking_failures, 1);
    }

    #[test]
    fn test_failure_serializes_cause_kind() {
        let result = AssertionResult::failed("A", "COMMON#0", Stability::Blocking, missing());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["failure"]["cause"], "MissingContextError");
        assert_eq!(json["stability"], "BLOCKING");
    }
}

//! Domain errors for the flicker service.

use thiserror::Error;

use super::models::fact::{format_facts, Fact};
use super::models::trace::Timestamp;

fn format_timestamp(ts: &Option<Timestamp>) -> String {
    ts.map_or_else(|| "<empty trace>".to_string(), |t| format!("{t}ns"))
}

/// Errors raised while constructing or slicing trace data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TraceError {
    /// Two consecutive snapshots are out of order.
    #[error("Snapshot timestamps must be strictly increasing: {previous} followed by {next}")]
    NonMonotonicTimestamps {
        /// Earlier snapshot.
        previous: Timestamp,
        /// Snapshot that does not follow it.
        next: Timestamp,
    },

    /// A snapshot's kind differs from its trace's.
    #[error("Trace of kind {expected} contains a {found} snapshot at {timestamp}")]
    MixedKinds {
        /// Kind of the trace.
        expected: String,
        /// Kind of the offending snapshot.
        found: String,
        /// When the offending snapshot was taken.
        timestamp: Timestamp,
    },

    /// A range ends before it starts.
    #[error("Invalid time range: end {end} is before start {start}")]
    InvalidRange {
        /// Requested start.
        start: Timestamp,
        /// Requested end.
        end: Timestamp,
    },

    /// A transition change names an entity absent from every snapshot in its window.
    #[error(
        "Transition {transition} change references entity {entity_id} not present in its trace window"
    )]
    DanglingChange {
        /// Transition id.
        transition: u64,
        /// Entity the change refers to.
        entity_id: u64,
    },
}

/// Errors raised while building an assertion chain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// The chain has no segments.
    #[error("Assertion chain '{0}' has no segments")]
    EmptyChain(String),

    /// A `then()` closed a segment with no predicates.
    #[error("Assertion chain '{assertion}' has an empty segment at position {index}")]
    EmptySegment {
        /// Assertion name.
        assertion: String,
        /// Zero-based segment position.
        index: usize,
    },

    /// `optional()` was called with no pending predicate.
    #[error("Assertion chain '{assertion}' marks segment {index} optional before giving it a predicate")]
    OptionalWithoutPredicate {
        /// Assertion name.
        assertion: String,
        /// Zero-based segment position.
        index: usize,
    },
}

/// Domain-level errors that can occur while detecting and checking scenarios.
#[derive(Debug, Clone, Error)]
pub enum FlickerError {
    /// A dynamic component did not resolve to exactly one entity.
    #[error("Unable to resolve {component}: expected {expected}, got {actual}")]
    MissingContext {
        /// Component being resolved.
        component: String,
        /// Number of matches required.
        expected: usize,
        /// Number of matches found.
        actual: usize,
    },

    /// A tag occurrence needed a transition and none matched.
    #[error("Scenario {scenario} requires a transition for tag '{tag}' in [{start}, {end}) but none was found")]
    MissingTransition {
        /// Scenario type.
        scenario: String,
        /// Tag the occurrence was built from.
        tag: String,
        /// Start of the tag occurrence.
        start: Timestamp,
        /// End of the tag occurrence.
        end: Timestamp,
    },

    /// A tag occurrence (widened by its transition) lies outside the recorded snapshots.
    #[error("Scenario {scenario} for tag '{tag}' spans [{start}, {end}) which lies outside the recorded trace [{trace_start}, {trace_end})")]
    OutsideTrace {
        /// Scenario type.
        scenario: String,
        /// Tag the occurrence was built from.
        tag: String,
        /// Start of the widened occurrence.
        start: Timestamp,
        /// End of the widened occurrence.
        end: Timestamp,
        /// First recorded instant.
        trace_start: Timestamp,
        /// End of the recording, exclusive.
        trace_end: Timestamp,
    },

    /// A mandatory segment was left, or the entries ran out, before it accepted any entry.
    #[error(
        "{assertion}: segment '{segment}' was never satisfied (diverged at {})\n{}",
        format_timestamp(.timestamp),
        format_facts(.facts)
    )]
    SegmentNeverSatisfied {
        /// Assertion name.
        assertion: String,
        /// Description of the unsatisfied segment.
        segment: String,
        /// Entry at which the chain diverged, `None` without entries.
        timestamp: Option<Timestamp>,
        /// Diagnostics from the rejecting predicate.
        facts: Vec<Fact>,
    },

    /// An entry was rejected by the last segment.
    #[error(
        "{assertion}: entry at {timestamp}ns rejected by final segment '{segment}'\n{}",
        format_facts(.facts)
    )]
    ChainExhausted {
        /// Assertion name.
        assertion: String,
        /// Description of the final segment.
        segment: String,
        /// Rejected entry.
        timestamp: Timestamp,
        /// Diagnostics from the rejecting predicate.
        facts: Vec<Fact>,
    },

    /// Unknown scenario, assertion set, template or component.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid trace data.
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Malformed assertion chain.
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
}

impl FlickerError {
    /// Diagnostic facts carried by evaluation failures.
    pub fn facts(&self) -> &[Fact] {
        match self {
            Self::SegmentNeverSatisfied { facts, .. } | Self::ChainExhausted { facts, .. } => facts,
            _ => &[],
        }
    }

    /// Short, stable name of the error kind, used in reports.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingContext { .. } => "MissingContextError",
            Self::MissingTransition { .. } => "MissingTransitionError",
            Self::OutsideTrace { .. } => "OutsideTraceError",
            Self::SegmentNeverSatisfied { .. } => "SegmentNeverSatisfiedError",
            Self::ChainExhausted { .. } => "ChainExhaustedError",
            Self::Configuration(_) => "ConfigurationError",
            Self::Trace(_) => "TraceError",
            Self::Chain(_) => "ChainError",
        }
    }
}

/// Result alias for domain operations.
pub type FlickerResult<T> = Result<T, FlickerError>;

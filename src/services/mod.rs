//! Scenario extraction, assertion generation and evaluation.

pub mod assertion_chain;
pub mod assertion_factory;
pub mod assertion_runner;
pub mod assertion_templates;
pub mod flicker_service;
pub mod predicates;
pub mod scenario_extractor;
pub mod scenario_registry;
pub mod transition_filters;

pub use assertion_chain::{AssertionChain, ChainBuilder, EntryScope, Segment};
pub use assertion_factory::{AssertionFactory, ScenarioAssertion};
pub use assertion_runner::AssertionRunner;
pub use assertion_templates::{AssertionSet, AssertionTemplate, TemplateKind};
pub use flicker_service::{ExtractionIssue, FlickerReport, FlickerService};
pub use predicates::{Coverage, EntryContext, Outcome, Predicate, RegionTarget};
pub use scenario_extractor::{
    CombinedExtractor, EntireTraceExtractor, ExtractionFailure, ExtractionReport, ScenarioExtractor,
    TaggedExtractor,
};
pub use scenario_registry::{ExtractorConfig, ScenarioConfig, ScenarioRegistry};
pub use transition_filters::{TransitionFilter, TransitionMerge};

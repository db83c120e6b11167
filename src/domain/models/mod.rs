//! Domain value types.

pub mod assertion_result;
pub mod bundle;
pub mod component;
pub mod config;
pub mod fact;
pub mod geometry;
pub mod scenario;
pub mod snapshot;
pub mod tag;
pub mod trace;
pub mod transition;

pub use assertion_result::{AssertionFailure, AssertionResult, RunSummary, Stability};
pub use bundle::TraceBundle;
pub use component::{well_known, ComponentMatcher, ComponentReference, DynamicComponent, NameMatcher};
pub use config::{Config, EvaluationConfig, LoggingConfig, ScenarioSelection, StabilityOverrides};
pub use fact::Fact;
pub use geometry::{Rect, Region};
pub use scenario::{ScenarioInstance, ScenarioSummary, ScenarioType};
pub use snapshot::{Entity, Snapshot, TraceKind};
pub use tag::{Tag, TagKind, TagOccurrence};
pub use trace::{TimeRange, Timestamp, Trace};
pub use transition::{Change, ChangeType, Transition, TransitionType, WindowingMode};

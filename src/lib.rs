//! Flicker Service - scenario segmentation and temporal assertions over UI traces
//!
//! Recorded window-manager and compositor traces are split into scenario
//! instances (app launch, close to home, quick switch, ...) and each instance
//! is checked against a fixed set of temporal assertions that catch visual
//! flicker: components disappearing for a frame, regions shrinking, layers
//! briefly rendered on top of each other.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): trace data model, component matchers, errors and ports
//! - **Service Layer** (`services`): assertion chains, scenario extraction, assertion factory and runner
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging, trace dump and result log adapters
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use flicker_service::{FlickerService, TraceDump};
//!
//! let bundle = TraceDump::read("trace.json")?;
//! let report = FlickerService::default().process(&bundle)?;
//! assert!(report.summary.is_success());
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::{
    AssertionResult, ComponentMatcher, Config, DynamicComponent, Entity, Rect, Region, RunSummary,
    ScenarioInstance, ScenarioType, Snapshot, Stability, TimeRange, Timestamp, Trace, TraceBundle,
    TraceKind,
};
pub use domain::{ChainError, FlickerError, FlickerResult, TraceError};
pub use infrastructure::TraceDump;
pub use services::{AssertionChain, ChainBuilder, FlickerReport, FlickerService, ScenarioRegistry};

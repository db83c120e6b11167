//! Domain layer for the flicker service
//!
//! Trace data model, component matchers, errors and the ports through which
//! the engine talks to trace readers and result sinks.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ChainError, FlickerError, FlickerResult, TraceError};

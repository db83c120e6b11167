//! Ports: traits at the boundary between the engine and its collaborators.

pub mod result_sink;
pub mod trace_reader;

pub use result_sink::ResultSink;
pub use trace_reader::TraceReader;

//! Adapters: configuration, logging and file-backed trace and result I/O.

pub mod config;
pub mod logging;
pub mod result_log;
pub mod trace_dump;

pub use result_log::JsonLinesSink;
pub use trace_dump::TraceDump;

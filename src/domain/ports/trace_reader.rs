//! Trace reader port.
//!
//! The engine never decodes traces itself; anything that can hand out
//! ordered, already-materialized snapshots implements this trait.

use crate::domain::models::bundle::TraceBundle;
use crate::domain::models::snapshot::TraceKind;
use crate::domain::models::tag::Tag;
use crate::domain::models::trace::{TimeRange, Trace};
use crate::domain::models::transition::Transition;

/// Read access to the traces of one recording.
pub trait TraceReader {
    /// Snapshot trace of the given kind, if it was captured.
    fn trace(&self, kind: TraceKind) -> Option<&Trace>;

    /// Tag markers in timestamp order.
    fn tags(&self) -> &[Tag];

    /// Recorded transitions.
    fn transitions(&self) -> &[Transition];

    /// Range covered by the snapshot traces.
    fn time_range(&self) -> Option<TimeRange>;

    /// Copy of every trace restricted to `range`.
    fn slice(&self, range: TimeRange) -> TraceBundle;

    /// Shorthand for the window trace.
    fn window_trace(&self) -> Option<&Trace> {
        self.trace(TraceKind::Window)
    }

    /// Shorthand for the layer trace.
    fn layers_trace(&self) -> Option<&Trace> {
        self.trace(TraceKind::Layer)
    }
}

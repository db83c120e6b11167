//! Materialized set of traces for one recording.

use super::snapshot::TraceKind;
use super::tag::Tag;
use super::trace::{TimeRange, Trace};
use super::transition::Transition;
use crate::domain::errors::TraceError;
use crate::domain::ports::TraceReader;

/// All trace kinds captured for one recording, already decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceBundle {
    /// Window-manager trace, if captured.
    pub window_trace: Option<Trace>,
    /// Composition layer trace, if captured.
    pub layers_trace: Option<Trace>,
    /// Journey markers.
    pub tags: Vec<Tag>,
    /// Recorded transitions.
    pub transitions: Vec<Transition>,
}

impl TraceBundle {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window trace.
    #[must_use]
    pub fn with_window_trace(mut self, trace: Trace) -> Self {
        self.window_trace = Some(trace);
        self
    }

    /// Sets the layer trace.
    #[must_use]
    pub fn with_layers_trace(mut self, trace: Trace) -> Self {
        self.layers_trace = Some(trace);
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Replaces the transitions.
    #[must_use]
    pub fn with_transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions = transitions;
        self
    }

    /// Report every transition change whose entity cannot be found in any
    /// snapshot taken during the transition.
    pub fn validate(&self) -> Vec<TraceError> {
        let mut errors = Vec::new();
        if self.window_trace.is_none() && self.layers_trace.is_none() {
            return errors;
        }

        for transition in &self.transitions {
            let window = TimeRange {
                start: transition.start,
                end: transition.end.saturating_add(1),
            };
            for change in &transition.changes {
                let in_layers = self.layers_trace.as_ref().is_some_and(|trace| {
                    trace
                        .slice(window)
                        .snapshots()
                        .iter()
                        .any(|s| s.entity(change.layer_id).is_some())
                });
                let in_windows = self.window_trace.as_ref().is_some_and(|trace| {
                    trace
                        .slice(window)
                        .snapshots()
                        .iter()
                        .any(|s| s.entity(change.window_id).is_some())
                });
                if !in_layers && !in_windows {
                    errors.push(TraceError::DanglingChange {
                        transition: transition.id,
                        entity_id: change.entity_id,
                    });
                }
            }
        }
        errors
    }
}

impl TraceReader for TraceBundle {
    fn trace(&self, kind: TraceKind) -> Option<&Trace> {
        match kind {
            TraceKind::Window => self.window_trace.as_ref(),
            TraceKind::Layer => self.layers_trace.as_ref(),
        }
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    fn time_range(&self) -> Option<TimeRange> {
        [self.window_trace.as_ref(), self.layers_trace.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(Trace::time_range)
            .reduce(|a, b| TimeRange {
                start: a.start.min(b.start),
                end: a.end.max(b.end),
            })
    }

    fn slice(&self, range: TimeRange) -> Self {
        Self {
            window_trace: self.window_trace.as_ref().map(|t| t.slice(range)),
            layers_trace: self.layers_trace.as_ref().map(|t| t.slice(range)),
            tags: self
                .tags
                .iter()
                .filter(|t| range.contains(t.timestamp))
                .cloned()
                .collect(),
            transitions: self
                .transitions
                .iter()
                .filter(|t| t.overlaps(&range))
                .cloned()
                .collect(),
        }
    }
}

//! Assertion chains: ordered predicate segments evaluated as an automaton.
//!
//! The automaton keeps an index into the segment list. Each entry is offered
//! to the current segment; a rejected entry moves the index forward and is
//! offered again to the next segment. Moving past a mandatory segment that
//! never accepted an entry fails the chain, as does running out of segments
//! with an entry still unaccepted.

use tracing::debug;

use crate::domain::errors::{ChainError, FlickerError, FlickerResult};
use crate::domain::models::component::ComponentMatcher;
use crate::domain::models::fact::Fact;
use crate::domain::models::snapshot::{Snapshot, TraceKind};
use crate::domain::models::trace::Trace;

use super::predicates::{Coverage, EntryContext, Outcome, Predicate, RegionTarget};

/// Conjunction of predicates, optionally skippable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    predicates: Vec<Predicate>,
    optional: bool,
}

impl Segment {
    /// Predicates that must all hold.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Whether the automaton may move past this segment unsatisfied.
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Description used in failure reports, e.g. `isVisible(Layer#7)`.
    pub fn describe(&self, kind: TraceKind) -> String {
        let body = self
            .predicates
            .iter()
            .map(|p| p.describe(kind))
            .collect::<Vec<_>>()
            .join(" and ");
        if self.optional {
            format!("optional({body})")
        } else {
            body
        }
    }

    /// Identifier of every component the segment refers to.
    fn component_facts(&self, kind: TraceKind) -> Vec<Fact> {
        let mut facts: Vec<Fact> = Vec::new();
        for component in self.predicates.iter().flat_map(Predicate::components) {
            let fact = Fact::new("component", component.identifier(kind));
            if !facts.contains(&fact) {
                facts.push(fact);
            }
        }
        facts
    }

    fn evaluate(&self, ctx: &EntryContext<'_>) -> Outcome {
        let mut facts = Vec::new();
        let mut satisfied = true;
        for predicate in &self.predicates {
            let outcome = predicate.evaluate(ctx);
            satisfied &= outcome.satisfied;
            facts.extend(outcome.facts);
        }
        Outcome { satisfied, facts }
    }
}

/// Which entries of the trace a chain is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryScope {
    /// Every entry, in order.
    #[default]
    All,
    /// Only the first entry ("at start").
    First,
    /// Only the last entry ("at end").
    Last,
}

/// An immutable, validated list of segments bound to one trace kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionChain {
    name: String,
    kind: TraceKind,
    scope: EntryScope,
    segments: Vec<Segment>,
}

impl AssertionChain {
    /// Assertion name reported on failure.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trace kind the chain reads.
    pub const fn kind(&self) -> TraceKind {
        self.kind
    }

    /// Which entries of that trace are evaluated.
    pub const fn scope(&self) -> EntryScope {
        self.scope
    }

    /// Segments in evaluation order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Evaluate over the entries of `trace` selected by the chain's scope.
    pub fn evaluate(&self, trace: &Trace) -> FlickerResult<()> {
        let entries = trace.snapshots();
        let scoped = match self.scope {
            EntryScope::All => entries,
            EntryScope::First => &entries[..entries.len().min(1)],
            EntryScope::Last => &entries[entries.len().saturating_sub(1)..],
        };
        self.evaluate_entries(scoped)
    }

    /// Run the automaton over an ordered entry sequence.
    pub fn evaluate_entries(&self, entries: &[Snapshot]) -> FlickerResult<()> {
        let mut state = 0;
        let mut satisfied = vec![false; self.segments.len()];

        for index in 0..entries.len() {
            let ctx = EntryContext::at(entries, index);
            let timestamp = ctx.current.timestamp;
            loop {
                let segment = &self.segments[state];
                let outcome = segment.evaluate(&ctx);
                if outcome.satisfied {
                    satisfied[state] = true;
                    break;
                }
                if !satisfied[state] && !segment.optional {
                    return Err(FlickerError::SegmentNeverSatisfied {
                        assertion: self.name.clone(),
                        segment: segment.describe(self.kind),
                        timestamp: Some(timestamp),
                        facts: outcome.facts,
                    });
                }
                if state + 1 == self.segments.len() {
                    return Err(FlickerError::ChainExhausted {
                        assertion: self.name.clone(),
                        segment: segment.describe(self.kind),
                        timestamp,
                        facts: outcome.facts,
                    });
                }
                debug!(
                    assertion = %self.name,
                    from = state,
                    to = state + 1,
                    timestamp,
                    "advancing assertion segment"
                );
                state += 1;
            }
        }

        let trailing = self
            .segments
            .iter()
            .zip(&satisfied)
            .skip(state)
            .find(|(segment, done)| !segment.optional && !**done);
        if let Some((segment, _)) = trailing {
            let mut facts = segment.component_facts(self.kind);
            facts.push(Fact::new("entries", entries.len()));
            return Err(FlickerError::SegmentNeverSatisfied {
                assertion: self.name.clone(),
                segment: segment.describe(self.kind),
                timestamp: entries.last().map(|s| s.timestamp),
                facts,
            });
        }
        Ok(())
    }
}

/// Accumulates predicates into segments and finalizes an [`AssertionChain`].
///
/// Predicates added between two `then()` calls form one segment and must all
/// hold for an entry to be accepted.
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    name: String,
    kind: TraceKind,
    scope: EntryScope,
    segments: Vec<Segment>,
    pending: Vec<Predicate>,
    pending_optional: bool,
    empty_segment: Option<usize>,
    dangling_optional: Option<usize>,
}

impl ChainBuilder {
    /// Empty builder for a chain over `kind` entries.
    pub fn new(name: impl Into<String>, kind: TraceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            scope: EntryScope::All,
            segments: Vec::new(),
            pending: Vec::new(),
            pending_optional: false,
            empty_segment: None,
            dangling_optional: None,
        }
    }

    /// Evaluate only the first entry.
    #[must_use]
    pub const fn at_start(mut self) -> Self {
        self.scope = EntryScope::First;
        self
    }

    /// Evaluate only the last entry.
    #[must_use]
    pub const fn at_end(mut self) -> Self {
        self.scope = EntryScope::Last;
        self
    }

    /// Add any predicate to the pending segment.
    #[must_use]
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.pending.push(predicate);
        self
    }

    /// Some matched entity is visible.
    #[must_use]
    pub fn is_visible(self, component: ComponentMatcher) -> Self {
        self.with(Predicate::visible(component))
    }

    /// Visible, or replaced by a splash screen / snapshot starting window.
    #[must_use]
    pub fn is_visible_or_splash(self, component: ComponentMatcher) -> Self {
        self.with(Predicate::Visible {
            component,
            allow_splash: true,
        })
    }

    /// No matched entity is visible.
    #[must_use]
    pub fn is_invisible(self, component: ComponentMatcher) -> Self {
        self.with(Predicate::invisible(component))
    }

    /// Compare the component's visible region with `target`.
    #[must_use]
    pub fn covers(self, component: ComponentMatcher, relation: Coverage, target: RegionTarget) -> Self {
        self.with(Predicate::Coverage {
            component,
            relation,
            target,
        })
    }

    /// `component` is drawn strictly above `other`.
    #[must_use]
    pub fn is_above(self, component: ComponentMatcher, other: ComponentMatcher) -> Self {
        self.with(Predicate::Above { component, other })
    }

    /// `component` is drawn strictly below `other`.
    #[must_use]
    pub fn is_below(self, component: ComponentMatcher, other: ComponentMatcher) -> Self {
        self.with(Predicate::Below { component, other })
    }

    /// The visible region never shrinks between consecutive entries.
    #[must_use]
    pub fn region_grows(self, component: ComponentMatcher) -> Self {
        self.with(Predicate::RegionGrows { component })
    }

    /// Nothing is visible for a single entry only.
    #[must_use]
    pub fn shown_more_than_one_consecutive_entry(self) -> Self {
        self.shown_more_than_one_consecutive_entry_ignoring(Vec::new())
    }

    /// Like [`shown_more_than_one_consecutive_entry`](Self::shown_more_than_one_consecutive_entry),
    /// exempting entities selected by `ignore`.
    #[must_use]
    pub fn shown_more_than_one_consecutive_entry_ignoring(self, ignore: Vec<ComponentMatcher>) -> Self {
        self.with(Predicate::NoSingleEntryFlicker { ignore })
    }

    /// The component spans the display width at its top edge.
    #[must_use]
    pub fn is_at_top_of_display(self, component: ComponentMatcher) -> Self {
        self.with(Predicate::AtTopOfDisplay { component })
    }

    /// The component is the topmost visible app.
    #[must_use]
    pub fn is_on_top(self, component: ComponentMatcher) -> Self {
        self.with(Predicate::OnTop {
            component,
            allow_splash: false,
        })
    }

    /// The component, a splash screen or a snapshot starting window is the topmost visible app.
    #[must_use]
    pub fn is_on_top_or_splash(self, component: ComponentMatcher) -> Self {
        self.with(Predicate::OnTop {
            component,
            allow_splash: true,
        })
    }

    /// The component is not the topmost visible app.
    #[must_use]
    pub fn is_not_on_top(self, component: ComponentMatcher) -> Self {
        self.with(Predicate::NotOnTop { component })
    }

    /// Visible entities cover the whole display.
    #[must_use]
    pub fn entire_screen_covered(self) -> Self {
        self.with(Predicate::EntireScreenCovered)
    }

    /// Mark the pending segment optional.
    ///
    /// Must follow at least one predicate of that segment; `build` rejects
    /// an `optional()` with nothing pending.
    #[must_use]
    pub fn optional(mut self) -> Self {
        if self.pending.is_empty() {
            self.dangling_optional.get_or_insert(self.segments.len());
        }
        self.pending_optional = true;
        self
    }

    /// Close the pending segment and start a new one.
    #[must_use]
    pub fn then(mut self) -> Self {
        if self.pending.is_empty() {
            self.empty_segment.get_or_insert(self.segments.len());
        } else {
            self.close_pending();
        }
        self
    }

    fn close_pending(&mut self) {
        self.segments.push(Segment {
            predicates: std::mem::take(&mut self.pending),
            optional: std::mem::take(&mut self.pending_optional),
        });
    }

    /// Close the pending segment and validate the chain.
    pub fn build(mut self) -> Result<AssertionChain, ChainError> {
        if let Some(index) = self.empty_segment {
            return Err(ChainError::EmptySegment {
                assertion: self.name,
                index,
            });
        }
        if let Some(index) = self.dangling_optional {
            return Err(ChainError::OptionalWithoutPredicate {
                assertion: self.name,
                index,
            });
        }
        if !self.pending.is_empty() {
            self.close_pending();
        }
        if self.segments.is_empty() {
            return Err(ChainError::EmptyChain(self.name));
        }
        Ok(AssertionChain {
            name: self.name,
            kind: self.kind,
            scope: self.scope,
            segments: self.segments,
        })
    }
}

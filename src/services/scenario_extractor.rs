//! Scenario extraction: cutting a recording into bounded scenario instances.

use tracing::{debug, warn};

use crate::domain::errors::{FlickerError, FlickerResult};
use crate::domain::models::scenario::{ScenarioInstance, ScenarioType};
use crate::domain::models::tag::occurrences;
use crate::domain::models::trace::TimeRange;
use crate::domain::models::transition::Transition;
use crate::domain::ports::TraceReader;

use super::transition_filters::{TransitionFilter, TransitionMerge};

/// An occurrence that could not be turned into a scenario instance.
#[derive(Debug, Clone)]
pub struct ExtractionFailure {
    /// Scenario being extracted.
    pub scenario_type: ScenarioType,
    /// Zero-based index of the tag occurrence.
    pub occurrence: usize,
    /// Why no instance was produced.
    pub error: FlickerError,
}

/// Instances produced by an extraction pass plus per-occurrence failures.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Instances in extraction order.
    pub instances: Vec<ScenarioInstance>,
    /// Occurrences that were skipped.
    pub failures: Vec<ExtractionFailure>,
}

impl ExtractionReport {
    /// Moves `other`'s instances and failures into this report.
    pub fn append(&mut self, other: Self) {
        self.instances.extend(other.instances);
        self.failures.extend(other.failures);
    }

    /// Whether no occurrence failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Produces scenario instances from a recording.
pub trait ScenarioExtractor: Send + Sync {
    /// Extracts every instance this extractor recognizes. Bad occurrences are reported, not raised.
    fn extract(&self, reader: &dyn TraceReader) -> ExtractionReport;
}

/// Wraps the whole recording as one instance.
#[derive(Debug, Clone)]
pub struct EntireTraceExtractor {
    scenario_type: ScenarioType,
}

impl EntireTraceExtractor {
    /// Extractor for `scenario_type` over the whole recording.
    pub const fn new(scenario_type: ScenarioType) -> Self {
        Self { scenario_type }
    }
}

impl ScenarioExtractor for EntireTraceExtractor {
    fn extract(&self, reader: &dyn TraceReader) -> ExtractionReport {
        let mut report = ExtractionReport::default();
        match reader.time_range() {
            Some(range) => report.instances.push(ScenarioInstance::new(
                format!("{}#0", self.scenario_type),
                self.scenario_type,
                range,
                None,
            )),
            None => debug!(scenario = %self.scenario_type, "no snapshot traces; nothing to wrap"),
        }
        report
    }
}

/// Finds instances bounded by occurrences of a tag, each matched to the
/// transitions that overlap it.
#[derive(Debug, Clone)]
pub struct TaggedExtractor {
    scenario_type: ScenarioType,
    tag: String,
    filter: TransitionFilter,
    merge: Option<TransitionMerge>,
    associated_transition_required: bool,
}

impl TaggedExtractor {
    /// Extractor pairing `tag` occurrences with transitions accepted by `filter`.
    pub fn new(scenario_type: ScenarioType, tag: impl Into<String>, filter: TransitionFilter) -> Self {
        Self {
            scenario_type,
            tag: tag.into(),
            filter,
            merge: None,
            associated_transition_required: true,
        }
    }

    /// Combines several candidate transitions with `merge`.
    #[must_use]
    pub const fn with_merge(mut self, merge: TransitionMerge) -> Self {
        self.merge = Some(merge);
        self
    }

    /// Whether an occurrence without a transition is a failure.
    #[must_use]
    pub const fn transition_required(mut self, required: bool) -> Self {
        self.associated_transition_required = required;
        self
    }

    /// Tag name being paired.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn associated_transition(
        &self,
        reader: &dyn TraceReader,
        range: TimeRange,
    ) -> Option<Transition> {
        let candidates: Vec<Transition> = reader
            .transitions()
            .iter()
            .filter(|t| t.overlaps(&range) && self.filter.accepts(t))
            .cloned()
            .collect();
        match self.merge {
            Some(merge) => merge.apply(candidates),
            None => {
                if candidates.len() > 1 {
                    debug!(
                        scenario = %self.scenario_type,
                        candidates = candidates.len(),
                        "several transitions match tag occurrence; keeping earliest"
                    );
                }
                TransitionMerge::First.apply(candidates)
            }
        }
    }
}

impl ScenarioExtractor for TaggedExtractor {
    fn extract(&self, reader: &dyn TraceReader) -> ExtractionReport {
        let mut report = ExtractionReport::default();
        let trace_range = reader.time_range();
        let tagged = occurrences(reader.tags())
            .into_iter()
            .filter(|occurrence| occurrence.name == self.tag);

        for (index, occurrence) in tagged.enumerate() {
            match self.instance_for(index, occurrence.range, reader, trace_range) {
                Ok(instance) => report.instances.push(instance),
                Err(error) => {
                    warn!(
                        scenario = %self.scenario_type,
                        occurrence = index,
                        error = %error,
                        "failed to extract scenario occurrence"
                    );
                    report.failures.push(ExtractionFailure {
                        scenario_type: self.scenario_type,
                        occurrence: index,
                        error,
                    });
                }
            }
        }
        report
    }
}

impl TaggedExtractor {
    fn instance_for(
        &self,
        index: usize,
        tag_range: TimeRange,
        reader: &dyn TraceReader,
        trace_range: Option<TimeRange>,
    ) -> FlickerResult<ScenarioInstance> {
        let transition = self.associated_transition(reader, tag_range);
        if transition.is_none() && self.associated_transition_required {
            return Err(FlickerError::MissingTransition {
                scenario: self.scenario_type.to_string(),
                tag: self.tag.clone(),
                start: tag_range.start,
                end: tag_range.end,
            });
        }

        let mut range = transition.as_ref().map_or(tag_range, |t| TimeRange {
            start: tag_range.start.min(t.start),
            end: tag_range.end.max(t.end),
        });
        if let Some(bounds) = trace_range {
            let clamped = range.intersect(&bounds);
            // An instance must cover at least one recorded instant.
            if clamped.is_empty() {
                return Err(FlickerError::OutsideTrace {
                    scenario: self.scenario_type.to_string(),
                    tag: self.tag.clone(),
                    start: range.start,
                    end: range.end,
                    trace_start: bounds.start,
                    trace_end: bounds.end,
                });
            }
            range = clamped;
        }

        Ok(ScenarioInstance::new(
            format!("{}#{index}", self.scenario_type),
            self.scenario_type,
            range,
            transition,
        ))
    }
}

/// Runs several extractors in order and concatenates their reports.
#[derive(Default)]
pub struct CombinedExtractor {
    extractors: Vec<Box<dyn ScenarioExtractor>>,
}

impl CombinedExtractor {
    /// An extractor with no children.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an extractor.
    #[must_use]
    pub fn with(mut self, extractor: impl ScenarioExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Appends a boxed extractor.
    pub fn push(&mut self, extractor: Box<dyn ScenarioExtractor>) {
        self.extractors.push(extractor);
    }

    /// Number of child extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Whether there are no child extractors.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl ScenarioExtractor for CombinedExtractor {
    fn extract(&self, reader: &dyn TraceReader) -> ExtractionReport {
        let mut report = ExtractionReport::default();
        for extractor in &self.extractors {
            report.append(extractor.extract(reader));
        }
        report
    }
}

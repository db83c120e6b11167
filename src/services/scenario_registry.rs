//! Explicit list of known scenarios with their extractors and assertion sets.

use crate::domain::errors::{FlickerError, FlickerResult};
use crate::domain::models::config::ScenarioSelection;
use crate::domain::models::scenario::ScenarioType;

use super::assertion_templates::{AssertionSet, AssertionTemplate};
use super::scenario_extractor::{CombinedExtractor, EntireTraceExtractor, ScenarioExtractor, TaggedExtractor};
use super::transition_filters::{TransitionFilter, TransitionMerge};

/// How instances of a scenario are found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorConfig {
    /// One instance spanning the whole recording.
    EntireTrace,
    /// One instance per tag occurrence.
    Tagged {
        /// Tag name to pair.
        tag: String,
        /// Which transitions may be associated.
        filter: TransitionFilter,
        /// How several candidates are combined; `None` keeps the first.
        merge: Option<TransitionMerge>,
        /// Whether an occurrence without a transition is a failure.
        associated_transition_required: bool,
    },
}

impl ExtractorConfig {
    fn tagged(tag: &str, filter: TransitionFilter) -> Self {
        Self::Tagged {
            tag: tag.to_string(),
            filter,
            merge: None,
            associated_transition_required: true,
        }
    }
}

/// One registered scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Scenario type.
    pub scenario_type: ScenarioType,
    /// Whether the scenario runs.
    pub enabled: bool,
    /// How instances are found.
    pub extractor: ExtractorConfig,
    /// Assertions generated for each instance.
    pub assertion_set: AssertionSet,
}

impl ScenarioConfig {
    const fn new(scenario_type: ScenarioType, extractor: ExtractorConfig, assertion_set: AssertionSet) -> Self {
        Self {
            scenario_type,
            enabled: true,
            extractor,
            assertion_set,
        }
    }

    /// Extractor for this scenario.
    pub fn build_extractor(&self) -> Box<dyn ScenarioExtractor> {
        match &self.extractor {
            ExtractorConfig::EntireTrace => Box::new(EntireTraceExtractor::new(self.scenario_type)),
            ExtractorConfig::Tagged {
                tag,
                filter,
                merge,
                associated_transition_required,
            } => {
                let mut extractor = TaggedExtractor::new(self.scenario_type, tag.clone(), *filter)
                    .transition_required(*associated_transition_required);
                if let Some(merge) = merge {
                    extractor = extractor.with_merge(*merge);
                }
                Box::new(extractor)
            }
        }
    }
}

/// Ordered scenario configuration, passed explicitly to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRegistry {
    scenarios: Vec<ScenarioConfig>,
}

impl Default for ScenarioRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScenarioRegistry {
    /// Registry over an explicit scenario list.
    pub fn new(scenarios: Vec<ScenarioConfig>) -> Self {
        Self { scenarios }
    }

    /// The scenarios shipped with the service.
    pub fn builtin() -> Self {
        use ScenarioType as T;
        use TransitionFilter as F;

        let quick_switch = ExtractorConfig::Tagged {
            tag: "CUJ_LAUNCHER_QUICK_SWITCH".to_string(),
            filter: F::QuickSwitch,
            merge: Some(TransitionMerge::QuickSwitch),
            associated_transition_required: true,
        };
        let screenshot = ExtractorConfig::Tagged {
            tag: "CUJ_TAKE_SCREENSHOT".to_string(),
            filter: F::Any,
            merge: None,
            associated_transition_required: false,
        };

        Self::new(vec![
            ScenarioConfig::new(T::Common, ExtractorConfig::EntireTrace, AssertionSet::Common),
            ScenarioConfig::new(
                T::LauncherAppLaunchFromIcon,
                ExtractorConfig::tagged("CUJ_LAUNCHER_APP_LAUNCH_FROM_ICON", F::OpenApp),
                AssertionSet::AppLaunchFromHome,
            ),
            ScenarioConfig::new(
                T::AppCloseToHome,
                ExtractorConfig::tagged("CUJ_LAUNCHER_APP_CLOSE_TO_HOME", F::CloseAppToLauncher),
                AssertionSet::AppCloseToHome,
            ),
            ScenarioConfig::new(
                T::NotificationAppStart,
                ExtractorConfig::tagged("CUJ_NOTIFICATION_APP_START", F::OpenApp),
                AssertionSet::AppLaunchFromNotification,
            ),
            ScenarioConfig::new(T::LauncherQuickSwitch, quick_switch, AssertionSet::LauncherQuickSwitch),
            ScenarioConfig::new(
                T::LauncherAppLaunchFromRecents,
                ExtractorConfig::tagged("CUJ_LAUNCHER_APP_LAUNCH_FROM_RECENTS", F::OpenApp),
                AssertionSet::AppLaunchFromHome,
            ),
            ScenarioConfig::new(
                T::LauncherAppSwipeToRecents,
                ExtractorConfig::tagged("CUJ_LAUNCHER_APP_SWIPE_TO_RECENTS", F::Any),
                AssertionSet::AppSwipeToRecents,
            ),
            ScenarioConfig {
                enabled: false,
                ..ScenarioConfig::new(T::TakeScreenshot, screenshot, AssertionSet::Common)
            },
        ])
    }

    /// All registered scenarios.
    pub fn scenarios(&self) -> &[ScenarioConfig] {
        &self.scenarios
    }

    /// Scenarios that will run.
    pub fn enabled(&self) -> impl Iterator<Item = &ScenarioConfig> {
        self.scenarios.iter().filter(|s| s.enabled)
    }

    /// Configuration of one scenario type.
    pub fn get(&self, scenario_type: ScenarioType) -> FlickerResult<&ScenarioConfig> {
        self.scenarios
            .iter()
            .find(|s| s.scenario_type == scenario_type)
            .ok_or_else(|| {
                FlickerError::Configuration(format!("No scenario registered for {scenario_type}"))
            })
    }

    /// Enable exactly `types`, disabling everything else.
    pub fn restrict_to(&self, types: &[ScenarioType]) -> FlickerResult<Self> {
        for t in types {
            self.get(*t)?;
        }
        let scenarios = self
            .scenarios
            .iter()
            .map(|s| ScenarioConfig {
                enabled: types.contains(&s.scenario_type),
                ..s.clone()
            })
            .collect();
        Ok(Self { scenarios })
    }

    /// Apply configured allow/deny lists by scenario name.
    pub fn with_selection(&self, selection: &ScenarioSelection) -> FlickerResult<Self> {
        let parse = |names: &[String]| -> FlickerResult<Vec<ScenarioType>> {
            names.iter().map(|n| n.parse::<ScenarioType>()).collect()
        };
        let enabled = parse(&selection.enabled)?;
        let disabled = parse(&selection.disabled)?;

        let mut registry = if enabled.is_empty() {
            self.clone()
        } else {
            self.restrict_to(&enabled)?
        };
        for t in disabled {
            self.get(t)?;
            for s in registry.scenarios.iter_mut().filter(|s| s.scenario_type == t) {
                s.enabled = false;
            }
        }
        Ok(registry)
    }

    /// Templates bound to a scenario type.
    pub fn templates_for(&self, scenario_type: ScenarioType) -> FlickerResult<Vec<AssertionTemplate>> {
        self.get(scenario_type)?.assertion_set.templates()
    }

    /// One extractor running every enabled scenario in registry order.
    pub fn extractor(&self) -> CombinedExtractor {
        let mut combined = CombinedExtractor::new();
        for scenario in self.enabled() {
            combined.push(scenario.build_extractor());
        }
        combined
    }
}

//! Scenario types and bounded scenario instances.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::component::{ComponentMatcher, DynamicComponent};
use super::trace::TimeRange;
use super::transition::Transition;
use crate::domain::errors::{FlickerError, FlickerResult};

/// Kind of user journey a scenario instance represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioType {
    /// The entire trace, for always-on checks.
    Common,
    /// An app launched by tapping its launcher icon.
    LauncherAppLaunchFromIcon,
    /// An app closed by swiping back to the home screen.
    AppCloseToHome,
    /// An app launched from a notification.
    NotificationAppStart,
    /// A quick switch between apps from the gesture bar.
    LauncherQuickSwitch,
    /// An app brought back from the recents overview.
    LauncherAppLaunchFromRecents,
    /// An app swiped up into recents.
    LauncherAppSwipeToRecents,
    /// A screenshot capture.
    TakeScreenshot,
}

impl ScenarioType {
    /// Every scenario type, in registry order.
    pub const ALL: [Self; 8] = [
        Self::Common,
        Self::LauncherAppLaunchFromIcon,
        Self::AppCloseToHome,
        Self::NotificationAppStart,
        Self::LauncherQuickSwitch,
        Self::LauncherAppLaunchFromRecents,
        Self::LauncherAppSwipeToRecents,
        Self::TakeScreenshot,
    ];

    /// Stable upper-case name used in configs, tags and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "COMMON",
            Self::LauncherAppLaunchFromIcon => "LAUNCHER_APP_LAUNCH_FROM_ICON",
            Self::AppCloseToHome => "APP_CLOSE_TO_HOME",
            Self::NotificationAppStart => "NOTIFICATION_APP_START",
            Self::LauncherQuickSwitch => "LAUNCHER_QUICK_SWITCH",
            Self::LauncherAppLaunchFromRecents => "LAUNCHER_APP_LAUNCH_FROM_RECENTS",
            Self::LauncherAppSwipeToRecents => "LAUNCHER_APP_SWIPE_TO_RECENTS",
            Self::TakeScreenshot => "TAKE_SCREENSHOT",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScenarioType {
    type Err = FlickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FlickerError::Configuration(format!("Unknown scenario type: {s}")))
    }
}

/// One bounded occurrence of a scenario.
///
/// Dynamic components are resolved against the associated transition when
/// the instance is built and never change afterwards.
#[derive(Debug, Clone)]
pub struct ScenarioInstance {
    id: String,
    scenario_type: ScenarioType,
    range: TimeRange,
    associated_transition: Option<Transition>,
    resolved: BTreeMap<DynamicComponent, FlickerResult<ComponentMatcher>>,
}

impl ScenarioInstance {
    /// Builds an instance and resolves every dynamic component once.
    pub fn new(
        id: impl Into<String>,
        scenario_type: ScenarioType,
        range: TimeRange,
        associated_transition: Option<Transition>,
    ) -> Self {
        let resolved = DynamicComponent::ALL
            .into_iter()
            .map(|c| (c, c.resolve(associated_transition.as_ref())))
            .collect();
        Self {
            id: id.into(),
            scenario_type,
            range,
            associated_transition,
            resolved,
        }
    }

    /// Unique id, `<TYPE>#<occurrence>`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Scenario type.
    pub const fn scenario_type(&self) -> ScenarioType {
        self.scenario_type
    }

    /// Half-open time range the assertions are evaluated over.
    pub const fn range(&self) -> TimeRange {
        self.range
    }

    /// The transition the instance was matched to, if any.
    pub const fn associated_transition(&self) -> Option<&Transition> {
        self.associated_transition.as_ref()
    }

    /// The cached resolution of a dynamic component.
    pub fn component(&self, component: DynamicComponent) -> FlickerResult<ComponentMatcher> {
        self.resolved
            .get(&component)
            .cloned()
            .unwrap_or_else(|| component.resolve(self.associated_transition.as_ref()))
    }
}

/// Serializable view of an instance for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Instance id.
    pub id: String,
    /// Scenario type.
    pub scenario_type: ScenarioType,
    /// Start of the range, inclusive.
    pub start: i64,
    /// End of the range, exclusive.
    pub end: i64,
    /// Id of the associated transition.
    pub transition_id: Option<u64>,
}

impl From<&ScenarioInstance> for ScenarioSummary {
    fn from(instance: &ScenarioInstance) -> Self {
        Self {
            id: instance.id.clone(),
            scenario_type: instance.scenario_type,
            start: instance.range.start,
            end: instance.range.end,
            transition_id: instance.associated_transition.as_ref().map(|t| t.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::transition::{Change, ChangeType, TransitionType};

    #[test]
    fn test_scenario_type_parse_roundtrip() {
        for t in ScenarioType::ALL {
            assert_eq!(t.as_str().parse::<ScenarioType>().unwrap(), t);
        }
        assert!("NOPE".parse::<ScenarioType>().is_err());
    }

    #[test]
    fn test_instance_resolves_components_at_construction() {
        let transition = Transition::new(
            3,
            TransitionType::Open,
            10,
            20,
            vec![Change::new(ChangeType::Open, 1, 11)],
        );
        let instance = ScenarioInstance::new(
            "LAUNCHER_APP_LAUNCH_FROM_ICON#0",
            ScenarioType::LauncherAppLaunchFromIcon,
            TimeRange { start: 10, end: 20 },
            Some(transition),
        );
        assert_eq!(
            instance.component(DynamicComponent::OpeningApp).unwrap(),
            ComponentMatcher::full_id(1, 11)
        );
        assert!(instance.component(DynamicComponent::ClosingApp).is_err());
    }

    #[test]
    fn test_summary_carries_transition_id() {
        let instance = ScenarioInstance::new(
            "COMMON#0",
            ScenarioType::Common,
            TimeRange { start: 0, end: 5 },
            None,
        );
        let summary = ScenarioSummary::from(&instance);
        assert_eq!(summary.transition_id, None);
        assert_eq!(summary.end, 5);
    }
}

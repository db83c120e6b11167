//! Binds assertion templates to scenario instances.

use tracing::debug;

use crate::domain::errors::FlickerResult;
use crate::domain::models::assertion_result::Stability;
use crate::domain::models::config::StabilityOverrides;
use crate::domain::models::scenario::{ScenarioInstance, ScenarioType};
use crate::domain::models::snapshot::TraceKind;
use crate::domain::models::trace::TimeRange;

use super::assertion_chain::AssertionChain;
use super::assertion_templates::AssertionTemplate;
use super::scenario_registry::ScenarioRegistry;

/// A template bound to one scenario instance, ready to run.
///
/// Binding failures (an unresolvable dynamic component) are kept here and
/// reported as a failed result when the assertion runs.
#[derive(Debug, Clone)]
pub struct ScenarioAssertion {
    /// Assertion name, e.g. `AppLayerBecomesVisible(OPENING_APP)`.
    pub name: String,
    /// Instance the assertion is bound to.
    pub scenario_id: String,
    /// Type of that instance.
    pub scenario_type: ScenarioType,
    /// Time range the chain is evaluated over.
    pub range: TimeRange,
    /// Effective stability after overrides.
    pub stability: Stability,
    /// Trace the chain reads.
    pub trace_kind: TraceKind,
    /// Bound chain, or the error that prevented binding.
    pub chain: FlickerResult<AssertionChain>,
}

/// Produces scenario assertions from the registry's assertion sets.
#[derive(Debug, Clone, Default)]
pub struct AssertionFactory {
    registry: ScenarioRegistry,
    overrides: StabilityOverrides,
}

impl AssertionFactory {
    /// Factory over `registry` with no overrides.
    pub fn new(registry: ScenarioRegistry) -> Self {
        Self {
            registry,
            overrides: StabilityOverrides::default(),
        }
    }

    /// Forces listed assertions to a stability class.
    #[must_use]
    pub fn with_overrides(mut self, overrides: StabilityOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Registry providing assertion sets.
    pub const fn registry(&self) -> &ScenarioRegistry {
        &self.registry
    }

    fn stability_for(&self, template: &AssertionTemplate, name: &str) -> Stability {
        let kind = template.kind().as_str();
        let listed = |names: &[String]| names.iter().any(|n| n == name || n == kind);
        if listed(&self.overrides.blocking) {
            Stability::Blocking
        } else if listed(&self.overrides.non_blocking) {
            Stability::NonBlocking
        } else {
            template.stability()
        }
    }

    /// Bind every template of the instance's scenario.
    ///
    /// Fails only when the scenario type has no registered assertion set.
    pub fn generate(&self, instance: &ScenarioInstance) -> FlickerResult<Vec<ScenarioAssertion>> {
        let templates = self.registry.templates_for(instance.scenario_type())?;
        let lookup = |c| instance.component(c);

        let assertions: Vec<ScenarioAssertion> = templates
            .iter()
            .map(|template| {
                let name = template.name();
                ScenarioAssertion {
                    stability: self.stability_for(template, &name),
                    scenario_id: instance.id().to_string(),
                    scenario_type: instance.scenario_type(),
                    range: instance.range(),
                    trace_kind: template.trace_kind(),
                    chain: template.build_chain(&lookup),
                    name,
                }
            })
            .collect();

        debug!(
            scenario = %instance.id(),
            assertions = assertions.len(),
            unbound = assertions.iter().filter(|a| a.chain.is_err()).count(),
            "generated assertions"
        );
        Ok(assertions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::transition::{Change, ChangeType, Transition, TransitionType};

    fn launch_instance(changes: Vec<Change>) -> ScenarioInstance {
        ScenarioInstance::new(
            "LAUNCHER_APP_LAUNCH_FROM_ICON#0",
            ScenarioType::LauncherAppLaunchFromIcon,
            TimeRange { start: 0, end: 100 },
            Some(Transition::new(1, TransitionType::Open, 0, 100, changes)),
        )
    }

    #[test]
    fn test_generate_binds_dynamic_components() {
        let factory = AssertionFactory::new(ScenarioRegistry::builtin());
        let assertions = factory
            .generate(&launch_instance(vec![Change::new(ChangeType::Open, 1, 11)]))
            .unwrap();
        assert!(assertions.iter().all(|a| a.chain.is_ok()));
        assert!(assertions
            .iter()
            .any(|a| a.name == "AppLayerIsVisibleAtEnd(OPENING_APP)"));
    }

    #[test]
    fn test_binding_failure_is_kept() {
        let factory = AssertionFactory::new(ScenarioRegistry::builtin());
        let assertions = factory.generate(&launch_instance(vec![])).unwrap();
        let unbound: Vec<&ScenarioAssertion> =
            assertions.iter().filter(|a| a.chain.is_err()).collect();
        assert!(!unbound.is_empty());
        assert!(unbound.iter().all(|a| a.name.contains("OPENING_APP")));
    }

    #[test]
    fn test_stability_overrides() {
        let factory = AssertionFactory::new(ScenarioRegistry::builtin()).with_overrides(
            StabilityOverrides {
                blocking: vec!["EntireScreenCoveredAlways".to_string()],
                non_blocking: vec!["AppLayerIsVisibleAtEnd(OPENING_APP)".to_string()],
            },
        );
        let assertions = factory
            .generate(&launch_instance(vec![Change::new(ChangeType::Open, 1, 11)]))
            .unwrap();
        let find = |name: &str| assertions.iter().find(|a| a.name == name).unwrap().stability;
        assert_eq!(find("EntireScreenCoveredAlways"), Stability::Blocking);
        assert_eq!(find("AppLayerIsVisibleAtEnd(OPENING_APP)"), Stability::NonBlocking);
    }

    #[test]
    fn test_unregistered_scenario_is_configuration_error() {
        let factory = AssertionFactory::new(ScenarioRegistry::new(vec![]));
        let err = factory.generate(&launch_instance(vec![])).unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
    }
}

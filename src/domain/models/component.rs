//! Component matchers: logical references to entities inside a snapshot.
//!
//! A [`ComponentMatcher`] is a closed set of concrete strategies dispatched
//! by `match`. A [`ComponentReference`] is what assertion templates hold: it
//! may name a dynamic component that only becomes a concrete matcher once a
//! scenario instance (and its transition) is known.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::snapshot::{subtree_of, Entity, Snapshot, TraceKind};
use super::transition::{Change, ChangeType, Transition};
use crate::domain::errors::{FlickerError, FlickerResult};

/// Package/class pair matched against entity names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameMatcher {
    /// Package prefix; empty for system components.
    pub package_name: String,
    /// Class or surface name.
    pub class_name: String,
    /// Require the whole entity name to equal the identifier.
    #[serde(default)]
    pub exact: bool,
}

impl NameMatcher {
    /// Substring matcher for `package/class`.
    pub fn new(package_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            class_name: class_name.into(),
            exact: false,
        }
    }

    /// Matcher requiring the entity name to equal `package/class`.
    pub fn exact(package_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            exact: true,
            ..Self::new(package_name, class_name)
        }
    }

    /// `package/class`, or just `class` when the package is empty.
    pub fn identifier(&self) -> String {
        if self.package_name.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}/{}", self.package_name, self.class_name)
        }
    }

    /// Whether an entity name is selected by this matcher.
    pub fn matches_name(&self, name: &str) -> bool {
        let identifier = self.identifier();
        if self.exact {
            name == identifier
        } else {
            name.contains(&identifier)
        }
    }
}

/// Concrete strategy for selecting entities in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentMatcher {
    /// Only the entity with exactly this id.
    ExactId {
        /// Id used against window hierarchies.
        window_id: u64,
        /// Id used against layer hierarchies.
        layer_id: u64,
    },
    /// The entity with this id and its whole subtree.
    FullId {
        /// Id used against window hierarchies.
        window_id: u64,
        /// Id used against layer hierarchies.
        layer_id: u64,
    },
    /// Entities whose name contains (or equals) a package/class identifier.
    Name(NameMatcher),
    /// Union of two matchers.
    Or {
        /// First alternative.
        left: Box<ComponentMatcher>,
        /// Second alternative.
        right: Box<ComponentMatcher>,
    },
}

impl ComponentMatcher {
    /// Matcher for one entity, without descendants.
    pub const fn exact_id(window_id: u64, layer_id: u64) -> Self {
        Self::ExactId {
            window_id,
            layer_id,
        }
    }

    /// Matcher for one entity and its subtree.
    pub const fn full_id(window_id: u64, layer_id: u64) -> Self {
        Self::FullId {
            window_id,
            layer_id,
        }
    }

    /// Substring name matcher.
    pub fn name(package_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self::Name(NameMatcher::new(package_name, class_name))
    }

    /// Union of `self` and `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    const fn id_for(kind: TraceKind, window_id: u64, layer_id: u64) -> u64 {
        match kind {
            TraceKind::Window => window_id,
            TraceKind::Layer => layer_id,
        }
    }

    /// Entities of a `kind` hierarchy selected by this matcher, in input order.
    pub fn select<'a>(&self, kind: TraceKind, entities: &'a [Entity]) -> Vec<&'a Entity> {
        match self {
            Self::ExactId {
                window_id,
                layer_id,
            } => {
                let id = Self::id_for(kind, *window_id, *layer_id);
                entities.iter().filter(|e| e.id == id).collect()
            }
            Self::FullId {
                window_id,
                layer_id,
            } => subtree_of(entities, Self::id_for(kind, *window_id, *layer_id)),
            Self::Name(name) => entities
                .iter()
                .filter(|e| name.matches_name(&e.name))
                .collect(),
            Self::Or { left, right } => {
                let selected: HashSet<u64> = left
                    .select(kind, entities)
                    .into_iter()
                    .chain(right.select(kind, entities))
                    .map(|e| e.id)
                    .collect();
                entities
                    .iter()
                    .filter(|e| selected.contains(&e.id))
                    .collect()
            }
        }
    }

    /// Entities of `snapshot` selected by this matcher.
    pub fn matching<'a>(&self, snapshot: &'a Snapshot) -> Vec<&'a Entity> {
        self.select(snapshot.kind, &snapshot.entities)
    }

    /// Whether any entity of the set is selected.
    pub fn matches(&self, kind: TraceKind, entities: &[Entity]) -> bool {
        !self.select(kind, entities).is_empty()
    }

    /// Run `condition` over the selected entities.
    ///
    /// For `Or` the condition is applied to each side separately and is
    /// satisfied if either side satisfies it.
    pub fn check(
        &self,
        kind: TraceKind,
        entities: &[Entity],
        condition: &dyn Fn(&[&Entity]) -> bool,
    ) -> bool {
        match self {
            Self::Or { left, right } => {
                left.check(kind, entities, condition) || right.check(kind, entities, condition)
            }
            _ => condition(&self.select(kind, entities)),
        }
    }

    /// Name used in reports against window traces.
    pub fn window_identifier(&self) -> String {
        match self {
            Self::ExactId { window_id, .. } | Self::FullId { window_id, .. } => {
                format!("Window#{window_id:x}")
            }
            Self::Name(name) => name.identifier(),
            Self::Or { left, right } => {
                format!("({} or {})", left.window_identifier(), right.window_identifier())
            }
        }
    }

    /// Name used in reports against layer traces.
    pub fn layer_identifier(&self) -> String {
        match self {
            Self::ExactId { layer_id, .. } | Self::FullId { layer_id, .. } => {
                format!("Layer#{layer_id}")
            }
            Self::Name(name) => name.identifier(),
            Self::Or { left, right } => {
                format!("({} or {})", left.layer_identifier(), right.layer_identifier())
            }
        }
    }

    /// Report name for the given trace kind.
    pub fn identifier(&self, kind: TraceKind) -> String {
        match kind {
            TraceKind::Window => self.window_identifier(),
            TraceKind::Layer => self.layer_identifier(),
        }
    }
}

/// Well-known system component names: `(key, package, class)`.
const WELL_KNOWN: &[(&str, &str, &str)] = &[
    ("NAV_BAR", "", "NavigationBar0"),
    ("TASK_BAR", "", "Taskbar"),
    ("STATUS_BAR", "", "StatusBar"),
    ("NOTIFICATION_SHADE", "", "NotificationShade"),
    ("IME", "", "InputMethod"),
    ("IME_SNAPSHOT", "", "IME-snapshot-surface"),
    ("SPLASH_SCREEN", "", "Splash Screen"),
    ("SNAPSHOT", "", "SnapshotStartingWindow"),
    ("LETTERBOX", "", "Letterbox"),
    ("ROTATION", "", "RotationLayer"),
    ("SPLIT_DIVIDER", "", "StageCoordinatorSplitDivider"),
    ("WALLPAPER_BBQ_WRAPPER", "", "Wallpaper BBQ wrapper"),
    ("PIP_CONTENT_OVERLAY", "", "PipContentOverlay"),
    (
        "LAUNCHER",
        "com.google.android.apps.nexuslauncher",
        "com.google.android.apps.nexuslauncher.NexusLauncherActivity",
    ),
    ("SCREEN_DECOR_OVERLAY", "", "ScreenDecorOverlay"),
    ("BACK_SURFACE", "", "BackColorSurface"),
];

/// Look up a well-known system component by key (e.g. `"NAV_BAR"`).
pub fn well_known(key: &str) -> Option<ComponentMatcher> {
    WELL_KNOWN
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, package, class)| ComponentMatcher::name(*package, *class))
}

/// Keys of every well-known component.
pub fn well_known_keys() -> impl Iterator<Item = &'static str> {
    WELL_KNOWN.iter().map(|(k, _, _)| *k)
}

/// Components identified from a scenario's associated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DynamicComponent {
    /// The entity whose change is OPEN or TO_FRONT.
    OpeningApp,
    /// The entity whose change is CLOSE or TO_BACK.
    ClosingApp,
    /// The entity whose change is CHANGE.
    ChangingApp,
}

impl DynamicComponent {
    /// Every dynamic role.
    pub const ALL: [Self; 3] = [Self::OpeningApp, Self::ClosingApp, Self::ChangingApp];

    /// Placeholder key used in templates and reports.
    pub const fn key(self) -> &'static str {
        match self {
            Self::OpeningApp => "OPENING_APP",
            Self::ClosingApp => "CLOSING_APP",
            Self::ChangingApp => "CHANGING_APP",
        }
    }

    /// Inverse of [`key`](Self::key).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    const fn qualifies(self, change_type: ChangeType) -> bool {
        match self {
            Self::OpeningApp => change_type.is_opening(),
            Self::ClosingApp => change_type.is_closing(),
            Self::ChangingApp => matches!(change_type, ChangeType::Change),
        }
    }

    /// Resolve against a transition; exactly one qualifying change is required.
    pub fn resolve(self, transition: Option<&Transition>) -> FlickerResult<ComponentMatcher> {
        let qualifying: Vec<&Change> = transition
            .map(|t| {
                t.changes
                    .iter()
                    .filter(|c| self.qualifies(c.change_type))
                    .collect()
            })
            .unwrap_or_default();

        match qualifying.as_slice() {
            [change] => Ok(ComponentMatcher::full_id(change.window_id, change.layer_id)),
            other => Err(FlickerError::MissingContext {
                component: self.key().to_string(),
                expected: 1,
                actual: other.len(),
            }),
        }
    }
}

impl fmt::Display for DynamicComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// What an assertion template refers to before it is bound to a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentReference {
    /// A concrete matcher under a display label.
    Static {
        /// Name shown in assertion names.
        label: String,
        /// The matcher itself.
        matcher: ComponentMatcher,
    },
    /// Resolved from the scenario's transition.
    Dynamic(DynamicComponent),
    /// Union of two references.
    Or(Box<ComponentReference>, Box<ComponentReference>),
}

impl ComponentReference {
    /// A static reference under `label`.
    pub fn fixed(label: impl Into<String>, matcher: ComponentMatcher) -> Self {
        Self::Static {
            label: label.into(),
            matcher,
        }
    }

    /// Parse a placeholder key: a dynamic component or a well-known name.
    pub fn from_key(key: &str) -> Option<Self> {
        DynamicComponent::from_key(key)
            .map(Self::Dynamic)
            .or_else(|| well_known(key).map(|matcher| Self::fixed(key, matcher)))
    }

    /// Union of two references.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Label used inside assertion names, e.g. `OPENING_APP`.
    pub fn label(&self) -> String {
        match self {
            Self::Static { label, .. } => label.clone(),
            Self::Dynamic(component) => component.key().to_string(),
            Self::Or(a, b) => format!("{}|{}", a.label(), b.label()),
        }
    }

    /// Dynamic components this reference depends on.
    pub fn dynamic_components(&self) -> Vec<DynamicComponent> {
        match self {
            Self::Static { .. } => Vec::new(),
            Self::Dynamic(component) => vec![*component],
            Self::Or(a, b) => {
                let mut all = a.dynamic_components();
                all.extend(b.dynamic_components());
                all
            }
        }
    }

    /// Turn into a concrete matcher, looking dynamic parts up with `lookup`.
    pub fn resolve(
        &self,
        lookup: &dyn Fn(DynamicComponent) -> FlickerResult<ComponentMatcher>,
    ) -> FlickerResult<ComponentMatcher> {
        match self {
            Self::Static { matcher, .. } => Ok(matcher.clone()),
            Self::Dynamic(component) => lookup(*component),
            Self::Or(a, b) => Ok(a.resolve(lookup)?.or(b.resolve(lookup)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::transition::TransitionType;

    fn layer_entities() -> Vec<Entity> {
        vec![
            Entity::new(7, "com.example/.MainActivity#7"),
            Entity::new(8, "child of 7").with_parent(7),
            Entity::new(12, "NavigationBar0#12"),
        ]
    }

    #[test]
    fn test_exact_id_does_not_match_descendants() {
        let matcher = ComponentMatcher::exact_id(5, 7);
        let entities = layer_entities();
        let ids: Vec<u64> = matcher
            .select(TraceKind::Layer, &entities)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![7]);
        assert!(!matcher.matches(TraceKind::Layer, &entities[1..2]));
    }

    #[test]
    fn test_full_id_matches_subtree() {
        let matcher = ComponentMatcher::full_id(5, 7);
        let entities = layer_entities();
        let ids: Vec<u64> = matcher
            .select(TraceKind::Layer, &entities)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn test_exact_id_uses_window_id_for_window_kind() {
        let matcher = ComponentMatcher::exact_id(5, 7);
        let entities = vec![Entity::new(5, "window")];
        assert!(matcher.matches(TraceKind::Window, &entities));
        assert!(!matcher.matches(TraceKind::Layer, &entities));
    }

    #[test]
    fn test_name_matcher_substring_and_exact() {
        let entities = layer_entities();
        assert!(well_known("NAV_BAR")
            .unwrap()
            .matches(TraceKind::Layer, &entities));
        let exact = ComponentMatcher::Name(NameMatcher::exact("", "NavigationBar0"));
        assert!(!exact.matches(TraceKind::Layer, &entities));
    }

    #[test]
    fn test_or_matches_either() {
        let entities = layer_entities();
        let nav = well_known("NAV_BAR").unwrap();
        let missing = ComponentMatcher::exact_id(1, 1);
        assert!(nav.clone().or(missing.clone()).matches(TraceKind::Layer, &entities));
        assert!(missing.clone().or(nav).matches(TraceKind::Layer, &entities));
        assert!(!missing
            .clone()
            .or(missing)
            .matches(TraceKind::Layer, &entities));
    }

    #[test]
    fn test_or_check_applies_condition_per_side() {
        let entities = layer_entities();
        let matcher = ComponentMatcher::exact_id(0, 7).or(ComponentMatcher::exact_id(0, 12));
        // Neither side alone selects two entities, the union would.
        assert!(!matcher.check(TraceKind::Layer, &entities, &|sel| sel.len() == 2));
        assert_eq!(matcher.select(TraceKind::Layer, &entities).len(), 2);
    }

    #[test]
    fn test_identifiers() {
        let matcher = ComponentMatcher::exact_id(255, 7);
        assert_eq!(matcher.window_identifier(), "Window#ff");
        assert_eq!(matcher.layer_identifier(), "Layer#7");
        let launcher = well_known("LAUNCHER").unwrap();
        assert!(launcher
            .window_identifier()
            .starts_with("com.google.android.apps.nexuslauncher/"));
    }

    #[test]
    fn test_dynamic_opening_app_resolves_single_change() {
        let transition = Transition::new(
            1,
            TransitionType::Open,
            0,
            10,
            vec![
                Change::new(ChangeType::Open, 3, 30),
                Change::new(ChangeType::ToBack, 4, 40),
            ],
        );
        let matcher = DynamicComponent::OpeningApp
            .resolve(Some(&transition))
            .unwrap();
        assert_eq!(matcher, ComponentMatcher::full_id(3, 30));
    }

    #[test]
    fn test_dynamic_opening_app_rejects_two_changes() {
        let transition = Transition::new(
            1,
            TransitionType::Open,
            0,
            10,
            vec![
                Change::new(ChangeType::Open, 3, 30),
                Change::new(ChangeType::Open, 4, 40),
            ],
        );
        let err = DynamicComponent::OpeningApp
            .resolve(Some(&transition))
            .unwrap_err();
        assert!(err.to_string().contains("expected 1, got 2"));
    }

    #[test]
    fn test_dynamic_without_transition() {
        let err = DynamicComponent::ClosingApp.resolve(None).unwrap_err();
        assert!(matches!(
            err,
            FlickerError::MissingContext { actual: 0, .. }
        ));
    }

    #[test]
    fn test_or_matcher_serde_roundtrip() {
        let matcher = well_known("NAV_BAR")
            .unwrap()
            .or(ComponentMatcher::full_id(3, 30));
        let json = serde_json::to_value(&matcher).unwrap();
        assert_eq!(json["type"], "or");
        assert_eq!(json["right"]["type"], "full_id");
        assert_eq!(json["right"]["layer_id"], 30);
        let back: ComponentMatcher = serde_json::from_value(json).unwrap();
        assert_eq!(back, matcher);
    }

    #[test]
    fn test_reference_from_key() {
        assert_eq!(
            ComponentReference::from_key("OPENING_APP"),
            Some(ComponentReference::Dynamic(DynamicComponent::OpeningApp))
        );
        assert_eq!(ComponentReference::from_key("NAV_BAR").unwrap().label(), "NAV_BAR");
        assert!(ComponentReference::from_key("NOPE").is_none());
    }
}

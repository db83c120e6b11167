//! Assertion templates and the named sets scenarios draw them from.
//!
//! A template is parameterized by component references; binding it to a
//! scenario instance resolves those references and yields a ready chain.

use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{FlickerError, FlickerResult};
use crate::domain::models::assertion_result::Stability;
use crate::domain::models::component::{well_known, ComponentMatcher, ComponentReference, DynamicComponent};
use crate::domain::models::snapshot::TraceKind;

use super::assertion_chain::{AssertionChain, ChainBuilder};
use super::predicates::{Coverage, RegionTarget};

/// The catalogue of assertion shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Layer visible in the first entry.
    LayerIsVisibleAtStart,
    /// Layer visible in the last entry.
    LayerIsVisibleAtEnd,
    /// Layer visible in every entry.
    LayerIsVisibleAlways,
    /// System window visible in every entry.
    NonAppWindowIsVisibleAlways,
    /// App layer visible in the first entry.
    AppLayerIsVisibleAtStart,
    /// App layer hidden in the first entry.
    AppLayerIsInvisibleAtStart,
    /// App layer, or its splash screen, visible in the last entry.
    AppLayerIsVisibleAtEnd,
    /// App layer hidden in the last entry.
    AppLayerIsInvisibleAtEnd,
    /// App layer goes from hidden to visible, optionally through a snapshot and splash screen.
    AppLayerBecomesVisible,
    /// App layer goes from visible to hidden.
    AppLayerBecomesInvisible,
    /// App window goes from hidden to visible.
    AppWindowBecomesVisible,
    /// App window becomes the top app window, with an optional splash.
    AppWindowBecomesTopWindow,
    /// App layer region never shrinks.
    AppLayerIncreasesInSize,
    /// App layer covers the display in the last entry.
    AppLayerCoversFullScreenAtEnd,
    /// App window stays inside the display.
    AppWindowRemainInsideDisplayBounds,
    /// App layer sits above another component in the last entry.
    AppLayerIsAboveComponentAtEnd,
    /// Rotation layer shows up over the app and then goes away.
    RotationLayerAppearsAndVanishes,
    /// No uncovered display pixel in the first entry.
    EntireScreenCoveredAtStart,
    /// No uncovered display pixel in the last entry.
    EntireScreenCoveredAtEnd,
    /// No uncovered display pixel in any entry.
    EntireScreenCoveredAlways,
    /// No layer is visible for a single entry only.
    VisibleLayersShownMoreThanOneConsecutiveEntry,
    /// No window is visible for a single entry only.
    VisibleWindowsShownMoreThanOneConsecutiveEntry,
    /// Status bar at the top of the display in the first entry.
    StatusBarLayerPositionAtStart,
    /// Status bar at the top of the display in the last entry.
    StatusBarLayerPositionAtEnd,
}

impl TemplateKind {
    /// Every template kind.
    pub const ALL: [Self; 24] = [
        Self::LayerIsVisibleAtStart,
        Self::LayerIsVisibleAtEnd,
        Self::LayerIsVisibleAlways,
        Self::NonAppWindowIsVisibleAlways,
        Self::AppLayerIsVisibleAtStart,
        Self::AppLayerIsInvisibleAtStart,
        Self::AppLayerIsVisibleAtEnd,
        Self::AppLayerIsInvisibleAtEnd,
        Self::AppLayerBecomesVisible,
        Self::AppLayerBecomesInvisible,
        Self::AppWindowBecomesVisible,
        Self::AppWindowBecomesTopWindow,
        Self::AppLayerIncreasesInSize,
        Self::AppLayerCoversFullScreenAtEnd,
        Self::AppWindowRemainInsideDisplayBounds,
        Self::AppLayerIsAboveComponentAtEnd,
        Self::RotationLayerAppearsAndVanishes,
        Self::EntireScreenCoveredAtStart,
        Self::EntireScreenCoveredAtEnd,
        Self::EntireScreenCoveredAlways,
        Self::VisibleLayersShownMoreThanOneConsecutiveEntry,
        Self::VisibleWindowsShownMoreThanOneConsecutiveEntry,
        Self::StatusBarLayerPositionAtStart,
        Self::StatusBarLayerPositionAtEnd,
    ];

    /// Template name as it appears in assertion names and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LayerIsVisibleAtStart => "LayerIsVisibleAtStart",
            Self::LayerIsVisibleAtEnd => "LayerIsVisibleAtEnd",
            Self::LayerIsVisibleAlways => "LayerIsVisibleAlways",
            Self::NonAppWindowIsVisibleAlways => "NonAppWindowIsVisibleAlways",
            Self::AppLayerIsVisibleAtStart => "AppLayerIsVisibleAtStart",
            Self::AppLayerIsInvisibleAtStart => "AppLayerIsInvisibleAtStart",
            Self::AppLayerIsVisibleAtEnd => "AppLayerIsVisibleAtEnd",
            Self::AppLayerIsInvisibleAtEnd => "AppLayerIsInvisibleAtEnd",
            Self::AppLayerBecomesVisible => "AppLayerBecomesVisible",
            Self::AppLayerBecomesInvisible => "AppLayerBecomesInvisible",
            Self::AppWindowBecomesVisible => "AppWindowBecomesVisible",
            Self::AppWindowBecomesTopWindow => "AppWindowBecomesTopWindow",
            Self::AppLayerIncreasesInSize => "AppLayerIncreasesInSize",
            Self::AppLayerCoversFullScreenAtEnd => "AppLayerCoversFullScreenAtEnd",
            Self::AppWindowRemainInsideDisplayBounds => "AppWindowRemainInsideDisplayBounds",
            Self::AppLayerIsAboveComponentAtEnd => "AppLayerIsAboveComponentAtEnd",
            Self::RotationLayerAppearsAndVanishes => "RotationLayerAppearsAndVanishes",
            Self::EntireScreenCoveredAtStart => "EntireScreenCoveredAtStart",
            Self::EntireScreenCoveredAtEnd => "EntireScreenCoveredAtEnd",
            Self::EntireScreenCoveredAlways => "EntireScreenCoveredAlways",
            Self::VisibleLayersShownMoreThanOneConsecutiveEntry => {
                "VisibleLayersShownMoreThanOneConsecutiveEntry"
            }
            Self::VisibleWindowsShownMoreThanOneConsecutiveEntry => {
                "VisibleWindowsShownMoreThanOneConsecutiveEntry"
            }
            Self::StatusBarLayerPositionAtStart => "StatusBarLayerPositionAtStart",
            Self::StatusBarLayerPositionAtEnd => "StatusBarLayerPositionAtEnd",
        }
    }

    /// Trace the resulting chain reads.
    pub const fn trace_kind(self) -> TraceKind {
        match self {
            Self::NonAppWindowIsVisibleAlways
            | Self::AppWindowBecomesVisible
            | Self::AppWindowBecomesTopWindow
            | Self::AppWindowRemainInsideDisplayBounds
            | Self::VisibleWindowsShownMoreThanOneConsecutiveEntry => TraceKind::Window,
            _ => TraceKind::Layer,
        }
    }

    /// Whether the template takes a component placeholder.
    pub const fn needs_component(self) -> bool {
        !matches!(
            self,
            Self::EntireScreenCoveredAtStart
                | Self::EntireScreenCoveredAtEnd
                | Self::EntireScreenCoveredAlways
                | Self::VisibleLayersShownMoreThanOneConsecutiveEntry
                | Self::VisibleWindowsShownMoreThanOneConsecutiveEntry
                | Self::StatusBarLayerPositionAtStart
                | Self::StatusBarLayerPositionAtEnd
        )
    }

    /// Whether the template also takes a second component.
    pub const fn needs_other(self) -> bool {
        matches!(self, Self::AppLayerIsAboveComponentAtEnd)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = FlickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| FlickerError::Configuration(format!("Unknown assertion template: {s}")))
    }
}

fn system(key: &str) -> ComponentMatcher {
    well_known(key).unwrap_or_else(|| ComponentMatcher::name("", key))
}

/// Surfaces that legitimately show for a single entry during transitions.
const SINGLE_ENTRY_EXEMPT: [&str; 4] = ["SPLASH_SCREEN", "SNAPSHOT", "IME_SNAPSHOT", "PIP_CONTENT_OVERLAY"];

/// An assertion shape bound to component placeholders and a stability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssertionTemplate {
    kind: TemplateKind,
    component: Option<ComponentReference>,
    other: Option<ComponentReference>,
    stability: Stability,
}

impl AssertionTemplate {
    /// Blocking template without placeholders.
    pub const fn new(kind: TemplateKind) -> Self {
        Self {
            kind,
            component: None,
            other: None,
            stability: Stability::Blocking,
        }
    }

    /// Template over a placeholder key such as `"OPENING_APP"` or `"NAV_BAR"`.
    pub fn over(kind: TemplateKind, key: &str) -> FlickerResult<Self> {
        let component = ComponentReference::from_key(key)
            .ok_or_else(|| FlickerError::Configuration(format!("Unknown component: {key}")))?;
        Ok(Self::new(kind).for_component(component))
    }

    /// Set the primary component placeholder.
    #[must_use]
    pub fn for_component(mut self, component: ComponentReference) -> Self {
        self.component = Some(component);
        self
    }

    /// Set the second component placeholder.
    #[must_use]
    pub fn relative_to(mut self, other: ComponentReference) -> Self {
        self.other = Some(other);
        self
    }

    /// Override the stability classification.
    #[must_use]
    pub const fn run_as(mut self, stability: Stability) -> Self {
        self.stability = stability;
        self
    }

    /// Assertion shape.
    pub const fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Default stability before configuration overrides.
    pub const fn stability(&self) -> Stability {
        self.stability
    }

    /// Trace the built chain reads.
    pub const fn trace_kind(&self) -> TraceKind {
        self.kind.trace_kind()
    }

    /// Display name, e.g. `AppLayerIsVisibleAtEnd(OPENING_APP)`.
    pub fn name(&self) -> String {
        match (&self.component, &self.other) {
            (Some(c), Some(o)) => format!("{}({}, {})", self.kind, c.label(), o.label()),
            (Some(c), None) => format!("{}({})", self.kind, c.label()),
            _ => self.kind.to_string(),
        }
    }

    /// Dynamic components the template needs resolved.
    pub fn dynamic_components(&self) -> Vec<DynamicComponent> {
        self.component
            .iter()
            .chain(self.other.iter())
            .flat_map(ComponentReference::dynamic_components)
            .collect()
    }

    /// Check that every placeholder the kind needs is present.
    pub fn validate(&self) -> FlickerResult<()> {
        if self.kind.needs_component() && self.component.is_none() {
            return Err(FlickerError::Configuration(format!(
                "{} requires a component",
                self.kind
            )));
        }
        if self.kind.needs_other() && self.other.is_none() {
            return Err(FlickerError::Configuration(format!(
                "{} requires a second component",
                self.kind
            )));
        }
        Ok(())
    }

    fn resolve_slot(
        &self,
        slot: Option<&ComponentReference>,
        lookup: &dyn Fn(DynamicComponent) -> FlickerResult<ComponentMatcher>,
    ) -> FlickerResult<ComponentMatcher> {
        slot.ok_or_else(|| {
            FlickerError::Configuration(format!("{} is missing a component", self.name()))
        })?
        .resolve(lookup)
    }

    /// Resolve placeholders with `lookup` and build the chain.
    pub fn build_chain(
        &self,
        lookup: &dyn Fn(DynamicComponent) -> FlickerResult<ComponentMatcher>,
    ) -> FlickerResult<AssertionChain> {
        let builder = ChainBuilder::new(self.name(), self.trace_kind());
        let component = || self.resolve_slot(self.component.as_ref(), lookup);

        let builder = match self.kind {
            TemplateKind::LayerIsVisibleAtStart | TemplateKind::AppLayerIsVisibleAtStart => {
                builder.at_start().is_visible(component()?)
            }
            TemplateKind::LayerIsVisibleAtEnd => builder.at_end().is_visible(component()?),
            TemplateKind::LayerIsVisibleAlways | TemplateKind::NonAppWindowIsVisibleAlways => {
                builder.is_visible(component()?)
            }
            TemplateKind::AppLayerIsInvisibleAtStart => builder.at_start().is_invisible(component()?),
            TemplateKind::AppLayerIsVisibleAtEnd => builder.at_end().is_visible_or_splash(component()?),
            TemplateKind::AppLayerIsInvisibleAtEnd => builder.at_end().is_invisible(component()?),
            TemplateKind::AppLayerBecomesVisible => {
                let app = component()?;
                builder
                    .is_invisible(app.clone())
                    .then()
                    .is_visible(system("SNAPSHOT"))
                    .optional()
                    .then()
                    .is_visible(system("SPLASH_SCREEN"))
                    .optional()
                    .then()
                    .is_visible(app)
            }
            TemplateKind::AppLayerBecomesInvisible => {
                let app = component()?;
                builder.is_visible(app.clone()).then().is_invisible(app)
            }
            TemplateKind::AppWindowBecomesVisible => {
                let app = component()?;
                builder.is_invisible(app.clone()).then().is_visible(app)
            }
            TemplateKind::AppWindowBecomesTopWindow => {
                let app = component()?;
                builder
                    .is_not_on_top(app.clone())
                    .then()
                    .is_on_top_or_splash(system("SNAPSHOT").or(system("SPLASH_SCREEN")))
                    .optional()
                    .then()
                    .is_on_top(app)
            }
            TemplateKind::AppLayerIncreasesInSize => builder.region_grows(component()?),
            TemplateKind::AppLayerCoversFullScreenAtEnd => builder.at_end().covers(
                component()?.or(system("LETTERBOX")),
                Coverage::Exactly,
                RegionTarget::Display,
            ),
            TemplateKind::AppWindowRemainInsideDisplayBounds => {
                builder.covers(component()?, Coverage::AtMost, RegionTarget::Display)
            }
            TemplateKind::AppLayerIsAboveComponentAtEnd => {
                let other = self.resolve_slot(self.other.as_ref(), lookup)?;
                builder.at_end().is_above(component()?, other)
            }
            TemplateKind::RotationLayerAppearsAndVanishes => {
                let app = component()?;
                let rotation = system("ROTATION");
                builder
                    .is_visible(app.clone())
                    .then()
                    .is_visible(rotation.clone())
                    .then()
                    .is_visible(app)
                    .is_invisible(rotation)
            }
            TemplateKind::EntireScreenCoveredAtStart => builder.at_start().entire_screen_covered(),
            TemplateKind::EntireScreenCoveredAtEnd => builder.at_end().entire_screen_covered(),
            TemplateKind::EntireScreenCoveredAlways => builder.entire_screen_covered(),
            TemplateKind::VisibleLayersShownMoreThanOneConsecutiveEntry
            | TemplateKind::VisibleWindowsShownMoreThanOneConsecutiveEntry => builder
                .shown_more_than_one_consecutive_entry_ignoring(
                    SINGLE_ENTRY_EXEMPT.into_iter().map(system).collect(),
                ),
            TemplateKind::StatusBarLayerPositionAtStart => {
                builder.at_start().is_at_top_of_display(system("STATUS_BAR"))
            }
            TemplateKind::StatusBarLayerPositionAtEnd => {
                builder.at_end().is_at_top_of_display(system("STATUS_BAR"))
            }
        };
        Ok(builder.build()?)
    }
}

/// Named lists of templates attached to scenario types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionSet {
    /// Always-on system UI checks.
    Common,
    /// App opened from the launcher.
    AppLaunchFromHome,
    /// App closed back to the launcher.
    AppCloseToHome,
    /// App opened from a notification.
    AppLaunchFromNotification,
    /// Switching apps with the gesture bar.
    LauncherQuickSwitch,
    /// App swiped into recents.
    AppSwipeToRecents,
}

impl AssertionSet {
    /// Every set.
    pub const ALL: [Self; 6] = [
        Self::Common,
        Self::AppLaunchFromHome,
        Self::AppCloseToHome,
        Self::AppLaunchFromNotification,
        Self::LauncherQuickSwitch,
        Self::AppSwipeToRecents,
    ];

    /// Name used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "COMMON",
            Self::AppLaunchFromHome => "APP_LAUNCH_FROM_HOME",
            Self::AppCloseToHome => "APP_CLOSE_TO_HOME",
            Self::AppLaunchFromNotification => "APP_LAUNCH_FROM_NOTIFICATION",
            Self::LauncherQuickSwitch => "LAUNCHER_QUICK_SWITCH",
            Self::AppSwipeToRecents => "APP_SWIPE_TO_RECENTS",
        }
    }

    /// Templates of the set, common ones first.
    pub fn templates(self) -> FlickerResult<Vec<AssertionTemplate>> {
        use Stability::{Blocking, NonBlocking};
        use TemplateKind as K;

        let entries: &[(TemplateKind, &str, Stability)] = match self {
            Self::Common => &[],
            Self::AppLaunchFromHome => &[
                (K::AppLayerIsVisibleAtStart, "LAUNCHER", NonBlocking),
                (K::AppLayerIsInvisibleAtStart, "OPENING_APP", NonBlocking),
                (K::AppLayerIsInvisibleAtEnd, "LAUNCHER", NonBlocking),
                (K::AppLayerIsVisibleAtEnd, "OPENING_APP", Blocking),
                (K::AppLayerBecomesVisible, "OPENING_APP", Blocking),
                (K::AppWindowBecomesVisible, "OPENING_APP", NonBlocking),
                (K::AppWindowBecomesTopWindow, "OPENING_APP", NonBlocking),
                (K::AppLayerIncreasesInSize, "OPENING_APP", NonBlocking),
                (K::AppLayerCoversFullScreenAtEnd, "OPENING_APP", NonBlocking),
            ],
            Self::AppCloseToHome => &[
                (K::AppLayerIsVisibleAtStart, "CLOSING_APP", NonBlocking),
                (K::AppLayerIsInvisibleAtStart, "LAUNCHER", NonBlocking),
                (K::AppLayerIsInvisibleAtEnd, "CLOSING_APP", Blocking),
                (K::AppLayerIsVisibleAtEnd, "LAUNCHER", NonBlocking),
                (K::AppLayerBecomesInvisible, "CLOSING_APP", NonBlocking),
            ],
            Self::AppLaunchFromNotification => &[
                (K::AppLayerIsInvisibleAtStart, "OPENING_APP", NonBlocking),
                (K::AppLayerIsVisibleAtEnd, "OPENING_APP", Blocking),
                (K::AppLayerBecomesVisible, "OPENING_APP", Blocking),
                (K::AppWindowBecomesVisible, "OPENING_APP", NonBlocking),
                (K::AppLayerCoversFullScreenAtEnd, "OPENING_APP", NonBlocking),
            ],
            Self::LauncherQuickSwitch => &[
                (K::AppLayerIsVisibleAtStart, "CLOSING_APP", NonBlocking),
                (K::AppLayerIsInvisibleAtStart, "OPENING_APP", NonBlocking),
                (K::AppLayerIsVisibleAtEnd, "OPENING_APP", Blocking),
                (K::AppLayerIsInvisibleAtEnd, "CLOSING_APP", NonBlocking),
                (K::AppLayerCoversFullScreenAtEnd, "OPENING_APP", NonBlocking),
                (K::AppWindowRemainInsideDisplayBounds, "OPENING_APP", NonBlocking),
            ],
            Self::AppSwipeToRecents => &[
                (K::AppLayerIsVisibleAtStart, "CLOSING_APP", NonBlocking),
                (K::AppLayerIsVisibleAtEnd, "LAUNCHER", NonBlocking),
                (K::AppWindowRemainInsideDisplayBounds, "CLOSING_APP", NonBlocking),
            ],
        };

        let mut templates = common_templates()?;
        for (kind, key, stability) in entries {
            templates.push(AssertionTemplate::over(*kind, key)?.run_as(*stability));
        }
        if self == Self::AppLaunchFromHome {
            let launcher = ComponentReference::from_key("LAUNCHER")
                .ok_or_else(|| FlickerError::Configuration("Unknown component: LAUNCHER".into()))?;
            templates.push(
                AssertionTemplate::over(K::AppLayerIsAboveComponentAtEnd, "OPENING_APP")?
                    .relative_to(launcher)
                    .run_as(NonBlocking),
            );
        }
        Ok(templates)
    }
}

impl fmt::Display for AssertionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssertionSet {
    type Err = FlickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|set| set.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FlickerError::Configuration(format!("Unknown assertion set: {s}")))
    }
}

fn common_templates() -> FlickerResult<Vec<AssertionTemplate>> {
    use TemplateKind as K;
    let nb = Stability::NonBlocking;
    Ok(vec![
        AssertionTemplate::over(K::LayerIsVisibleAtStart, "NAV_BAR")?.run_as(nb),
        AssertionTemplate::over(K::LayerIsVisibleAtEnd, "NAV_BAR")?.run_as(nb),
        AssertionTemplate::over(K::NonAppWindowIsVisibleAlways, "NAV_BAR")?.run_as(nb),
        AssertionTemplate::over(K::NonAppWindowIsVisibleAlways, "STATUS_BAR")?.run_as(nb),
        AssertionTemplate::over(K::LayerIsVisibleAlways, "STATUS_BAR")?.run_as(nb),
        AssertionTemplate::new(K::EntireScreenCoveredAtStart).run_as(nb),
        AssertionTemplate::new(K::EntireScreenCoveredAtEnd).run_as(nb),
        AssertionTemplate::new(K::EntireScreenCoveredAlways).run_as(nb),
        AssertionTemplate::new(K::VisibleWindowsShownMoreThanOneConsecutiveEntry).run_as(nb),
        AssertionTemplate::new(K::VisibleLayersShownMoreThanOneConsecutiveEntry).run_as(nb),
        AssertionTemplate::new(K::StatusBarLayerPositionAtStart).run_as(nb),
        AssertionTemplate::new(K::StatusBarLayerPositionAtEnd).run_as(nb),
    ])
}

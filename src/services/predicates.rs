//! Leaf predicates evaluated against a single trace entry.
//!
//! Every predicate sees the entry under test plus its neighbours in the
//! evaluated sequence, which lets growth and flicker checks stay per-entry.
//! Evaluation never fails; it yields a verdict plus diagnostic facts.

use std::collections::HashSet;
use std::fmt;

use crate::domain::models::component::{well_known, ComponentMatcher};
use crate::domain::models::fact::Fact;
use crate::domain::models::geometry::{Rect, Region};
use crate::domain::models::snapshot::{Entity, Snapshot, TraceKind};

/// The entry under test and its neighbours.
#[derive(Debug, Clone, Copy)]
pub struct EntryContext<'a> {
    /// Entry under test.
    pub current: &'a Snapshot,
    /// Entry before it, if any.
    pub previous: Option<&'a Snapshot>,
    /// Entry after it, if any.
    pub next: Option<&'a Snapshot>,
}

impl<'a> EntryContext<'a> {
    /// Context with no neighbours.
    pub const fn single(current: &'a Snapshot) -> Self {
        Self {
            current,
            previous: None,
            next: None,
        }
    }

    /// Context of `entries[index]` within `entries`.
    pub fn at(entries: &'a [Snapshot], index: usize) -> Self {
        Self {
            current: &entries[index],
            previous: index.checked_sub(1).and_then(|i| entries.get(i)),
            next: entries.get(index + 1),
        }
    }
}

/// Verdict of one predicate on one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the entry was accepted.
    pub satisfied: bool,
    /// Diagnostics gathered while deciding.
    pub facts: Vec<Fact>,
}

impl Outcome {
    const fn new(satisfied: bool, facts: Vec<Fact>) -> Self {
        Self { satisfied, facts }
    }
}

/// What a component's region is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionTarget {
    /// A fixed rectangle.
    Rect(Rect),
    /// The snapshot's display bounds.
    Display,
    /// The visible region of another component in the same entry.
    Component(ComponentMatcher),
}

impl RegionTarget {
    fn resolve(&self, snapshot: &Snapshot) -> Option<Region> {
        match self {
            Self::Rect(rect) => Some(Region::from(*rect)),
            Self::Display => snapshot.display_bounds.map(Region::from),
            Self::Component(matcher) => Some(shown_region(&matcher.matching(snapshot))),
        }
    }

    fn describe(&self, kind: TraceKind) -> String {
        match self {
            Self::Rect(rect) => rect.to_string(),
            Self::Display => "display".to_string(),
            Self::Component(matcher) => matcher.identifier(kind),
        }
    }
}

/// Region relation checked by [`Predicate::Coverage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Same area as the target and inside it.
    Exactly,
    /// Covers the whole target.
    AtLeast,
    /// Stays inside the target.
    AtMost,
    /// Shares some area with the target.
    Overlaps,
    /// Shares no area with the target.
    NotOverlaps,
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exactly => "coversExactly",
            Self::AtLeast => "coversAtLeast",
            Self::AtMost => "coversAtMost",
            Self::Overlaps => "overlaps",
            Self::NotOverlaps => "notOverlaps",
        };
        write!(f, "{s}")
    }
}

/// A leaf condition over one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Some matched entity is visible.
    Visible {
        /// Component to look for.
        component: ComponentMatcher,
        /// A visible splash screen or snapshot starting window also counts.
        allow_splash: bool,
    },
    /// No matched entity is visible; absence counts as invisible.
    Invisible {
        /// Component to look for.
        component: ComponentMatcher,
    },
    /// Visible region of the component relative to a target.
    Coverage {
        /// Component whose region is measured.
        component: ComponentMatcher,
        /// Required relation to the target.
        relation: Coverage,
        /// Region compared against.
        target: RegionTarget,
    },
    /// Topmost visible entity of `component` is strictly above that of `other`.
    Above {
        /// Component expected on top.
        component: ComponentMatcher,
        /// Component expected underneath.
        other: ComponentMatcher,
    },
    /// Topmost visible entity of `component` is strictly below that of `other`.
    Below {
        /// Component expected underneath.
        component: ComponentMatcher,
        /// Component expected on top.
        other: ComponentMatcher,
    },
    /// Visible region covers at least the previous entry's visible region.
    RegionGrows {
        /// Component whose region is tracked.
        component: ComponentMatcher,
    },
    /// Visible region spans the display width, flush with its top edge.
    AtTopOfDisplay {
        /// Component to place.
        component: ComponentMatcher,
    },
    /// The topmost visible app entity belongs to `component`.
    OnTop {
        /// Component expected on top.
        component: ComponentMatcher,
        /// A splash screen or snapshot on top also counts.
        allow_splash: bool,
    },
    /// The topmost visible app entity, if any, is not part of `component`.
    NotOnTop {
        /// Component expected not to be on top.
        component: ComponentMatcher,
    },
    /// No entity is visible in this entry only, with both neighbours hiding
    /// it.
    NoSingleEntryFlicker {
        /// Components exempt from the check.
        ignore: Vec<ComponentMatcher>,
    },
    /// Visible entities together cover the whole display.
    EntireScreenCovered,
}

fn shown_region(entities: &[&Entity]) -> Region {
    entities
        .iter()
        .fold(Region::empty(), |acc, e| acc.union(&e.shown_region()))
}

fn visible_names(snapshot: &Snapshot) -> HashSet<&str> {
    snapshot
        .visible_entities()
        .map(|e| e.name.as_str())
        .collect()
}

fn top_z(entities: &[&Entity]) -> Option<i32> {
    entities.iter().filter(|e| e.visible).map(|e| e.z).max()
}

fn top_app(snapshot: &Snapshot) -> Option<&Entity> {
    snapshot
        .visible_entities()
        .filter(|e| e.is_app)
        .max_by_key(|e| e.z)
}

fn splash_components() -> impl Iterator<Item = ComponentMatcher> {
    ["SPLASH_SCREEN", "SNAPSHOT"].into_iter().filter_map(well_known)
}

fn selects(matcher: &ComponentMatcher, kind: TraceKind, entities: &[Entity], id: u64) -> bool {
    matcher.select(kind, entities).iter().any(|e| e.id == id)
}

impl Predicate {
    /// `isVisible` without splash-screen substitution.
    pub const fn visible(component: ComponentMatcher) -> Self {
        Self::Visible {
            component,
            allow_splash: false,
        }
    }

    /// `isInvisible`.
    pub const fn invisible(component: ComponentMatcher) -> Self {
        Self::Invisible { component }
    }

    /// Components this predicate refers to, in declaration order.
    pub fn components(&self) -> Vec<&ComponentMatcher> {
        match self {
            Self::Visible { component, .. }
            | Self::Invisible { component }
            | Self::RegionGrows { component }
            | Self::AtTopOfDisplay { component }
            | Self::OnTop { component, .. }
            | Self::NotOnTop { component } => vec![component],
            Self::Coverage {
                component, target, ..
            } => match target {
                RegionTarget::Component(other) => vec![component, other],
                _ => vec![component],
            },
            Self::Above { component, other } | Self::Below { component, other } => {
                vec![component, other]
            }
            Self::NoSingleEntryFlicker { .. } | Self::EntireScreenCovered => Vec::new(),
        }
    }

    /// Short human-readable description used in failure reports.
    pub fn describe(&self, kind: TraceKind) -> String {
        match self {
            Self::Visible {
                component,
                allow_splash,
            } => {
                if *allow_splash {
                    format!("isVisible({} or splash)", component.identifier(kind))
                } else {
                    format!("isVisible({})", component.identifier(kind))
                }
            }
            Self::Invisible { component } => format!("isInvisible({})", component.identifier(kind)),
            Self::Coverage {
                component,
                relation,
                target,
            } => format!(
                "{}({}, {})",
                relation,
                component.identifier(kind),
                target.describe(kind)
            ),
            Self::Above { component, other } => format!(
                "isAbove({}, {})",
                component.identifier(kind),
                other.identifier(kind)
            ),
            Self::Below { component, other } => format!(
                "isBelow({}, {})",
                component.identifier(kind),
                other.identifier(kind)
            ),
            Self::RegionGrows { component } => {
                format!("regionGrows({})", component.identifier(kind))
            }
            Self::AtTopOfDisplay { component } => {
                format!("isAtTopOfDisplay({})", component.identifier(kind))
            }
            Self::OnTop {
                component,
                allow_splash,
            } => {
                if *allow_splash {
                    format!("isOnTop({} or splash)", component.identifier(kind))
                } else {
                    format!("isOnTop({})", component.identifier(kind))
                }
            }
            Self::NotOnTop { component } => format!("isNotOnTop({})", component.identifier(kind)),
            Self::NoSingleEntryFlicker { ignore } if ignore.is_empty() => {
                "shownMoreThanOneConsecutiveEntry".to_string()
            }
            Self::NoSingleEntryFlicker { ignore } => format!(
                "shownMoreThanOneConsecutiveEntry(ignoring {})",
                ignore
                    .iter()
                    .map(|m| m.identifier(kind))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::EntireScreenCovered => "entireScreenCovered".to_string(),
        }
    }

    /// Evaluate against one entry.
    pub fn evaluate(&self, ctx: &EntryContext<'_>) -> Outcome {
        let snapshot = ctx.current;
        let kind = snapshot.kind;
        match self {
            Self::Visible {
                component,
                allow_splash,
            } => {
                let mut facts = vec![
                    Fact::new("component", component.identifier(kind)),
                    Fact::new("expected", "visible"),
                ];
                let mut visible = component.check(kind, &snapshot.entities, &|selected| {
                    selected.iter().any(|e| e.visible)
                });
                if !visible && *allow_splash {
                    visible = splash_components()
                        .any(|m| m.select(kind, &snapshot.entities).iter().any(|e| e.visible));
                    if visible {
                        facts.push(Fact::new("accepted", "splash screen or snapshot"));
                    }
                }
                let matched = component.select(kind, &snapshot.entities);
                facts.push(Fact::new(
                    "actual",
                    if matched.is_empty() {
                        "not found".to_string()
                    } else if visible {
                        "visible".to_string()
                    } else {
                        "invisible".to_string()
                    },
                ));
                Outcome::new(visible, facts)
            }
            Self::Invisible { component } => {
                let visible: Vec<&str> = component
                    .select(kind, &snapshot.entities)
                    .into_iter()
                    .filter(|e| e.visible)
                    .map(|e| e.name.as_str())
                    .collect();
                let mut facts = vec![
                    Fact::new("component", component.identifier(kind)),
                    Fact::new("expected", "invisible"),
                ];
                if visible.is_empty() {
                    facts.push(Fact::new("actual", "invisible"));
                } else {
                    facts.push(Fact::new("actual", "visible"));
                    facts.push(Fact::new("visible entities", visible.join(", ")));
                }
                Outcome::new(visible.is_empty(), facts)
            }
            Self::Coverage {
                component,
                relation,
                target,
            } => {
                let region = shown_region(&component.matching(snapshot));
                let mut facts = vec![
                    Fact::new("component", component.identifier(kind)),
                    Fact::new("region", &region),
                ];
                let Some(target_region) = target.resolve(snapshot) else {
                    facts.push(Fact::new("target", "display bounds unknown"));
                    return Outcome::new(false, facts);
                };
                facts.push(Fact::new("target", &target_region));
                let satisfied = match relation {
                    Coverage::Exactly => region.same_area(&target_region),
                    Coverage::AtLeast => region.covers(&target_region),
                    Coverage::AtMost => target_region.covers(&region),
                    Coverage::Overlaps => region.overlaps(&target_region),
                    Coverage::NotOverlaps => !region.overlaps(&target_region),
                };
                if !satisfied {
                    let uncovered = target_region.subtract(&region);
                    let outside = region.subtract(&target_region);
                    if !uncovered.is_empty() {
                        facts.push(Fact::new("uncovered", uncovered));
                    }
                    if !outside.is_empty() {
                        facts.push(Fact::new("out of bounds", outside));
                    }
                }
                Outcome::new(satisfied, facts)
            }
            Self::Above { component, other } | Self::Below { component, other } => {
                let own = top_z(&component.matching(snapshot));
                let theirs = top_z(&other.matching(snapshot));
                let facts = vec![
                    Fact::new("component", component.identifier(kind)),
                    Fact::new("other", other.identifier(kind)),
                    Fact::new("z", own.map_or_else(|| "not visible".to_string(), |z| z.to_string())),
                    Fact::new(
                        "other z",
                        theirs.map_or_else(|| "not visible".to_string(), |z| z.to_string()),
                    ),
                ];
                let satisfied = match (own, theirs) {
                    (Some(a), Some(b)) if matches!(self, Self::Above { .. }) => a > b,
                    (Some(a), Some(b)) => a < b,
                    _ => false,
                };
                Outcome::new(satisfied, facts)
            }
            Self::RegionGrows { component } => {
                let current = shown_region(&component.matching(snapshot));
                let mut facts = vec![
                    Fact::new("component", component.identifier(kind)),
                    Fact::new("region", &current),
                ];
                let Some(previous) = ctx.previous else {
                    return Outcome::new(true, facts);
                };
                let before = shown_region(&component.matching(previous));
                facts.push(Fact::new("previous region", &before));
                if current.is_empty() || before.is_empty() {
                    return Outcome::new(true, facts);
                }
                let lost = before.subtract(&current);
                let satisfied = lost.is_empty();
                if !satisfied {
                    facts.push(Fact::new("shrunk by", lost));
                }
                Outcome::new(satisfied, facts)
            }
            Self::AtTopOfDisplay { component } => {
                let region = shown_region(&component.matching(snapshot));
                let mut facts = vec![
                    Fact::new("component", component.identifier(kind)),
                    Fact::new("region", &region),
                ];
                let Some(display) = snapshot.display_bounds else {
                    facts.push(Fact::new("display", "bounds unknown"));
                    return Outcome::new(false, facts);
                };
                facts.push(Fact::new("display", display));
                let bounds = region.bounds();
                let satisfied = !region.is_empty()
                    && bounds.top == display.top
                    && bounds.left == display.left
                    && bounds.right == display.right;
                Outcome::new(satisfied, facts)
            }
            Self::OnTop {
                component,
                allow_splash,
            } => {
                let top = top_app(snapshot);
                let mut facts = vec![
                    Fact::new("component", component.identifier(kind)),
                    Fact::new("top", top.map_or("none", |e| e.name.as_str())),
                ];
                let Some(top) = top else {
                    return Outcome::new(false, facts);
                };
                let mut satisfied = selects(component, kind, &snapshot.entities, top.id);
                if !satisfied && *allow_splash {
                    satisfied = splash_components()
                        .any(|m| selects(&m, kind, &snapshot.entities, top.id));
                    if satisfied {
                        facts.push(Fact::new("accepted", "splash screen or snapshot"));
                    }
                }
                Outcome::new(satisfied, facts)
            }
            Self::NotOnTop { component } => {
                let top = top_app(snapshot);
                let facts = vec![
                    Fact::new("component", component.identifier(kind)),
                    Fact::new("top", top.map_or("none", |e| e.name.as_str())),
                ];
                let satisfied = !top.is_some_and(|e| selects(component, kind, &snapshot.entities, e.id));
                Outcome::new(satisfied, facts)
            }
            Self::NoSingleEntryFlicker { ignore } => {
                let (Some(previous), Some(next)) = (ctx.previous, ctx.next) else {
                    return Outcome::new(true, Vec::new());
                };
                let before = visible_names(previous);
                let after = visible_names(next);
                let ignored: HashSet<u64> = ignore
                    .iter()
                    .flat_map(|m| m.select(kind, &snapshot.entities))
                    .map(|e| e.id)
                    .collect();
                let mut flickered: Vec<&str> = snapshot
                    .visible_entities()
                    .filter(|e| !ignored.contains(&e.id))
                    .map(|e| e.name.as_str())
                    .filter(|name| !before.contains(name) && !after.contains(name))
                    .collect();
                flickered.sort_unstable();
                flickered.dedup();
                let mut facts = Vec::new();
                if !flickered.is_empty() {
                    facts.push(Fact::new("flickered", flickered.join(", ")));
                }
                Outcome::new(flickered.is_empty(), facts)
            }
            Self::EntireScreenCovered => {
                let Some(display) = snapshot.display_bounds else {
                    return Outcome::new(false, vec![Fact::new("display", "bounds unknown")]);
                };
                let display = Region::from(display);
                let uncovered = display.subtract(&snapshot.visible_region());
                let mut facts = vec![Fact::new("display", &display)];
                let satisfied = uncovered.is_empty();
                if !satisfied {
                    facts.push(Fact::new("uncovered", uncovered));
                }
                Outcome::new(satisfied, facts)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY: Rect = Rect::new(0, 0, 100, 200);

    fn app(visible: bool, bounds: Rect) -> Entity {
        Entity::new(7, "com.example.app/.Main#7")
            .with_visibility(visible)
            .with_bounds(bounds)
            .with_z(10)
    }

    fn snapshot(ts: i64, entities: Vec<Entity>) -> Snapshot {
        Snapshot::new(ts, TraceKind::Layer, entities).with_display(DISPLAY)
    }

    fn matcher() -> ComponentMatcher {
        ComponentMatcher::exact_id(1, 7)
    }

    #[test]
    fn test_visible_reports_not_found() {
        let s = snapshot(1, vec![]);
        let outcome = Predicate::visible(matcher()).evaluate(&EntryContext::single(&s));
        assert!(!outcome.satisfied);
        assert!(outcome.facts.contains(&Fact::new("actual", "not found")));
    }

    #[test]
    fn test_visible_accepts_splash_when_allowed() {
        let s = snapshot(
            1,
            vec![
                app(false, DISPLAY),
                Entity::new(9, "Splash Screen com.example.app#9").with_bounds(DISPLAY),
            ],
        );
        let strict = Predicate::visible(matcher());
        let lenient = Predicate::Visible {
            component: matcher(),
            allow_splash: true,
        };
        assert!(!strict.evaluate(&EntryContext::single(&s)).satisfied);
        assert!(lenient.evaluate(&EntryContext::single(&s)).satisfied);
    }

    #[test]
    fn test_invisible_when_missing() {
        let s = snapshot(1, vec![]);
        assert!(Predicate::invisible(matcher())
            .evaluate(&EntryContext::single(&s))
            .satisfied);
    }

    #[test]
    fn test_coverage_relations() {
        let half = Rect::new(0, 0, 100, 100);
        let s = snapshot(1, vec![app(true, half)]);
        let ctx = EntryContext::single(&s);
        let check = |relation| {
            Predicate::Coverage {
                component: matcher(),
                relation,
                target: RegionTarget::Display,
            }
            .evaluate(&ctx)
        };
        let exact = check(Coverage::Exactly);
        assert!(!exact.satisfied);
        assert!(exact.facts.iter().any(|f| f.key == "uncovered"));
        assert!(check(Coverage::AtMost).satisfied);
        assert!(!check(Coverage::AtLeast).satisfied);
        assert!(check(Coverage::Overlaps).satisfied);
        assert!(!check(Coverage::NotOverlaps).satisfied);
    }

    #[test]
    fn test_above_requires_both_visible() {
        let nav = Entity::new(3, "NavigationBar0#3").with_bounds(DISPLAY).with_z(5);
        let s = snapshot(1, vec![app(true, DISPLAY), nav]);
        let nav_matcher = well_known("NAV_BAR").unwrap();
        let above = Predicate::Above {
            component: matcher(),
            other: nav_matcher.clone(),
        };
        let below = Predicate::Below {
            component: matcher(),
            other: nav_matcher,
        };
        assert!(above.evaluate(&EntryContext::single(&s)).satisfied);
        assert!(!below.evaluate(&EntryContext::single(&s)).satisfied);

        let hidden = snapshot(2, vec![app(false, DISPLAY)]);
        assert!(!above.evaluate(&EntryContext::single(&hidden)).satisfied);
    }

    #[test]
    fn test_region_grows() {
        let entries = vec![
            snapshot(1, vec![app(true, Rect::new(0, 0, 50, 50))]),
            snapshot(2, vec![app(true, Rect::new(0, 0, 100, 100))]),
            snapshot(3, vec![app(true, Rect::new(0, 0, 60, 60))]),
        ];
        let grows = Predicate::RegionGrows {
            component: matcher(),
        };
        assert!(grows.evaluate(&EntryContext::at(&entries, 0)).satisfied);
        assert!(grows.evaluate(&EntryContext::at(&entries, 1)).satisfied);
        assert!(!grows.evaluate(&EntryContext::at(&entries, 2)).satisfied);
    }

    #[test]
    fn test_single_entry_flicker_detected() {
        let entries = vec![
            snapshot(1, vec![]),
            snapshot(2, vec![app(true, DISPLAY)]),
            snapshot(3, vec![]),
        ];
        let flicker = Predicate::NoSingleEntryFlicker { ignore: vec![] };
        let outcome = flicker.evaluate(&EntryContext::at(&entries, 1));
        assert!(!outcome.satisfied);
        assert_eq!(outcome.facts[0].value, "com.example.app/.Main#7");
        // Edges are exempt.
        assert!(flicker.evaluate(&EntryContext::at(&entries, 0)).satisfied);
    }

    #[test]
    fn test_single_entry_flicker_ignores_listed_components() {
        let splash = Entity::new(9, "Splash Screen com.example.app#9").with_bounds(DISPLAY);
        let entries = vec![
            snapshot(1, vec![]),
            snapshot(2, vec![splash.clone()]),
            snapshot(3, vec![]),
        ];
        let strict = Predicate::NoSingleEntryFlicker { ignore: vec![] };
        let lenient = Predicate::NoSingleEntryFlicker {
            ignore: vec![well_known("SPLASH_SCREEN").unwrap()],
        };
        assert!(!strict.evaluate(&EntryContext::at(&entries, 1)).satisfied);
        assert!(lenient.evaluate(&EntryContext::at(&entries, 1)).satisfied);
        assert_eq!(
            lenient.describe(TraceKind::Layer),
            "shownMoreThanOneConsecutiveEntry(ignoring Splash Screen)"
        );

        let with_app = vec![
            snapshot(1, vec![]),
            snapshot(2, vec![splash, app(true, DISPLAY)]),
            snapshot(3, vec![]),
        ];
        let outcome = lenient.evaluate(&EntryContext::at(&with_app, 1));
        assert!(!outcome.satisfied);
        assert_eq!(outcome.facts[0].value, "com.example.app/.Main#7");
    }

    #[test]
    fn test_at_top_of_display() {
        let status_bar = |bounds| Entity::new(2, "StatusBar#2").with_bounds(bounds);
        let pinned = snapshot(1, vec![status_bar(Rect::new(0, 0, 100, 10))]);
        let dropped = snapshot(2, vec![status_bar(Rect::new(0, 20, 100, 30))]);
        let hidden = snapshot(3, vec![status_bar(Rect::new(0, 0, 100, 10)).with_visibility(false)]);
        let p = Predicate::AtTopOfDisplay {
            component: well_known("STATUS_BAR").unwrap(),
        };
        assert!(p.evaluate(&EntryContext::single(&pinned)).satisfied);
        assert!(!p.evaluate(&EntryContext::single(&dropped)).satisfied);
        assert!(!p.evaluate(&EntryContext::single(&hidden)).satisfied);
    }

    #[test]
    fn test_on_top_uses_topmost_visible_app() {
        let launcher = Entity::new(4, "Launcher#4").with_bounds(DISPLAY).with_z(1).as_app();
        let nav = Entity::new(3, "NavigationBar0#3").with_bounds(DISPLAY).with_z(50);
        let behind = snapshot(1, vec![launcher.clone(), app(false, DISPLAY).as_app(), nav.clone()]);
        let front = snapshot(2, vec![launcher, app(true, DISPLAY).as_app(), nav]);

        let on_top = Predicate::OnTop {
            component: matcher(),
            allow_splash: false,
        };
        let not_on_top = Predicate::NotOnTop { component: matcher() };
        assert!(!on_top.evaluate(&EntryContext::single(&behind)).satisfied);
        assert!(not_on_top.evaluate(&EntryContext::single(&behind)).satisfied);
        assert!(on_top.evaluate(&EntryContext::single(&front)).satisfied);
        assert!(!not_on_top.evaluate(&EntryContext::single(&front)).satisfied);

        let outcome = on_top.evaluate(&EntryContext::single(&behind));
        assert!(outcome.facts.contains(&Fact::new("top", "Launcher#4")));
    }

    #[test]
    fn test_components_lists_every_matcher() {
        let p = Predicate::Coverage {
            component: matcher(),
            relation: Coverage::AtLeast,
            target: RegionTarget::Component(well_known("NAV_BAR").unwrap()),
        };
        assert_eq!(p.components().len(), 2);
        assert!(Predicate::EntireScreenCovered.components().is_empty());
    }

    #[test]
    fn test_entire_screen_covered() {
        let covered = snapshot(1, vec![app(true, DISPLAY)]);
        let partial = snapshot(2, vec![app(true, Rect::new(0, 0, 100, 150))]);
        let no_display = Snapshot::new(3, TraceKind::Layer, vec![]);
        let p = Predicate::EntireScreenCovered;
        assert!(p.evaluate(&EntryContext::single(&covered)).satisfied);
        assert!(!p.evaluate(&EntryContext::single(&partial)).satisfied);
        assert!(!p.evaluate(&EntryContext::single(&no_display)).satisfied);
    }
}

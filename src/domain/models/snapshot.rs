//! Hierarchical UI state captured at one instant.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::geometry::{Rect, Region};
use super::trace::Timestamp;

/// Which hierarchy a snapshot describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// Window-manager hierarchy; entities are identified by window token.
    Window,
    /// Composition layer hierarchy; entities are identified by layer id.
    Layer,
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window => write!(f, "window"),
            Self::Layer => write!(f, "layer"),
        }
    }
}

/// One node of a window or layer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Window token or layer id, depending on the trace kind.
    pub id: u64,
    /// Window title or layer name.
    pub name: String,
    /// Parent entity, `None` for roots.
    #[serde(default)]
    pub parent_id: Option<u64>,
    /// Visibility flag as recorded.
    pub visible: bool,
    /// Screen bounds.
    #[serde(default)]
    pub bounds: Rect,
    /// Region actually shown on screen; falls back to `bounds` when absent.
    #[serde(default)]
    pub visible_region: Option<Region>,
    /// Stacking order; higher is closer to the viewer.
    #[serde(default)]
    pub z: i32,
    /// Whether the entity belongs to an application (as opposed to system UI).
    #[serde(default)]
    pub is_app: bool,
}

impl Entity {
    /// A visible, empty-bounds entity with no parent.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            visible: true,
            bounds: Rect::EMPTY,
            visible_region: None,
            z: 0,
            is_app: false,
        }
    }

    /// Sets the parent entity.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: u64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the visibility flag.
    #[must_use]
    pub const fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the screen bounds.
    #[must_use]
    pub const fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the region shown on screen.
    #[must_use]
    pub fn with_visible_region(mut self, region: Region) -> Self {
        self.visible_region = Some(region);
        self
    }

    /// Sets the stacking order.
    #[must_use]
    pub const fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Marks the entity as application content.
    #[must_use]
    pub const fn as_app(mut self) -> Self {
        self.is_app = true;
        self
    }

    /// Region shown on screen, empty when the entity is invisible.
    pub fn shown_region(&self) -> Region {
        if !self.visible {
            return Region::empty();
        }
        self.visible_region
            .clone()
            .unwrap_or_else(|| Region::from(self.bounds))
    }
}

/// A timestamped window or layer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken.
    pub timestamp: Timestamp,
    /// Hierarchy the snapshot describes.
    pub kind: TraceKind,
    /// Bounds of the display, when recorded.
    #[serde(default)]
    pub display_bounds: Option<Rect>,
    /// Every entity in the tree, in no particular order.
    pub entities: Vec<Entity>,
}

impl Snapshot {
    /// Snapshot without display bounds.
    pub const fn new(timestamp: Timestamp, kind: TraceKind, entities: Vec<Entity>) -> Self {
        Self {
            timestamp,
            kind,
            display_bounds: None,
            entities,
        }
    }

    /// Sets the display bounds.
    #[must_use]
    pub const fn with_display(mut self, display: Rect) -> Self {
        self.display_bounds = Some(display);
        self
    }

    /// Entity with the given id.
    pub fn entity(&self, id: u64) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Direct children of `id`.
    pub fn children(&self, id: u64) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.parent_id == Some(id))
    }

    /// The entity with `id` followed by every entity beneath it.
    pub fn subtree(&self, id: u64) -> Vec<&Entity> {
        subtree_of(&self.entities, id)
    }

    /// Entities whose visibility flag is set.
    pub fn visible_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.visible)
    }

    /// Whether the tree has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Union of the shown regions of all visible entities.
    pub fn visible_region(&self) -> Region {
        self.visible_entities()
            .fold(Region::empty(), |acc, e| acc.union(&e.shown_region()))
    }
}

/// Entities of `entities` rooted at `id`, in their original order.
pub fn subtree_of(entities: &[Entity], id: u64) -> Vec<&Entity> {
    if !entities.iter().any(|e| e.id == id) {
        return Vec::new();
    }
    let mut members: HashSet<u64> = HashSet::from([id]);
    // Parent links may appear in any order, so iterate to a fixed point.
    loop {
        let before = members.len();
        for entity in entities {
            if let Some(parent) = entity.parent_id {
                if members.contains(&parent) {
                    members.insert(entity.id);
                }
            }
        }
        if members.len() == before {
            break;
        }
    }
    entities.iter().filter(|e| members.contains(&e.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Snapshot {
        Snapshot::new(
            10,
            TraceKind::Layer,
            vec![
                Entity::new(9, "grandchild").with_parent(8),
                Entity::new(7, "root"),
                Entity::new(8, "child").with_parent(7),
                Entity::new(3, "other"),
            ],
        )
    }

    #[test]
    fn test_subtree_handles_unordered_parents() {
        let snapshot = tree();
        let ids: Vec<u64> = snapshot.subtree(7).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![9, 7, 8]);
    }

    #[test]
    fn test_subtree_of_missing_entity_is_empty() {
        assert!(tree().subtree(42).is_empty());
    }

    #[test]
    fn test_children() {
        let snapshot = tree();
        let children: Vec<u64> = snapshot.children(7).map(|e| e.id).collect();
        assert_eq!(children, vec![8]);
    }

    #[test]
    fn test_shown_region_of_invisible_entity_is_empty() {
        let entity = Entity::new(1, "a")
            .with_bounds(Rect::new(0, 0, 10, 10))
            .with_visibility(false);
        assert!(entity.shown_region().is_empty());
    }
}

//! Recorded shell transitions and their per-entity changes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::trace::{TimeRange, Timestamp};

/// How an entity participates in a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    /// Entity appears.
    Open,
    /// Entity goes away.
    Close,
    /// Existing entity moves to the front.
    ToFront,
    /// Entity moves behind others.
    ToBack,
    /// Entity changes in place.
    Change,
}

impl ChangeType {
    /// `Open` or `ToFront`.
    pub const fn is_opening(self) -> bool {
        matches!(self, Self::Open | Self::ToFront)
    }

    /// `Close` or `ToBack`.
    pub const fn is_closing(self) -> bool {
        matches!(self, Self::Close | Self::ToBack)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
            Self::ToFront => "TO_FRONT",
            Self::ToBack => "TO_BACK",
            Self::Change => "CHANGE",
        };
        write!(f, "{s}")
    }
}

/// Windowing mode of the container affected by a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowingMode {
    /// Not recorded.
    #[default]
    Undefined,
    /// Fills the display.
    Fullscreen,
    /// Picture-in-picture.
    Pinned,
    /// Free-floating desktop window.
    Freeform,
    /// Split-screen.
    MultiWindow,
}

/// Type of the transition as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionType {
    /// Opens a new task.
    Open,
    /// Closes a task.
    Close,
    /// Brings a task to the front.
    ToFront,
    /// Sends a task to the back.
    ToBack,
    /// Reconfigures in place.
    Change,
    /// Any platform-specific type the engine does not interpret.
    Other(String),
}

impl TransitionType {
    /// `Open` or `ToFront`.
    pub const fn is_opening(&self) -> bool {
        matches!(self, Self::Open | Self::ToFront)
    }

    /// `Close` or `ToBack`.
    pub const fn is_closing(&self) -> bool {
        matches!(self, Self::Close | Self::ToBack)
    }
}

/// One entity affected by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Id of the affected container.
    pub entity_id: u64,
    /// Window token of the affected window.
    pub window_id: u64,
    /// Layer id of the affected surface.
    pub layer_id: u64,
    /// How the entity participates.
    pub change_type: ChangeType,
    /// Windowing mode after the change.
    #[serde(default)]
    pub windowing_mode: WindowingMode,
}

impl Change {
    /// Change with an undefined windowing mode; `entity_id` defaults to `layer_id`.
    pub const fn new(change_type: ChangeType, window_id: u64, layer_id: u64) -> Self {
        Self {
            entity_id: layer_id,
            window_id,
            layer_id,
            change_type,
            windowing_mode: WindowingMode::Undefined,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Change({}, window={:x}, layer={}, mode={:?})",
            self.change_type, self.window_id, self.layer_id, self.windowing_mode
        )
    }
}

/// A discrete recorded operation with timed entity-level changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Recorder-assigned id.
    pub id: u64,
    /// Overall type.
    pub transition_type: TransitionType,
    /// When the transition started playing.
    pub start: Timestamp,
    /// When it finished, inclusive.
    pub end: Timestamp,
    /// Per-entity changes.
    #[serde(default)]
    pub changes: Vec<Change>,
    /// Whether the transition was aborted before finishing.
    #[serde(default)]
    pub aborted: bool,
    /// Ids of the transitions this one was merged from, if any.
    #[serde(default)]
    pub merged_from: Vec<u64>,
}

impl Transition {
    /// A non-aborted, unmerged transition.
    pub const fn new(
        id: u64,
        transition_type: TransitionType,
        start: Timestamp,
        end: Timestamp,
        changes: Vec<Change>,
    ) -> Self {
        Self {
            id,
            transition_type,
            start,
            end,
            changes,
            aborted: false,
            merged_from: Vec::new(),
        }
    }

    /// Whether the transition's `[start, end]` interval touches `range`.
    pub const fn overlaps(&self, range: &TimeRange) -> bool {
        range.overlaps_interval(self.start, self.end)
    }

    /// Whether any change has a type matching `predicate`.
    pub fn has_change(&self, predicate: impl Fn(ChangeType) -> bool) -> bool {
        self.changes.iter().any(|c| predicate(c.change_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_groups() {
        assert!(ChangeType::ToFront.is_opening());
        assert!(ChangeType::ToBack.is_closing());
        assert!(!ChangeType::Change.is_opening());
        assert!(!ChangeType::Change.is_closing());
    }

    #[test]
    fn test_overlaps_inclusive_end() {
        let t = Transition::new(1, TransitionType::Open, 10, 20, vec![]);
        assert!(t.overlaps(&TimeRange { start: 20, end: 30 }));
        assert!(!t.overlaps(&TimeRange { start: 21, end: 30 }));
        assert!(!t.overlaps(&TimeRange { start: 0, end: 10 }));
    }

    #[test]
    fn test_transition_type_serde() {
        let json = serde_json::to_string(&TransitionType::ToFront).unwrap();
        assert_eq!(json, "\"TO_FRONT\"");
        let other: TransitionType = serde_json::from_str(r#"{"OTHER":"SLEEP"}"#).unwrap();
        assert_eq!(other, TransitionType::Other("SLEEP".to_string()));
    }
}

//! Transition filters and merges used when matching tags to transitions.

use std::collections::HashMap;

use crate::domain::models::transition::{Change, ChangeType, Transition};

/// Predicate selecting candidate transitions for a tag occurrence.
///
/// Aborted transitions are never accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionFilter {
    /// Opening transition with at least one opening change.
    OpenApp,
    /// Closing transition with at least one closing change.
    CloseAppToLauncher,
    /// Contains both an opening and a closing change.
    QuickSwitch,
    /// Every non-aborted transition.
    Any,
}

impl TransitionFilter {
    /// Whether `transition` is a candidate.
    pub fn accepts(self, transition: &Transition) -> bool {
        if transition.aborted {
            return false;
        }
        match self {
            Self::OpenApp => {
                transition.transition_type.is_opening() && transition.has_change(|c| c.is_opening())
            }
            Self::CloseAppToLauncher => {
                transition.transition_type.is_closing() && transition.has_change(|c| c.is_closing())
            }
            Self::QuickSwitch => {
                transition.has_change(|c| c.is_opening()) && transition.has_change(|c| c.is_closing())
            }
            Self::Any => true,
        }
    }
}

/// Coalesces several candidate transitions into one logical transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMerge {
    /// Keep the earliest candidate.
    First,
    /// One transition spanning all candidates. The last change per entity
    /// wins, except that a plain `CHANGE` never hides an open or close.
    QuickSwitch,
}

impl TransitionMerge {
    /// Combines candidates ordered by start then id. `None` when there are none.
    pub fn apply(self, mut candidates: Vec<Transition>) -> Option<Transition> {
        candidates.sort_by_key(|t| (t.start, t.id));
        match self {
            Self::First => candidates.into_iter().next(),
            Self::QuickSwitch => merge_all(candidates),
        }
    }
}

fn merge_all(candidates: Vec<Transition>) -> Option<Transition> {
    let mut iter = candidates.into_iter();
    let first = iter.next()?;
    let rest: Vec<Transition> = iter.collect();
    if rest.is_empty() {
        return Some(first);
    }

    let start = rest.iter().map(|t| t.start).fold(first.start, i64::min);
    let end = rest.iter().map(|t| t.end).fold(first.end, i64::max);

    let mut order: Vec<u64> = Vec::new();
    let mut latest: HashMap<u64, Change> = HashMap::new();
    let mut merged_from = vec![first.id];
    let all_changes = first
        .changes
        .iter()
        .chain(rest.iter().flat_map(|t| t.changes.iter()))
        .cloned();
    for change in all_changes {
        let shadowed = latest.get(&change.entity_id).map(|previous| {
            change.change_type == ChangeType::Change && previous.change_type != ChangeType::Change
        });
        match shadowed {
            None => {
                order.push(change.entity_id);
                latest.insert(change.entity_id, change);
            }
            Some(true) => {}
            Some(false) => {
                latest.insert(change.entity_id, change);
            }
        }
    }
    merged_from.extend(rest.iter().map(|t| t.id));

    let changes = order
        .into_iter()
        .filter_map(|id| latest.remove(&id))
        .collect();

    let mut merged = Transition::new(first.id, first.transition_type, start, end, changes);
    merged.merged_from = merged_from;
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::transition::TransitionType;

    fn open(id: u64, start: i64, end: i64) -> Transition {
        Transition::new(
            id,
            TransitionType::Open,
            start,
            end,
            vec![Change::new(ChangeType::Open, 1, 10)],
        )
    }

    #[test]
    fn test_filters_reject_aborted() {
        let mut t = open(1, 0, 10);
        assert!(TransitionFilter::OpenApp.accepts(&t));
        t.aborted = true;
        assert!(!TransitionFilter::OpenApp.accepts(&t));
        assert!(!TransitionFilter::Any.accepts(&t));
    }

    #[test]
    fn test_close_filter_needs_closing_change() {
        let t = Transition::new(
            2,
            TransitionType::ToBack,
            0,
            10,
            vec![Change::new(ChangeType::Change, 1, 10)],
        );
        assert!(!TransitionFilter::CloseAppToLauncher.accepts(&t));
    }

    #[test]
    fn test_quick_switch_merge_spans_candidates() {
        let first = Transition::new(
            1,
            TransitionType::ToFront,
            10,
            20,
            vec![
                Change::new(ChangeType::ToFront, 1, 10),
                Change::new(ChangeType::ToBack, 2, 20),
            ],
        );
        let second = Transition::new(
            2,
            TransitionType::Change,
            15,
            40,
            vec![Change::new(ChangeType::Change, 1, 10)],
        );
        let merged = TransitionMerge::QuickSwitch
            .apply(vec![second, first])
            .unwrap();
        assert_eq!((merged.start, merged.end), (10, 40));
        assert_eq!(merged.merged_from, vec![1, 2]);
        assert_eq!(merged.changes.len(), 2);
        assert_eq!(merged.changes[0].change_type, ChangeType::ToFront);
    }

    #[test]
    fn test_first_merge_keeps_earliest() {
        let merged = TransitionMerge::First
            .apply(vec![open(2, 30, 40), open(1, 5, 10)])
            .unwrap();
        assert_eq!(merged.id, 1);
        assert!(TransitionMerge::First.apply(vec![]).is_none());
    }
}

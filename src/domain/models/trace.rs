//! Time-indexed snapshot sequences.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::snapshot::{Snapshot, TraceKind};
use crate::domain::errors::TraceError;

/// Nanoseconds on the device's monotonic clock.
pub type Timestamp = i64;

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: Timestamp,
    /// Exclusive end.
    pub end: Timestamp,
}

impl TimeRange {
    /// Range covering every representable timestamp.
    pub const ALL: Self = Self {
        start: Timestamp::MIN,
        end: Timestamp::MAX,
    };

    /// Fails when `end < start`. `start == end` is a valid empty range.
    pub const fn new(start: Timestamp, end: Timestamp) -> Result<Self, TraceError> {
        if end < start {
            return Err(TraceError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Whether `ts` falls in `[start, end)`.
    pub const fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Whether `[start, end]` (both inclusive, as recorded for operations)
    /// touches this range.
    pub const fn overlaps_interval(&self, start: Timestamp, end: Timestamp) -> bool {
        start < self.end && end >= self.start
    }

    /// Whether this range lies entirely inside `outer`.
    pub const fn is_within(&self, outer: &Self) -> bool {
        outer.start <= self.start && self.end <= outer.end
    }

    /// Intersection of two ranges; empty ranges collapse to `start == end`.
    pub fn intersect(&self, other: &Self) -> Self {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end).max(start);
        Self { start, end }
    }

    /// Whether the range contains no instant.
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Ordered snapshots of a single kind with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    kind: TraceKind,
    snapshots: Vec<Snapshot>,
}

impl Trace {
    /// Validates that every snapshot has `kind` and that timestamps strictly increase.
    pub fn new(kind: TraceKind, snapshots: Vec<Snapshot>) -> Result<Self, TraceError> {
        for snapshot in &snapshots {
            if snapshot.kind != kind {
                return Err(TraceError::MixedKinds {
                    expected: kind.to_string(),
                    found: snapshot.kind.to_string(),
                    timestamp: snapshot.timestamp,
                });
            }
        }
        for pair in snapshots.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(TraceError::NonMonotonicTimestamps {
                    previous: pair[0].timestamp,
                    next: pair[1].timestamp,
                });
            }
        }
        Ok(Self { kind, snapshots })
    }

    /// A trace with no snapshots.
    pub const fn empty(kind: TraceKind) -> Self {
        Self {
            kind,
            snapshots: Vec::new(),
        }
    }

    /// Kind shared by every snapshot.
    pub const fn kind(&self) -> TraceKind {
        self.kind
    }

    /// All snapshots in timestamp order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshot was recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Earliest snapshot.
    pub fn first(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    /// Latest snapshot.
    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Last snapshot taken at or before `ts`.
    pub fn entry_at(&self, ts: Timestamp) -> Option<&Snapshot> {
        let idx = self.snapshots.partition_point(|s| s.timestamp <= ts);
        idx.checked_sub(1).map(|i| &self.snapshots[i])
    }

    /// Range spanning the first through the last snapshot.
    pub fn time_range(&self) -> Option<TimeRange> {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => Some(TimeRange {
                start: first.timestamp,
                end: last.timestamp.saturating_add(1),
            }),
            _ => None,
        }
    }

    /// Snapshots whose timestamp falls in `range`.
    pub fn slice(&self, range: TimeRange) -> Self {
        let start = self.snapshots.partition_point(|s| s.timestamp < range.start);
        let end = self.snapshots.partition_point(|s| s.timestamp < range.end);
        Self {
            kind: self.kind,
            snapshots: self.snapshots[start..end.max(start)].to_vec(),
        }
    }
}

impl<'de> Deserialize<'de> for Trace {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            kind: TraceKind,
            snapshots: Vec<Snapshot>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.kind, raw.snapshots).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshots(ts: &[Timestamp]) -> Vec<Snapshot> {
        ts.iter()
            .map(|&t| Snapshot::new(t, TraceKind::Layer, vec![]))
            .collect()
    }

    #[test]
    fn test_rejects_non_increasing_timestamps() {
        let err = Trace::new(TraceKind::Layer, snapshots(&[1, 2, 2])).unwrap_err();
        assert_eq!(
            err,
            TraceError::NonMonotonicTimestamps {
                previous: 2,
                next: 2
            }
        );
    }

    #[test]
    fn test_rejects_mixed_kinds() {
        let mut entries = snapshots(&[1, 2]);
        entries[1].kind = TraceKind::Window;
        assert!(matches!(
            Trace::new(TraceKind::Layer, entries),
            Err(TraceError::MixedKinds { timestamp: 2, .. })
        ));
    }

    #[test]
    fn test_slice_is_half_open() {
        let trace = Trace::new(TraceKind::Layer, snapshots(&[10, 20, 30, 40])).unwrap();
        let sliced = trace.slice(TimeRange::new(20, 40).unwrap());
        let ts: Vec<Timestamp> = sliced.snapshots().iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![20, 30]);
    }

    #[test]
    fn test_entry_at() {
        let trace = Trace::new(TraceKind::Layer, snapshots(&[10, 20, 30])).unwrap();
        assert_eq!(trace.entry_at(25).map(|s| s.timestamp), Some(20));
        assert_eq!(trace.entry_at(30).map(|s| s.timestamp), Some(30));
        assert!(trace.entry_at(5).is_none());
    }

    #[test]
    fn test_time_range() {
        let trace = Trace::new(TraceKind::Layer, snapshots(&[10, 30])).unwrap();
        assert_eq!(trace.time_range(), Some(TimeRange { start: 10, end: 31 }));
        assert!(Trace::empty(TraceKind::Layer).time_range().is_none());
    }

    #[test]
    fn test_invalid_range() {
        assert!(TimeRange::new(5, 4).is_err());
        assert!(TimeRange::new(5, 5).unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"kind":"layer","snapshots":[
            {"timestamp":5,"kind":"layer","entities":[]},
            {"timestamp":4,"kind":"layer","entities":[]}]}"#;
        assert!(serde_json::from_str::<Trace>(json).is_err());
    }
}

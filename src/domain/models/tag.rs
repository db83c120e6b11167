//! Critical-user-journey markers and their pairing into occurrences.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use super::trace::{TimeRange, Timestamp};

/// Marker kind emitted by the instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// Journey started.
    Begin,
    /// Journey finished.
    End,
    /// Journey abandoned before finishing.
    Cancel,
}

/// A named instantaneous marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Journey name, e.g. `LAUNCHER_APP_LAUNCH_FROM_ICON`.
    pub name: String,
    /// When the marker was emitted.
    pub timestamp: Timestamp,
    /// Marker kind.
    pub kind: TagKind,
}

impl Tag {
    /// A `Begin` marker.
    pub fn begin(name: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            name: name.into(),
            timestamp,
            kind: TagKind::Begin,
        }
    }

    /// An `End` marker.
    pub fn end(name: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            name: name.into(),
            timestamp,
            kind: TagKind::End,
        }
    }

    /// A `Cancel` marker.
    pub fn cancel(name: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            name: name.into(),
            timestamp,
            kind: TagKind::Cancel,
        }
    }
}

/// A completed begin/end pair of one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOccurrence {
    /// Journey name.
    pub name: String,
    /// From the `Begin` to the `End` marker.
    pub range: TimeRange,
}

/// Pair `Begin` markers with the next `End` of the same name.
///
/// A `Cancel` discards the pending `Begin`; a `Begin` without an `End` is
/// dropped. Occurrences are returned in order of their `End` marker.
pub fn occurrences(tags: &[Tag]) -> Vec<TagOccurrence> {
    let mut ordered: Vec<&Tag> = tags.iter().collect();
    ordered.sort_by_key(|t| t.timestamp);

    let mut pending: HashMap<&str, Timestamp> = HashMap::new();
    let mut out = Vec::new();

    for tag in ordered {
        match tag.kind {
            TagKind::Begin => {
                if let Some(previous) = pending.insert(tag.name.as_str(), tag.timestamp) {
                    warn!(tag = %tag.name, begin = previous, "tag began twice without end; keeping latest begin");
                }
            }
            TagKind::End => match pending.remove(tag.name.as_str()) {
                Some(start) => out.push(TagOccurrence {
                    name: tag.name.clone(),
                    range: TimeRange {
                        start,
                        end: tag.timestamp.max(start),
                    },
                }),
                None => {
                    warn!(tag = %tag.name, end = tag.timestamp, "tag end without begin");
                }
            },
            TagKind::Cancel => {
                pending.remove(tag.name.as_str());
            }
        }
    }

    for (name, start) in pending {
        warn!(tag = %name, begin = start, "tag never ended; dropping occurrence");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_begin_and_end() {
        let tags = vec![
            Tag::begin("LAUNCH", 10),
            Tag::end("LAUNCH", 20),
            Tag::begin("LAUNCH", 30),
            Tag::end("LAUNCH", 45),
        ];
        let occ = occurrences(&tags);
        assert_eq!(occ.len(), 2);
        assert_eq!(occ[0].range, TimeRange { start: 10, end: 20 });
        assert_eq!(occ[1].range, TimeRange { start: 30, end: 45 });
    }

    #[test]
    fn test_cancel_discards_pending_begin() {
        let tags = vec![
            Tag::begin("LAUNCH", 10),
            Tag::cancel("LAUNCH", 15),
            Tag::end("LAUNCH", 20),
        ];
        assert!(occurrences(&tags).is_empty());
    }

    #[test]
    fn test_interleaved_names() {
        let tags = vec![
            Tag::begin("A", 1),
            Tag::begin("B", 2),
            Tag::end("A", 3),
            Tag::end("B", 4),
        ];
        let occ = occurrences(&tags);
        assert_eq!(occ[0].name, "A");
        assert_eq!(occ[1].name, "B");
    }

    #[test]
    fn test_unterminated_begin_dropped() {
        let tags = vec![Tag::begin("A", 1)];
        assert!(occurrences(&tags).is_empty());
    }
}

//! JSON trace dump adapter.
//!
//! A dump is the serde form of an already-decoded recording:
//! `{ window_trace, layers_trace, tags, transitions }`. Empty or missing
//! snapshot lists mean the trace was not captured.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::domain::models::bundle::TraceBundle;
use crate::domain::models::snapshot::{Snapshot, TraceKind};
use crate::domain::models::tag::Tag;
use crate::domain::models::trace::Trace;
use crate::domain::models::transition::Transition;

/// On-disk shape of a recording.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceDump {
    /// Window snapshots in timestamp order.
    #[serde(default)]
    pub window_trace: Vec<Snapshot>,
    /// Layer snapshots in timestamp order.
    #[serde(default)]
    pub layers_trace: Vec<Snapshot>,
    /// Journey markers.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Recorded transitions.
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl TraceDump {
    /// Read and decode a dump file into a bundle.
    pub fn read(path: impl AsRef<Path>) -> Result<TraceBundle> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace dump {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid trace dump {}", path.display()))
    }

    /// Decode a dump from JSON text.
    pub fn parse(json: &str) -> Result<TraceBundle> {
        let dump: Self = serde_json::from_str(json).context("Failed to parse trace dump JSON")?;
        dump.into_bundle()
    }

    /// Build the bundle, checking trace invariants.
    ///
    /// Dangling transition changes are logged, not rejected.
    pub fn into_bundle(self) -> Result<TraceBundle> {
        let mut bundle = TraceBundle::new()
            .with_tags(self.tags)
            .with_transitions(self.transitions);
        if !self.window_trace.is_empty() {
            bundle = bundle.with_window_trace(
                Trace::new(TraceKind::Window, self.window_trace).context("Invalid window trace")?,
            );
        }
        if !self.layers_trace.is_empty() {
            bundle = bundle.with_layers_trace(
                Trace::new(TraceKind::Layer, self.layers_trace).context("Invalid layers trace")?,
            );
        }
        for error in bundle.validate() {
            warn!(%error, "trace dump inconsistency");
        }
        Ok(bundle)
    }

    /// Dump shape of an in-memory bundle.
    pub fn from_bundle(bundle: &TraceBundle) -> Self {
        let snapshots = |trace: Option<&Trace>| trace.map(|t| t.snapshots().to_vec()).unwrap_or_default();
        Self {
            window_trace: snapshots(bundle.window_trace.as_ref()),
            layers_trace: snapshots(bundle.layers_trace.as_ref()),
            tags: bundle.tags.clone(),
            transitions: bundle.transitions.clone(),
        }
    }

    /// Write `bundle` as pretty-printed JSON.
    pub fn write(bundle: &TraceBundle, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&Self::from_bundle(bundle))?;
        fs::write(path, json).with_context(|| format!("Failed to write trace dump {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_dump() {
        let json = r#"{
            "layers_trace": [
                {"timestamp": 1, "kind": "layer", "entities": [
                    {"id": 7, "name": "NavigationBar0#7", "visible": true,
                     "bounds": {"left": 0, "top": 0, "right": 10, "bottom": 10}}
                ]},
                {"timestamp": 2, "kind": "layer", "entities": []}
            ],
            "tags": [{"name": "CUJ_X", "timestamp": 1, "kind": "begin"}]
        }"#;
        let bundle = TraceDump::parse(json).unwrap();
        assert!(bundle.window_trace.is_none());
        assert_eq!(bundle.layers_trace.as_ref().map(Trace::len), Some(2));
        assert_eq!(bundle.tags.len(), 1);
    }

    #[test]
    fn test_parse_rejects_non_monotonic() {
        let json = r#"{"layers_trace": [
            {"timestamp": 5, "kind": "layer", "entities": []},
            {"timestamp": 5, "kind": "layer", "entities": []}
        ]}"#;
        let err = TraceDump::parse(json).unwrap_err();
        assert!(format!("{err:#}").contains("strictly increasing"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let bundle = TraceBundle::new().with_layers_trace(
            Trace::new(
                TraceKind::Layer,
                vec![Snapshot::new(3, TraceKind::Layer, vec![])],
            )
            .unwrap(),
        );
        TraceDump::write(&bundle, &path).unwrap();
        assert_eq!(TraceDump::read(&path).unwrap(), bundle);
    }
}

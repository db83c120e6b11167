//! Diagnostic facts attached to predicate outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single key/value diagnostic, e.g. `expected: visible`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// What the value describes.
    pub key: String,
    /// Rendered value.
    pub value: String,
}

impl Fact {
    /// Fact from a key and anything printable.
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// Render facts one per line, indented, for error messages.
pub fn format_facts(facts: &[Fact]) -> String {
    facts
        .iter()
        .map(|fact| format!("    {fact}"))
        .collect::<Vec<_>>()
        .join("\n")
}

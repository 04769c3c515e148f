//! Diagnostic context gathered for an alert

use crate::alert::{Alert, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A ranked piece of runbook text returned by context retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub content: String,
    #[serde(default = "unknown_source")]
    pub source: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

fn unknown_source() -> String {
    "unknown".to_string()
}

impl Snippet {
    pub fn new(content: impl Into<String>, source: impl Into<String>, score: f64) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            score,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Alert plus retrieved context and inferred root causes.
///
/// Produced once per incident and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub alert: Alert,
    pub summary: String,
    /// Snippets in retrieval rank order
    pub runbook_snippets: Vec<Snippet>,
    /// Deduplicated, in order of first detection
    pub root_causes: Vec<String>,
    /// Deduplicated, in order of first detection
    pub recommendations: Vec<String>,
    pub service: String,
    pub severity: Severity,
}

impl ContextBundle {
    /// Snippet contents in rank order, as handed to plan generation
    pub fn runbook_texts(&self) -> Vec<String> {
        self.runbook_snippets
            .iter()
            .map(|snippet| snippet.content.clone())
            .collect()
    }
}

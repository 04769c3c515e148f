//! Inbound alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signal describing a suspected infrastructure problem.
///
/// Alerts are created by an external source and are never mutated once
/// handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Affected service
    #[serde(default)]
    pub service: String,

    /// Alert severity
    #[serde(default)]
    pub severity: Severity,

    /// Free-text description from the alert source
    #[serde(default)]
    pub description: String,

    /// Numeric metrics attached to the alert (e.g. `cpu`, `memory`, `error_rate`)
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,

    /// Alert type as reported by the source (e.g. `pod_failure`)
    #[serde(default, rename = "type")]
    pub alert_type: String,

    /// When the alert fired
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(service: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            severity: Severity::default(),
            description: description.into(),
            metrics: BTreeMap::new(),
            alert_type: String::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_type(mut self, alert_type: impl Into<String>) -> Self {
        self.alert_type = alert_type.into();
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Value of a metric, `0.0` when absent
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }
}

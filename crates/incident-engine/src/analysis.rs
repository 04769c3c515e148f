//! Alert analysis
//!
//! Turns an alert into a [`ContextBundle`]: builds a retrieval query,
//! fetches runbook snippets, and infers root causes and recommendations
//! with keyword rules.

use crate::retrieval::ContextRetriever;
use incident_types::{Alert, ContextBundle, Snippet};
use std::sync::Arc;
use tracing::{debug, warn};

pub const UNKNOWN_ROOT_CAUSE: &str = "Unknown root cause - requires investigation";
pub const DEFAULT_RECOMMENDATION: &str = "Review runbook sections for remediation steps";

/// Metric value above which CPU or memory counts as saturated
const SATURATION_PERCENT: f64 = 90.0;

/// Snippets considered for recommendations
const RECOMMENDATION_SNIPPETS: usize = 3;

/// Builds context bundles with a retrieval collaborator
pub struct Analyst {
    retriever: Arc<dyn ContextRetriever>,
    top_k: usize,
}

impl Analyst {
    pub fn new(retriever: Arc<dyn ContextRetriever>, top_k: usize) -> Self {
        Self { retriever, top_k }
    }

    /// Analyze an alert. A retrieval failure degrades to no snippets.
    pub async fn analyze(&self, alert: &Alert) -> ContextBundle {
        let query = build_query(alert);

        let snippets = match self.retriever.retrieve(&query, self.top_k).await {
            Ok(snippets) => snippets,
            Err(e) => {
                warn!(
                    retriever = self.retriever.name(),
                    error = %e,
                    "Context retrieval failed, continuing without runbook snippets"
                );
                Vec::new()
            }
        };

        debug!(query = %query, snippets = snippets.len(), "Context retrieved");

        ContextBundle {
            alert: alert.clone(),
            summary: summarize(alert, &snippets),
            root_causes: identify_root_causes(alert, &snippets),
            recommendations: recommend(&snippets),
            runbook_snippets: snippets,
            service: if alert.service.is_empty() {
                "unknown".to_string()
            } else {
                alert.service.clone()
            },
            severity: alert.severity,
        }
    }
}

/// Retrieval query: service, description and type, expanded with keywords
/// suggested by the alert's metric names
pub fn build_query(alert: &Alert) -> String {
    let metric_names = alert
        .metrics
        .keys()
        .map(|name| name.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut parts: Vec<&str> = [
        alert.service.as_str(),
        alert.description.as_str(),
        alert.alert_type.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect();

    if metric_names.contains("cpu") {
        parts.push("high CPU usage");
    }
    if metric_names.contains("memory") || metric_names.contains("mem") {
        parts.push("memory leak");
    }
    if alert.metrics.contains_key("error_rate") || metric_names.contains("errors") {
        parts.push("error rate");
    }

    parts.join(" ")
}

/// Rule-based root causes from the alert and snippet text.
///
/// Deduplicated in order of first detection; never empty.
pub fn identify_root_causes(alert: &Alert, snippets: &[Snippet]) -> Vec<String> {
    let description = alert.description.to_lowercase();
    let mut causes = Vec::new();

    if description.contains("pod") && (description.contains("crash") || description.contains("failure")) {
        causes.push("Pod crash or OOM kill");
    }
    if description.contains("cpu") || alert.metric("cpu") > SATURATION_PERCENT {
        causes.push("High CPU usage - possible resource exhaustion");
    }
    if description.contains("memory") || alert.metric("memory") > SATURATION_PERCENT {
        causes.push("Memory leak or insufficient memory allocation");
    }
    if description.contains("timeout") {
        causes.push("Network or database timeout");
    }
    if description.contains("error") || description.contains("exception") {
        causes.push("Application error or exception");
    }

    for snippet in snippets {
        let content = snippet.content.to_lowercase();
        if content.contains("memory leak") {
            causes.push("Memory leak (from runbook)");
        }
        if content.contains("cpu") && content.contains("high") {
            causes.push("High CPU usage (from runbook)");
        }
    }

    let causes = dedup(causes);
    if causes.is_empty() {
        vec![UNKNOWN_ROOT_CAUSE.to_string()]
    } else {
        causes
    }
}

/// One-paragraph summary of the alert
pub fn summarize(alert: &Alert, snippets: &[Snippet]) -> String {
    let service = if alert.service.is_empty() {
        "unknown service"
    } else {
        alert.service.as_str()
    };
    let description = if alert.description.is_empty() {
        "No description"
    } else {
        alert.description.as_str()
    };

    let mut summary = format!(
        "Alert for {} ({} severity): {}",
        service, alert.severity, description
    );
    if !snippets.is_empty() {
        summary.push_str(&format!(
            "\n\nFound {} relevant runbook sections.",
            snippets.len()
        ));
    }
    summary
}

/// Recommendations from the top-ranked snippets
pub fn recommend(snippets: &[Snippet]) -> Vec<String> {
    let mut recommendations = Vec::new();

    for snippet in snippets.iter().take(RECOMMENDATION_SNIPPETS) {
        let content = snippet.content.to_lowercase();
        if content.contains("restart") {
            recommendations.push("Consider restarting affected pods");
        }
        if content.contains("scale") {
            recommendations.push("Consider scaling up resources");
        }
        if content.contains("cache") {
            recommendations.push("Consider clearing cache");
        }
    }

    let recommendations = dedup(recommendations);
    if recommendations.is_empty() {
        vec![DEFAULT_RECOMMENDATION.to_string()]
    } else {
        recommendations
    }
}

fn dedup(items: Vec<&str>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.iter().any(|seen| seen == item) {
            unique.push(item.to_string());
        }
    }
    unique
}

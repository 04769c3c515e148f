//! Incident records held and returned by the orchestrator

use chrono::{DateTime, Utc};
use incident_audit::AuditResult;
use incident_executor::ExecutionResult;
use incident_types::{Alert, ContextBundle, IncidentId, Plan};
use serde::{Deserialize, Serialize};

/// An incident opened by `process_incident`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub alert: Alert,
    pub context: ContextBundle,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Analyzed, planned and audited; not executed
    Planned,
}

/// Outcome of analyzing, planning and auditing one alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentResponse {
    pub incident_id: IncidentId,
    pub alert: Alert,
    pub context_bundle: ContextBundle,
    pub plan: Plan,
    pub audit: AuditResult,
    pub status: ResponseStatus,
    pub timestamp: DateTime<Utc>,
}

/// The orchestrator's single in-flight incident.
///
/// Replaced wholesale by each `process_incident` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentState {
    pub incident: Option<Incident>,
    pub plan: Option<Plan>,
    pub execution: Option<ExecutionResult>,
}

impl IncidentState {
    pub fn is_empty(&self) -> bool {
        self.incident.is_none() && self.plan.is_none() && self.execution.is_none()
    }
}

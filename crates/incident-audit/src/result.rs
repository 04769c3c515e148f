//! Audit outcome types

use incident_types::StepId;
use serde::{Deserialize, Serialize};

/// A step whose risk exceeds the policy threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighRiskStep {
    pub step_id: StepId,
    pub action: String,
    pub risk_score: f64,
}

/// Risk details gathered while auditing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Plan total risk as evaluated; absent when the audit short-circuited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_risk: Option<f64>,

    /// Steps above the threshold; only present when there are any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_risk_steps: Option<Vec<HighRiskStep>>,

    /// Steps whose action looks destructive; only present when there are any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destructive_steps: Option<Vec<StepId>>,
}

/// Result of auditing a plan.
///
/// `approved` is true iff there are no errors and manual approval is not
/// required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub approved: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_assessment: RiskAssessment,
    pub requires_manual_approval: bool,
}

impl AuditResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Short status line for logs and CLI output
    pub fn verdict(&self) -> &'static str {
        if self.approved {
            "approved"
        } else if self.has_errors() {
            "rejected"
        } else {
            "requires manual approval"
        }
    }

    pub(crate) fn decide(&mut self) {
        self.approved = self.errors.is_empty() && !self.requires_manual_approval;
    }
}

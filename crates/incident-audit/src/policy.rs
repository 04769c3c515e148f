//! Audit policy configuration

use serde::{Deserialize, Serialize};

/// Risk policy a plan is audited against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPolicy {
    /// Risk above which a plan or step needs manual approval
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: f64,

    /// Force manual approval for every plan
    #[serde(default = "default_true")]
    pub require_approval: bool,
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            risk_threshold: default_risk_threshold(),
            require_approval: true,
        }
    }
}

impl AuditPolicy {
    /// Policy that only gates on risk and destructive operations
    pub fn with_threshold(risk_threshold: f64) -> Self {
        Self {
            risk_threshold,
            require_approval: false,
        }
    }
}

fn default_risk_threshold() -> f64 {
    0.7
}

fn default_true() -> bool {
    true
}

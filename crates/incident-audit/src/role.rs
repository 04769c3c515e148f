//! Role-based approval

use incident_types::Plan;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Plans below this total risk are low risk
const LOW_RISK_BELOW: f64 = 0.3;

/// Plans below this total risk are medium risk
const MEDIUM_RISK_BELOW: f64 = 0.7;

/// What a role may approve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    All,
    LowRisk,
    MediumRisk,
}

/// Operator role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Sre,
    Engineer,
    Viewer,
    /// Any role name not known to the policy; has no permissions
    Other(String),
}

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin | Role::Sre => &[Permission::All],
            Role::Engineer => &[Permission::LowRisk, Permission::MediumRisk],
            Role::Viewer | Role::Other(_) => &[],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "sre" => Role::Sre,
            "engineer" => Role::Engineer,
            "viewer" => Role::Viewer,
            _ => Role::Other(s.to_string()),
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Sre => f.write_str("sre"),
            Role::Engineer => f.write_str("engineer"),
            Role::Viewer => f.write_str("viewer"),
            Role::Other(name) => f.write_str(name),
        }
    }
}

/// Whether `role` may approve execution of `plan`.
///
/// `All` always passes. Otherwise the plan's total risk must fall in a band
/// the role holds: below 0.3 for `LowRisk`, below 0.7 for `MediumRisk`.
pub fn validate_role(role: &Role, plan: &Plan) -> bool {
    if role.has_permission(Permission::All) {
        return true;
    }

    let total_risk = plan.total_risk_score;
    if total_risk < LOW_RISK_BELOW && role.has_permission(Permission::LowRisk) {
        return true;
    }
    if total_risk < MEDIUM_RISK_BELOW && role.has_permission(Permission::MediumRisk) {
        return true;
    }

    false
}

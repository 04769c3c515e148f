//! Remediation plans
//!
//! A plan is an ordered list of steps plus aggregate risk metadata. The
//! list order is the nominal execution order; step ids are unique within a
//! plan and dependencies reference ids of the same plan.

use crate::error::PlanIngestError;
use crate::ids::{PlanId, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Tool parameters as handed to the execution backend
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Risk assumed for a step whose generator did not provide one
pub const DEFAULT_STEP_RISK: f64 = 0.5;

fn default_risk() -> f64 {
    DEFAULT_STEP_RISK
}

/// One remediation action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub action: String,
    pub tool: String,
    #[serde(default)]
    pub parameters: Parameters,
    /// Compensating instruction attempted if the step fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback: Option<String>,
    /// Risk in `[0, 1]`
    #[serde(default = "default_risk")]
    pub risk_score: f64,
    #[serde(default)]
    pub dependencies: BTreeSet<StepId>,
}

impl Step {
    pub fn new(id: impl Into<StepId>, action: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            tool: tool.into(),
            parameters: Parameters::new(),
            rollback: None,
            risk_score: DEFAULT_STEP_RISK,
            dependencies: BTreeSet::new(),
        }
    }

    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_rollback(mut self, instruction: impl Into<String>) -> Self {
        self.rollback = Some(instruction.into());
        self
    }

    pub fn with_risk(mut self, risk_score: f64) -> Self {
        self.risk_score = risk_score;
        self
    }

    pub fn depends_on(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.dependencies.extend(ids.into_iter().map(StepId));
        self
    }

    pub fn has_rollback(&self) -> bool {
        self.rollback.is_some()
    }
}

/// Ordered remediation steps plus aggregate risk metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub id: PlanId,
    pub summary: String,
    pub steps: Vec<Step>,
    /// Expected to equal the maximum step risk; not enforced
    pub total_risk_score: f64,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub root_causes: Vec<String>,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub alert_summary: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Create a plan whose total risk is the maximum step risk
    pub fn new(summary: impl Into<String>, steps: Vec<Step>) -> Self {
        let total_risk_score = max_risk(&steps);
        Self {
            id: PlanId::default(),
            summary: summary.into(),
            steps,
            total_risk_score,
            requires_approval: false,
            reasoning: String::new(),
            root_causes: Vec::new(),
            service: String::new(),
            alert_summary: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: PlanId) -> Self {
        self.id = id;
        self
    }

    pub fn with_total_risk(mut self, total_risk_score: f64) -> Self {
        self.total_risk_score = total_risk_score;
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Maximum risk over all steps, `0.0` for an empty plan
    pub fn max_step_risk(&self) -> f64 {
        max_risk(&self.steps)
    }

    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn contains_step(&self, id: StepId) -> bool {
        self.step(id).is_some()
    }

    pub fn step_ids(&self) -> impl Iterator<Item = StepId> + '_ {
        self.steps.iter().map(|step| step.id)
    }

    /// Check the structural invariants: unique step ids, and dependencies
    /// that only reference steps of this plan.
    pub fn validate(&self) -> Result<(), PlanIngestError> {
        let mut seen = HashSet::with_capacity(self.steps.len());
        for step in &self.steps {
            if !seen.insert(step.id) {
                return Err(PlanIngestError::DuplicateStepId(step.id));
            }
        }

        for step in &self.steps {
            if let Some(missing) = step.dependencies.iter().find(|dep| !seen.contains(dep)) {
                return Err(PlanIngestError::UnknownDependency {
                    step: step.id,
                    dependency: *missing,
                });
            }
        }

        Ok(())
    }
}

fn max_risk(steps: &[Step]) -> f64 {
    steps
        .iter()
        .map(|step| step.risk_score)
        .fold(0.0, f64::max)
}

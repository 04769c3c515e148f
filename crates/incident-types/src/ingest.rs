//! Typed ingestion of generator output
//!
//! Generators emit JSON-shaped plans where any field may be missing. The raw
//! records below mirror that shape with every field optional; conversion
//! applies the declared defaults and then checks the plan's structural
//! invariants.

use crate::error::PlanIngestError;
use crate::ids::{PlanId, StepId};
use crate::plan::{Parameters, Plan, Step, DEFAULT_STEP_RISK};
use serde::Deserialize;
use std::collections::BTreeSet;

const DEFAULT_SUMMARY: &str = "Remediation plan";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlan {
    id: Option<String>,
    summary: Option<String>,
    steps: Option<Vec<RawStep>>,
    total_risk_score: Option<f64>,
    requires_approval: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStep {
    id: Option<u32>,
    action: Option<String>,
    tool: Option<String>,
    parameters: Option<Parameters>,
    rollback: Option<String>,
    risk_score: Option<f64>,
    dependencies: Option<Vec<u32>>,
}

impl RawStep {
    fn into_step(self, position: usize) -> Step {
        Step {
            id: StepId(self.id.unwrap_or(position as u32 + 1)),
            action: self.action.unwrap_or_default(),
            tool: self.tool.unwrap_or_default(),
            parameters: self.parameters.unwrap_or_default(),
            rollback: self.rollback.and_then(normalize_rollback),
            risk_score: normalize_risk(self.risk_score, DEFAULT_STEP_RISK),
            dependencies: self
                .dependencies
                .unwrap_or_default()
                .into_iter()
                .map(StepId)
                .collect::<BTreeSet<_>>(),
        }
    }
}

impl Plan {
    /// Build a plan from generator output.
    ///
    /// Defaults: summary "Remediation plan", step id = position + 1, step
    /// risk 0.5, no dependencies, no parameters. The total risk defaults to
    /// the maximum step risk; a supplied total is kept even when it
    /// disagrees with the steps. Risks are clamped to `[0, 1]`. Rollback
    /// instructions that are empty or "None" are treated as absent.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PlanIngestError> {
        if !value.is_object() {
            return Err(PlanIngestError::MissingSteps);
        }

        let raw: RawPlan = serde_json::from_value(value)?;
        let raw_steps = raw.steps.ok_or(PlanIngestError::MissingSteps)?;

        let steps: Vec<Step> = raw_steps
            .into_iter()
            .enumerate()
            .map(|(position, raw_step)| raw_step.into_step(position))
            .collect();

        let mut plan = Plan::new(
            raw.summary
                .filter(|summary| !summary.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            steps,
        );

        let derived_total = plan.max_step_risk();
        plan.total_risk_score = normalize_risk(raw.total_risk_score, derived_total);
        plan.requires_approval = raw.requires_approval.unwrap_or(false);
        if let Some(id) = raw.id {
            plan.id = PlanId::new(id);
        }

        plan.validate()?;
        Ok(plan)
    }

    /// Parse generator output from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, PlanIngestError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }
}

fn normalize_risk(risk: Option<f64>, default: f64) -> f64 {
    match risk {
        Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
        _ => default,
    }
}

fn normalize_rollback(instruction: String) -> Option<String> {
    let trimmed = instruction.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(instruction)
    }
}

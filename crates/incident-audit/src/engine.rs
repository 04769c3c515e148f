//! Audit engine: gates a plan through risk policy

use crate::policy::AuditPolicy;
use crate::result::{AuditResult, HighRiskStep};
use crate::role::{validate_role, Role};
use incident_types::{Plan, StepId};
use tracing::debug;

/// Action substrings that mark a step as potentially destructive
pub const DESTRUCTIVE_TOKENS: [&str; 5] = ["delete", "kill", "terminate", "destroy", "drop"];

/// Steps above this risk should carry a rollback instruction
const ROLLBACK_RECOMMENDED_ABOVE: f64 = 0.3;

/// Evaluates plans against an [`AuditPolicy`]
#[derive(Debug, Clone, Default)]
pub struct AuditEngine {
    policy: AuditPolicy,
}

impl AuditEngine {
    pub fn new(policy: AuditPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AuditPolicy {
        &self.policy
    }

    /// Audit a plan. Deterministic and side-effect free.
    pub fn audit_plan(&self, plan: &Plan) -> AuditResult {
        let threshold = self.policy.risk_threshold;
        let mut result = AuditResult::default();

        if plan.steps.is_empty() {
            result.errors.push("Plan contains no steps".to_string());
            result.decide();
            debug!(plan_id = %plan.id, "Audit rejected empty plan");
            return result;
        }

        let total_risk = plan.total_risk_score;
        result.risk_assessment.total_risk = Some(total_risk);
        if total_risk > threshold {
            result.warnings.push(format!(
                "Total risk score ({:.2}) exceeds threshold ({:.2})",
                total_risk, threshold
            ));
            result.requires_manual_approval = true;
        }

        let high_risk_steps: Vec<HighRiskStep> = plan
            .steps
            .iter()
            .filter(|step| step.risk_score > threshold)
            .map(|step| HighRiskStep {
                step_id: step.id,
                action: step.action.clone(),
                risk_score: step.risk_score,
            })
            .collect();
        if !high_risk_steps.is_empty() {
            result.warnings.push(format!(
                "Found {} high-risk steps requiring review",
                high_risk_steps.len()
            ));
            result.risk_assessment.high_risk_steps = Some(high_risk_steps);
            result.requires_manual_approval = true;
        }

        let without_rollback = plan
            .steps
            .iter()
            .filter(|step| step.risk_score > ROLLBACK_RECOMMENDED_ABOVE && !step.has_rollback())
            .count();
        if without_rollback > 0 {
            result.recommendations.push(format!(
                "Consider adding rollback instructions for {} risky steps",
                without_rollback
            ));
        }

        let destructive_steps: Vec<StepId> = plan
            .steps
            .iter()
            .filter(|step| is_destructive(&step.action))
            .map(|step| step.id)
            .collect();
        if !destructive_steps.is_empty() {
            result.warnings.push(format!(
                "Plan contains potentially destructive operations in steps: [{}]",
                join_ids(&destructive_steps)
            ));
            result.risk_assessment.destructive_steps = Some(destructive_steps);
            result.requires_manual_approval = true;
        }

        if self.policy.require_approval {
            result.requires_manual_approval = true;
        }

        result.decide();

        debug!(
            plan_id = %plan.id,
            approved = result.approved,
            warnings = result.warnings.len(),
            requires_manual_approval = result.requires_manual_approval,
            "Plan audited"
        );

        result
    }

    /// Whether `role` may approve execution of `plan`
    pub fn validate_role(&self, role: &Role, plan: &Plan) -> bool {
        validate_role(role, plan)
    }
}

/// Case-insensitive scan for any destructive token
pub fn is_destructive(action: &str) -> bool {
    let action = action.to_lowercase();
    DESTRUCTIVE_TOKENS.iter().any(|token| action.contains(token))
}

fn join_ids(ids: &[StepId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_types::Step;

    fn engine(threshold: f64, require_approval: bool) -> AuditEngine {
        AuditEngine::new(AuditPolicy {
            risk_threshold: threshold,
            require_approval,
        })
    }

    fn safe_step(id: u32) -> Step {
        Step::new(id, "Check pod status", "shell-command")
            .with_risk(0.1)
            .with_rollback("none required")
    }

    #[test]
    fn test_empty_plan_short_circuits() {
        let plan = Plan::new("empty", vec![]);
        let result = engine(0.7, true).audit_plan(&plan);

        assert_eq!(result.errors, vec!["Plan contains no steps".to_string()]);
        assert!(!result.approved);
        assert!(!result.requires_manual_approval);
        assert!(result.warnings.is_empty());
        assert!(result.recommendations.is_empty());
        assert!(result.risk_assessment.high_risk_steps.is_none());
        assert!(result.risk_assessment.total_risk.is_none());
    }

    #[test]
    fn test_low_risk_plan_approved_without_policy_approval() {
        let plan = Plan::new("inspect", vec![safe_step(1), safe_step(2)]);
        let result = engine(0.7, false).audit_plan(&plan);

        assert!(result.approved);
        assert!(result.warnings.is_empty());
        assert!(!result.requires_manual_approval);
        assert_eq!(result.risk_assessment.total_risk, Some(0.1));
    }

    #[test]
    fn test_policy_approval_forces_manual_approval() {
        let plan = Plan::new("inspect", vec![safe_step(1)]);
        let result = engine(0.7, true).audit_plan(&plan);

        assert!(result.requires_manual_approval);
        assert!(!result.approved);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_high_risk_plan() {
        let plan = Plan::new(
            "restart",
            vec![
                Step::new(1, "Check pods", "shell-command").with_risk(0.2),
                Step::new(2, "Restart deployment", "shell-command")
                    .with_risk(0.9)
                    .depends_on([1]),
            ],
        );
        let result = engine(0.7, false).audit_plan(&plan);

        assert!(result
            .warnings
            .contains(&"Total risk score (0.90) exceeds threshold (0.70)".to_string()));
        assert!(result
            .warnings
            .contains(&"Found 1 high-risk steps requiring review".to_string()));
        let high = result.risk_assessment.high_risk_steps.as_ref().unwrap();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].step_id, StepId(2));
        assert!(result.requires_manual_approval);
        assert!(!result.approved);
    }

    #[test]
    fn test_understated_total_still_flags_steps() {
        let plan = Plan::new(
            "understated",
            vec![Step::new(1, "Failover database", "shell-command").with_risk(0.95)],
        )
        .with_total_risk(0.1);
        let result = engine(0.7, false).audit_plan(&plan);

        assert_eq!(result.warnings.len(), 1);
        assert!(result.requires_manual_approval);
        assert!(!result.approved);
    }

    #[test]
    fn test_destructive_action_requires_approval() {
        let plan = Plan::new(
            "cleanup",
            vec![Step::new(1, "delete old backups", "shell-command").with_risk(0.1)],
        );
        let result = engine(0.7, false).audit_plan(&plan);

        assert!(result.requires_manual_approval);
        assert!(!result.approved);
        assert_eq!(
            result.warnings,
            vec!["Plan contains potentially destructive operations in steps: [1]".to_string()]
        );
        assert_eq!(result.risk_assessment.destructive_steps, Some(vec![StepId(1)]));
    }

    #[test]
    fn test_destructive_scan_is_case_insensitive() {
        assert!(is_destructive("KILL stuck worker"));
        assert!(is_destructive("Drop temp tables"));
        assert!(is_destructive("Terminate node"));
        assert!(!is_destructive("Restart pod"));
    }

    #[test]
    fn test_rollback_recommendation_does_not_block() {
        let plan = Plan::new(
            "scale",
            vec![
                Step::new(1, "Scale replicas", "shell-command").with_risk(0.5),
                Step::new(2, "Raise limits", "shell-command").with_risk(0.4),
                Step::new(3, "Check", "shell-command").with_risk(0.3),
            ],
        );
        let result = engine(0.7, false).audit_plan(&plan);

        assert_eq!(
            result.recommendations,
            vec!["Consider adding rollback instructions for 2 risky steps".to_string()]
        );
        assert!(result.approved);
    }

    #[test]
    fn test_audit_is_idempotent() {
        let plan = Plan::new(
            "mixed",
            vec![
                Step::new(1, "Kill runaway process", "shell-command").with_risk(0.6),
                Step::new(2, "Scale", "shell-command").with_risk(0.8),
            ],
        );
        let engine = engine(0.7, true);
        assert_eq!(engine.audit_plan(&plan), engine.audit_plan(&plan));
    }
}

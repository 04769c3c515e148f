//! Property tests: audit verdicts follow the risk policy for arbitrary plans.

use incident_audit::{AuditEngine, AuditPolicy, DESTRUCTIVE_TOKENS};
use incident_types::{Plan, Step};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Generate an action that never contains a destructive token.
fn arb_benign_action() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Restart pod"),
        Just("Scale deployment"),
        Just("Check logs"),
        Just("Flush cache"),
        Just("Rotate credentials"),
    ]
    .prop_map(String::from)
}

/// Generate a step list with sequential ids.
fn arb_steps(min: usize, max: usize) -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        (arb_benign_action(), 0.0f64..=1.0, any::<bool>()),
        min..max,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (action, risk, rollback))| {
                let step = Step::new(i as u32 + 1, action, "shell-command").with_risk(risk);
                if rollback {
                    step.with_rollback("Undo previous action")
                } else {
                    step
                }
            })
            .collect()
    })
}

fn arb_policy() -> impl Strategy<Value = AuditPolicy> {
    (0.0f64..=1.0, any::<bool>()).prop_map(|(risk_threshold, require_approval)| AuditPolicy {
        risk_threshold,
        require_approval,
    })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Approval holds exactly when there are no errors and no manual approval.
    #[test]
    fn approved_iff_clean(steps in arb_steps(0, 8), policy in arb_policy()) {
        let result = AuditEngine::new(policy).audit_plan(&Plan::new("plan", steps));
        prop_assert_eq!(
            result.approved,
            result.errors.is_empty() && !result.requires_manual_approval
        );
    }

    /// A total risk above the threshold never passes without a human.
    #[test]
    fn risk_above_threshold_needs_approval(steps in arb_steps(1, 8), policy in arb_policy()) {
        let plan = Plan::new("plan", steps);
        let result = AuditEngine::new(policy.clone()).audit_plan(&plan);
        if plan.total_risk_score > policy.risk_threshold {
            prop_assert!(result.requires_manual_approval);
            prop_assert!(!result.approved);
        }
    }

    /// Any step above the threshold is listed as high risk.
    #[test]
    fn high_risk_steps_are_listed(steps in arb_steps(1, 8), policy in arb_policy()) {
        let plan = Plan::new("plan", steps).with_total_risk(0.0);
        let result = AuditEngine::new(policy.clone()).audit_plan(&plan);
        let expected = plan
            .steps
            .iter()
            .filter(|step| step.risk_score > policy.risk_threshold)
            .count();
        let listed = result
            .risk_assessment
            .high_risk_steps
            .as_ref()
            .map(Vec::len)
            .unwrap_or(0);
        prop_assert_eq!(listed, expected);
        if expected > 0 {
            prop_assert!(!result.approved);
        }
    }

    /// A destructive token anywhere in an action forces manual approval.
    #[test]
    fn destructive_action_needs_approval(
        steps in arb_steps(0, 6),
        token in prop::sample::select(DESTRUCTIVE_TOKENS.to_vec()),
        upper in any::<bool>(),
    ) {
        let word = if upper { token.to_uppercase() } else { token.to_string() };
        let mut steps = steps;
        let id = steps.len() as u32 + 1;
        steps.push(Step::new(id, format!("{} stale resources", word), "shell-command").with_risk(0.0));

        let result = AuditEngine::new(AuditPolicy::with_threshold(1.0))
            .audit_plan(&Plan::new("plan", steps));
        prop_assert!(result.requires_manual_approval);
        prop_assert!(!result.approved);
        let destructive = result.risk_assessment.destructive_steps.unwrap_or_default();
        prop_assert!(destructive.iter().any(|step| step.0 == id));
    }

    /// Auditing has no hidden state.
    #[test]
    fn audit_is_deterministic(steps in arb_steps(0, 8), policy in arb_policy()) {
        let engine = AuditEngine::new(policy);
        let plan = Plan::new("plan", steps);
        prop_assert_eq!(engine.audit_plan(&plan), engine.audit_plan(&plan));
    }
}

#[test]
fn empty_plan_has_exactly_one_error() {
    for require_approval in [true, false] {
        let engine = AuditEngine::new(AuditPolicy {
            risk_threshold: 0.7,
            require_approval,
        });
        let result = engine.audit_plan(&Plan::new("nothing", vec![]));
        assert_eq!(result.errors.len(), 1);
        assert!(!result.approved);
    }
}

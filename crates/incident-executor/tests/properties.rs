//! Property tests: execution results stay consistent with the plan for
//! arbitrary dependency graphs and failure patterns.

use incident_executor::mocks::ScriptedBackend;
use incident_executor::{ExecutionResult, ExecutionStatus, SchedulingMode, StepExecutor};
use incident_types::{Plan, Step, StepId};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// A plan of up to 8 steps with random (possibly forward or cyclic)
/// dependencies, plus the set of step ids whose tool fails.
fn arb_plan() -> impl Strategy<Value = (Plan, HashSet<u32>)> {
    (1usize..8)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec(1..=n as u32, 0..3), n),
                prop::collection::vec(1..=n as u32, 0..n),
            )
        })
        .prop_map(|(deps, failing)| {
            let failing: HashSet<u32> = failing.into_iter().collect();
            let steps = deps
                .into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    let id = i as u32 + 1;
                    Step::new(id, format!("step {}", id), format!("tool-{}", id))
                        .depends_on(deps.into_iter().filter(|dep| *dep != id))
                })
                .collect();
            (Plan::new("generated", steps), failing)
        })
}

fn arb_mode() -> impl Strategy<Value = SchedulingMode> {
    prop_oneof![Just(SchedulingMode::DependencyOrder), Just(SchedulingMode::SinglePass)]
}

fn run(plan: &Plan, failing: &HashSet<u32>, mode: SchedulingMode, step_by_step: bool) -> ExecutionResult {
    let backend = failing
        .iter()
        .fold(ScriptedBackend::new(), |backend, id| backend.failing(format!("tool-{}", id)));
    let mut executor = StepExecutor::new(Arc::new(backend)).with_mode(mode);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(executor.execute_plan(plan, step_by_step))
}

fn position(ids: &[StepId], id: StepId) -> Option<usize> {
    ids.iter().position(|candidate| *candidate == id)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Executed and failed are disjoint and only name steps of the plan.
    #[test]
    fn executed_and_failed_are_disjoint(
        (plan, failing) in arb_plan(),
        mode in arb_mode(),
        step_by_step in any::<bool>(),
    ) {
        let result = run(&plan, &failing, mode, step_by_step);
        let ids: HashSet<StepId> = plan.step_ids().collect();

        for id in &result.steps_executed {
            prop_assert!(!result.steps_failed.contains(id));
            prop_assert!(ids.contains(id));
        }
        for id in &result.steps_failed {
            prop_assert!(ids.contains(id));
        }
    }

    /// A step only succeeds after all of its dependencies succeeded.
    #[test]
    fn dependencies_succeed_first(
        (plan, failing) in arb_plan(),
        mode in arb_mode(),
    ) {
        let result = run(&plan, &failing, mode, false);
        let attempted: Vec<StepId> = result
            .logs
            .iter()
            .filter_map(|entry| entry.message.strip_prefix("Executing: step "))
            .filter_map(|id| id.parse().ok().map(StepId))
            .collect();

        for step in &plan.steps {
            let Some(at) = position(&attempted, step.id) else { continue };
            for dep in &step.dependencies {
                let dep_at = position(&attempted, *dep);
                prop_assert!(result.was_executed(*dep));
                prop_assert!(dep_at.map_or(false, |dep_at| dep_at < at));
            }
        }
    }

    /// Step-by-step runs stop at the first failure.
    #[test]
    fn step_by_step_pauses_at_first_failure(
        (plan, failing) in arb_plan(),
        mode in arb_mode(),
    ) {
        let result = run(&plan, &failing, mode, true);
        if result.steps_failed.is_empty() {
            prop_assert_ne!(result.status, ExecutionStatus::Paused);
        } else {
            prop_assert_eq!(result.status, ExecutionStatus::Paused);
            prop_assert_eq!(result.steps_failed.len(), 1);
            let last = result.logs.iter().rev().find(|entry| entry.message.starts_with("Executing: "));
            prop_assert_eq!(
                last.map(|entry| entry.message.clone()),
                Some(format!("Executing: step {}", result.steps_failed[0]))
            );
        }
    }

    /// Final status follows the step lists when the run is not paused.
    #[test]
    fn status_is_derived(
        (plan, failing) in arb_plan(),
        mode in arb_mode(),
    ) {
        let result = run(&plan, &failing, mode, false);
        let expected = if result.steps_failed.is_empty() {
            ExecutionStatus::Completed
        } else if result.steps_executed.is_empty() {
            ExecutionStatus::Failed
        } else {
            ExecutionStatus::Partial
        };
        prop_assert_eq!(result.status, expected);
    }

    /// Every step is accounted for exactly once under the ready queue.
    #[test]
    fn dependency_order_accounts_for_every_step((plan, failing) in arb_plan()) {
        let result = run(&plan, &failing, SchedulingMode::DependencyOrder, false);
        let total = result.steps_executed.len() + result.steps_failed.len() + result.steps_skipped.len();
        prop_assert_eq!(total, plan.steps.len());
    }
}

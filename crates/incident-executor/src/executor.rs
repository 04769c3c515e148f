//! Step executor
//!
//! Runs a plan's steps against an [`ExecutionBackend`], honoring
//! dependencies, rollback instructions and pause-on-failure. Backend errors
//! never escape: they are turned into failed steps.

use crate::backend::{ExecutionBackend, RollbackStatus, ToolResult};
use crate::record::{ExecutionResult, ExecutionStatus, LogLevel, StepOutcome};
use crate::scheduler::{Dispatch, Scheduler, SchedulingMode};
use incident_types::{Plan, PlanId, Step, StepId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Executes plans one step at a time
pub struct StepExecutor {
    backend: Arc<dyn ExecutionBackend>,
    mode: SchedulingMode,
    history: Vec<StepOutcome>,
}

impl StepExecutor {
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        Self {
            backend,
            mode: SchedulingMode::default(),
            history: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: SchedulingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> SchedulingMode {
        self.mode
    }

    pub fn backend(&self) -> &Arc<dyn ExecutionBackend> {
        &self.backend
    }

    /// Every step invocation across all runs, oldest first
    pub fn history(&self) -> &[StepOutcome] {
        &self.history
    }

    /// Execute a whole plan.
    ///
    /// With `step_by_step`, the first failure pauses the run: no further
    /// step is dispatched and the status is `paused`.
    pub async fn execute_plan(&mut self, plan: &Plan, step_by_step: bool) -> ExecutionResult {
        let mut result = ExecutionResult::start(plan.id.clone());
        result.log(LogLevel::Info, "Starting plan execution");

        info!(
            plan_id = %plan.id,
            steps = plan.steps.len(),
            mode = ?self.mode,
            backend = self.backend.name(),
            "Starting plan execution"
        );

        let mut scheduler = Scheduler::new(self.mode, plan);
        let mut paused = false;

        while let Some(dispatch) = scheduler.next_dispatch() {
            match dispatch {
                Dispatch::Skip { step, unmet } => {
                    warn!(plan_id = %plan.id, step_id = %step.id, ?unmet, "Step dependencies unmet");
                    result.log(
                        LogLevel::Warning,
                        format!(
                            "Step {} waiting for dependencies: {}",
                            step.id,
                            format_ids(&unmet)
                        ),
                    );
                    result.steps_skipped.push(step.id);
                }
                Dispatch::Run(step) => {
                    let succeeded = self.run_step(step, &mut result).await;
                    scheduler.complete(step.id, succeeded);

                    if !succeeded && step_by_step {
                        paused = true;
                        break;
                    }
                }
            }
        }

        if paused {
            result.status = ExecutionStatus::Paused;
            result.log(
                LogLevel::Warning,
                "Plan execution paused after step failure",
            );
        } else {
            result.status = result.derived_status();
            match result.status {
                ExecutionStatus::Completed => {
                    result.log(LogLevel::Success, "Plan execution completed successfully")
                }
                ExecutionStatus::Partial => result.log(
                    LogLevel::Warning,
                    "Plan execution completed with some failures",
                ),
                _ => result.log(LogLevel::Error, "Plan execution failed"),
            }
        }
        result.finish();

        info!(
            plan_id = %plan.id,
            status = %result.status,
            executed = result.steps_executed.len(),
            failed = result.steps_failed.len(),
            skipped = result.steps_skipped.len(),
            duration_secs = result.duration_seconds,
            "Plan execution finished"
        );

        result
    }

    /// Execute exactly one step, ignoring its dependencies.
    ///
    /// The caller tracks progress across calls.
    pub async fn execute_single_step(&mut self, step: &Step) -> ExecutionResult {
        self.execute_single_step_for(PlanId::default(), step).await
    }

    /// [`execute_single_step`](Self::execute_single_step) attributed to a plan
    pub async fn execute_single_step_for(&mut self, plan_id: PlanId, step: &Step) -> ExecutionResult {
        let mut result = ExecutionResult::start(plan_id);
        self.run_step(step, &mut result).await;
        result.finish();
        result.status = result.derived_status();
        result
    }

    /// Invoke the backend for one step and record the outcome.
    /// Returns whether the step succeeded.
    async fn run_step(&mut self, step: &Step, result: &mut ExecutionResult) -> bool {
        result.log(LogLevel::Info, format!("Executing: {}", step.action));
        debug!(step_id = %step.id, tool = %step.tool, "Executing step");

        let tool_result = match self.backend.execute(&step.tool, &step.parameters).await {
            Ok(tool_result) => tool_result,
            Err(e) => ToolResult::failure(&step.tool, e.to_string()),
        };
        let succeeded = tool_result.is_success();

        if succeeded {
            result.steps_executed.push(step.id);
            result.log(
                LogLevel::Success,
                format!("Step {} completed successfully", step.id),
            );
            info!(step_id = %step.id, "Step completed");
        } else {
            let message = tool_result.error_message();
            result.steps_failed.push(step.id);
            result.log(
                LogLevel::Error,
                format!("Step {} failed: {}", step.id, message),
            );
            error!(step_id = %step.id, error = %message, "Step failed");

            if let Some(instruction) = &step.rollback {
                self.roll_back(step.id, instruction, result).await;
            }
        }

        self.history.push(StepOutcome {
            step_id: step.id,
            action: step.action.clone(),
            result: tool_result,
        });

        succeeded
    }

    /// Attempt a rollback. Its own failure is logged and goes no further.
    async fn roll_back(&self, step_id: StepId, instruction: &str, result: &mut ExecutionResult) {
        result.log(
            LogLevel::Warning,
            format!("Rolling back step {}: {}", step_id, instruction),
        );
        warn!(step_id = %step_id, instruction, "Rolling back step");

        match self.backend.rollback(step_id).await {
            Ok(rollback) => match rollback.status {
                RollbackStatus::Success => {
                    result.rollbacks_performed.push(step_id);
                    result.log(
                        LogLevel::Info,
                        format!("Rollback for step {} completed", step_id),
                    );
                }
                RollbackStatus::Info => {
                    result.log(
                        LogLevel::Info,
                        format!("Rollback for step {} acknowledged: {}", step_id, rollback.message),
                    );
                }
                RollbackStatus::Error => {
                    result.log(
                        LogLevel::Warning,
                        format!("Rollback for step {} failed: {}", step_id, rollback.message),
                    );
                    warn!(step_id = %step_id, message = %rollback.message, "Rollback failed");
                }
            },
            Err(e) => {
                result.log(
                    LogLevel::Warning,
                    format!("Rollback for step {} failed: {}", step_id, e),
                );
                warn!(step_id = %step_id, error = %e, "Rollback failed");
            }
        }
    }
}

/// `[1, 2, 3]`
fn format_ids(ids: &[StepId]) -> String {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}

//! Step scheduling
//!
//! Decides which step of a plan runs next. Two modes:
//!
//! - [`SchedulingMode::DependencyOrder`]: a ready queue. The first pending
//!   step, in list order, whose dependencies have all succeeded runs next,
//!   regardless of where those dependencies sit in the list. A step whose
//!   dependency failed or was blocked is itself blocked. When nothing is
//!   ready but steps remain (a dependency cycle), the remaining steps are
//!   blocked one by one.
//! - [`SchedulingMode::SinglePass`]: one forward pass over the list. A step
//!   whose dependencies have not succeeded by the time the pass reaches it
//!   is skipped for the run and never revisited.

use incident_types::{Plan, Step, StepId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingMode {
    #[default]
    DependencyOrder,
    SinglePass,
}

/// Lifecycle of a step within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Blocked,
}

/// Next thing the executor should do
#[derive(Debug)]
pub enum Dispatch<'a> {
    /// Invoke the backend for this step
    Run(&'a Step),
    /// Skip this step; its dependencies cannot be satisfied in this run
    Skip {
        step: &'a Step,
        unmet: Vec<StepId>,
    },
}

/// Per-run scheduling state over a borrowed plan
#[derive(Debug)]
pub struct Scheduler<'a> {
    mode: SchedulingMode,
    steps: &'a [Step],
    states: HashMap<StepId, StepState>,
    cursor: usize,
}

impl<'a> Scheduler<'a> {
    pub fn new(mode: SchedulingMode, plan: &'a Plan) -> Self {
        let states = plan
            .steps
            .iter()
            .map(|step| (step.id, StepState::Pending))
            .collect();
        Self {
            mode,
            steps: &plan.steps,
            states,
            cursor: 0,
        }
    }

    pub fn state(&self, id: StepId) -> Option<StepState> {
        self.states.get(&id).copied()
    }

    /// Pick the next step, or `None` when the run is over
    pub fn next_dispatch(&mut self) -> Option<Dispatch<'a>> {
        match self.mode {
            SchedulingMode::SinglePass => self.next_in_list_order(),
            SchedulingMode::DependencyOrder => self.next_ready(),
        }
    }

    /// Record the outcome of a step returned as [`Dispatch::Run`]
    pub fn complete(&mut self, id: StepId, succeeded: bool) {
        let state = if succeeded {
            StepState::Succeeded
        } else {
            StepState::Failed
        };
        self.states.insert(id, state);
    }

    fn next_in_list_order(&mut self) -> Option<Dispatch<'a>> {
        let steps = self.steps;
        while let Some(step) = steps.get(self.cursor) {
            self.cursor += 1;
            if self.state(step.id) != Some(StepState::Pending) {
                continue;
            }

            let unmet = self.unmet_dependencies(step);
            if unmet.is_empty() {
                self.states.insert(step.id, StepState::Running);
                return Some(Dispatch::Run(step));
            }
            self.states.insert(step.id, StepState::Blocked);
            return Some(Dispatch::Skip { step, unmet });
        }
        None
    }

    fn next_ready(&mut self) -> Option<Dispatch<'a>> {
        let steps = self.steps;
        let mut first_pending = None;

        for step in steps {
            if self.state(step.id) != Some(StepState::Pending) {
                continue;
            }
            first_pending.get_or_insert(step);

            if self.is_doomed(step) {
                let unmet = self.unmet_dependencies(step);
                self.states.insert(step.id, StepState::Blocked);
                return Some(Dispatch::Skip { step, unmet });
            }
            if self.unmet_dependencies(step).is_empty() {
                self.states.insert(step.id, StepState::Running);
                return Some(Dispatch::Run(step));
            }
        }

        // Pending steps remain but none can ever become ready
        let step = first_pending?;
        let unmet = self.unmet_dependencies(step);
        self.states.insert(step.id, StepState::Blocked);
        Some(Dispatch::Skip { step, unmet })
    }

    fn unmet_dependencies(&self, step: &Step) -> Vec<StepId> {
        step.dependencies
            .iter()
            .copied()
            .filter(|dep| self.state(*dep) != Some(StepState::Succeeded))
            .collect()
    }

    /// A dependency failed, was blocked, or does not exist in the plan
    fn is_doomed(&self, step: &Step) -> bool {
        step.dependencies.iter().any(|dep| {
            matches!(
                self.state(*dep),
                None | Some(StepState::Failed) | Some(StepState::Blocked)
            )
        })
    }
}

//! Execution run records

use crate::backend::ToolResult;
use chrono::{DateTime, Utc};
use incident_types::{PlanId, StepId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an execution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    InProgress,
    Paused,
    Completed,
    Partial,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::InProgress => "in_progress",
            ExecutionStatus::Paused => "paused",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Partial => "partial",
            ExecutionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warning,
    Success,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Success => "success",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a run's domain log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Outcome of one execution run.
///
/// Logs are append-only. The status is derived by the executor from the
/// step lists when the run finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub plan_id: PlanId,
    pub status: ExecutionStatus,
    /// Succeeded steps, in completion order
    pub steps_executed: Vec<StepId>,
    /// Failed steps, in completion order
    pub steps_failed: Vec<StepId>,
    /// Steps never run because their dependencies were not satisfied
    #[serde(default)]
    pub steps_skipped: Vec<StepId>,
    pub rollbacks_performed: Vec<StepId>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: f64,
    pub logs: Vec<LogEntry>,
}

impl ExecutionResult {
    pub(crate) fn start(plan_id: PlanId) -> Self {
        Self {
            plan_id,
            status: ExecutionStatus::InProgress,
            steps_executed: Vec::new(),
            steps_failed: Vec::new(),
            steps_skipped: Vec::new(),
            rollbacks_performed: Vec::new(),
            start_time: Utc::now(),
            end_time: None,
            duration_seconds: 0.0,
            logs: Vec::new(),
        }
    }

    pub(crate) fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });
    }

    /// Stamp end time and duration
    pub(crate) fn finish(&mut self) {
        let end = Utc::now();
        self.duration_seconds = (end - self.start_time)
            .to_std()
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0);
        self.end_time = Some(end);
    }

    /// Status implied by the step lists, ignoring any pause
    pub fn derived_status(&self) -> ExecutionStatus {
        if self.steps_failed.is_empty() {
            ExecutionStatus::Completed
        } else if self.steps_executed.is_empty() {
            ExecutionStatus::Failed
        } else {
            ExecutionStatus::Partial
        }
    }

    pub fn is_paused(&self) -> bool {
        self.status == ExecutionStatus::Paused
    }

    pub fn was_executed(&self, step_id: StepId) -> bool {
        self.steps_executed.contains(&step_id)
    }
}

/// Record of one step invocation kept in the executor's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step_id: StepId,
    pub action: String,
    pub result: ToolResult,
}

impl StepOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_success()
    }
}

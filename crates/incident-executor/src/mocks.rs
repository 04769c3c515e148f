use std::collections::HashSet;

use async_trait::async_trait;
use incident_types::{Parameters, StepId};
use tokio::sync::Mutex;

use crate::backend::{ExecutionBackend, RollbackResult, ToolOutput, ToolResult};
use crate::error::BackendError;

/// Scripted backend for testing.
///
/// Every tool succeeds unless listed as failing (returns an error result)
/// or erroring (returns `Err`). Rollbacks succeed unless another outcome is
/// configured. Invocations are recorded in call order.
pub struct ScriptedBackend {
    failing: HashSet<String>,
    erroring: HashSet<String>,
    rollback: RollbackResult,
    calls: Mutex<Vec<String>>,
    rollbacks: Mutex<Vec<StepId>>,
    history: Mutex<Vec<ToolResult>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            failing: HashSet::new(),
            erroring: HashSet::new(),
            rollback: RollbackResult::success("rolled back"),
            calls: Mutex::new(Vec::new()),
            rollbacks: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Make `tool` return an error result
    pub fn failing(mut self, tool: impl Into<String>) -> Self {
        self.failing.insert(tool.into());
        self
    }

    /// Make `tool` raise a backend error
    pub fn erroring(mut self, tool: impl Into<String>) -> Self {
        self.erroring.insert(tool.into());
        self
    }

    /// Outcome returned by every rollback
    pub fn with_rollback(mut self, rollback: RollbackResult) -> Self {
        self.rollback = rollback;
        self
    }

    /// Tools invoked so far, in order
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Steps rolled back so far, in order
    pub async fn rollbacks(&self) -> Vec<StepId> {
        self.rollbacks.lock().await.clone()
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionBackend for ScriptedBackend {
    async fn execute(&self, tool: &str, _parameters: &Parameters) -> Result<ToolResult, BackendError> {
        self.calls.lock().await.push(tool.to_string());

        if self.erroring.contains(tool) {
            return Err(BackendError::Failed(format!("{} raised", tool)));
        }

        let result = if self.failing.contains(tool) {
            ToolResult::failure(tool, format!("{} failed", tool))
        } else {
            ToolResult::success(
                tool,
                ToolOutput {
                    message: format!("{} ok", tool),
                    return_code: Some(0),
                    ..Default::default()
                },
            )
        };
        self.history.lock().await.push(result.clone());
        Ok(result)
    }

    async fn rollback(&self, step_id: StepId) -> Result<RollbackResult, BackendError> {
        self.rollbacks.lock().await.push(step_id);
        Ok(self.rollback.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }

    async fn history(&self) -> Vec<ToolResult> {
        self.history.lock().await.clone()
    }
}

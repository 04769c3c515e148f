//! Simulated execution backend

use crate::backend::{command_parameter, ExecutionBackend, RollbackResult, ToolOutput, ToolResult};
use crate::error::BackendError;
use async_trait::async_trait;
use incident_types::{Parameters, StepId};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

const NO_COMMAND: &str = "echo \"No command specified\"";

/// Backend that pretends to run every tool successfully.
///
/// Nothing touches the host. Each call sleeps for the configured latency
/// and records its result in the backend's history.
pub struct SandboxBackend {
    latency: Duration,
    history: Mutex<Vec<ToolResult>>,
}

impl SandboxBackend {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            history: Mutex::new(Vec::new()),
        }
    }
}

impl Default for SandboxBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl ExecutionBackend for SandboxBackend {
    async fn execute(&self, tool: &str, parameters: &Parameters) -> Result<ToolResult, BackendError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let command = command_parameter(parameters).unwrap_or(NO_COMMAND);
        debug!(tool, command, "Simulating tool invocation");

        let result = ToolResult::success(
            tool,
            ToolOutput {
                message: format!("Simulated execution of: {}", command),
                stdout: format!("Fake output for: {}", command),
                stderr: String::new(),
                return_code: Some(0),
                error: None,
            },
        )
        .with_duration(self.latency.as_secs_f64());

        self.history.lock().await.push(result.clone());
        Ok(result)
    }

    async fn rollback(&self, step_id: StepId) -> Result<RollbackResult, BackendError> {
        Ok(RollbackResult::acknowledged(step_id))
    }

    fn name(&self) -> &str {
        "sandbox"
    }

    async fn history(&self) -> Vec<ToolResult> {
        self.history.lock().await.clone()
    }
}

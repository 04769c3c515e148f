//! Shell execution backend

use super::SHELL_COMMAND_TOOL;
use crate::backend::{command_parameter, ExecutionBackend, RollbackResult, ToolOutput, ToolResult};
use crate::error::BackendError;
use async_trait::async_trait;
use incident_types::{Parameters, StepId};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Backend that runs `shell-command` steps through `sh -c`.
///
/// Commands are bounded by a timeout; a timed-out command is killed and
/// reported as an error result.
pub struct ShellBackend {
    shell: String,
    timeout: Duration,
    history: Mutex<Vec<ToolResult>>,
}

impl ShellBackend {
    pub fn new(timeout: Duration) -> Self {
        Self {
            shell: "sh".to_string(),
            timeout,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Interpreter invoked as `<shell> -c <command>`
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run_shell(&self, parameters: &Parameters) -> ToolResult {
        let Some(command) = command_parameter(parameters) else {
            return ToolResult::failure(
                SHELL_COMMAND_TOOL,
                "No command specified for shell-command tool.",
            );
        };

        debug!(command, "Running shell command");

        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(command, shell = %self.shell, error = %e, "Failed to spawn shell");
                return ToolResult::failure(
                    SHELL_COMMAND_TOOL,
                    format!("Failed to run command: {}", e),
                );
            }
            Err(_) => {
                warn!(command, timeout_secs = self.timeout.as_secs(), "Shell command timed out");
                return ToolResult::failed_with_output(
                    SHELL_COMMAND_TOOL,
                    ToolOutput {
                        error: Some(format!(
                            "Command timed out after {} seconds.",
                            self.timeout.as_secs()
                        )),
                        ..Default::default()
                    },
                );
            }
        };

        let return_code = output.status.code();
        let tool_output = ToolOutput {
            message: format!(
                "Command executed with return code {}",
                return_code.map_or_else(|| "none".to_string(), |code| code.to_string())
            ),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            return_code,
            error: None,
        };

        if output.status.success() {
            ToolResult::success(SHELL_COMMAND_TOOL, tool_output)
        } else {
            ToolResult::failed_with_output(SHELL_COMMAND_TOOL, tool_output)
        }
    }
}

impl Default for ShellBackend {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

#[async_trait]
impl ExecutionBackend for ShellBackend {
    async fn execute(&self, tool: &str, parameters: &Parameters) -> Result<ToolResult, BackendError> {
        let started = Instant::now();

        let result = if tool == SHELL_COMMAND_TOOL {
            self.run_shell(parameters).await
        } else {
            ToolResult::failure(tool, format!("Unknown tool: {}", tool))
        };
        let result = result.with_duration(started.elapsed().as_secs_f64());

        self.history.lock().await.push(result.clone());
        Ok(result)
    }

    async fn rollback(&self, step_id: StepId) -> Result<RollbackResult, BackendError> {
        Ok(RollbackResult::acknowledged(step_id))
    }

    fn name(&self) -> &str {
        "shell"
    }

    async fn history(&self) -> Vec<ToolResult> {
        self.history.lock().await.clone()
    }
}

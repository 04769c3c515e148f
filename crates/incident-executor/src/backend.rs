//! Execution backend capability

use crate::error::BackendError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use incident_types::{Parameters, StepId};
use serde::{Deserialize, Serialize};

/// Tool invocation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Error,
}

/// Captured output of a tool invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `ExecutionBackend::execute`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub status: ToolStatus,
    pub tool: String,
    #[serde(default)]
    pub output: ToolOutput,
    /// Backend-level failure description, distinct from the tool's own output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

impl ToolResult {
    pub fn success(tool: impl Into<String>, output: ToolOutput) -> Self {
        Self {
            status: ToolStatus::Success,
            tool: tool.into(),
            output,
            error: None,
            duration_seconds: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Failed invocation with a backend-level error message
    pub fn failure(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            tool: tool.into(),
            output: ToolOutput::default(),
            error: Some(error.into()),
            duration_seconds: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Failed invocation whose details live in the tool output
    pub fn failed_with_output(tool: impl Into<String>, output: ToolOutput) -> Self {
        Self {
            status: ToolStatus::Error,
            ..Self::success(tool, output)
        }
    }

    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// Best available description of why the invocation failed
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.output.error.clone())
            .or_else(|| {
                let stderr = self.output.stderr.trim();
                (!stderr.is_empty()).then(|| stderr.to_string())
            })
            .or_else(|| (!self.output.message.is_empty()).then(|| self.output.message.clone()))
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// Rollback outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackStatus {
    /// State was reverted
    Success,
    /// Acknowledged but not automated; an operator has to revert by hand
    Info,
    Error,
}

/// Result of `ExecutionBackend::rollback`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackResult {
    pub status: RollbackStatus,
    pub message: String,
}

impl RollbackResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: RollbackStatus::Success,
            message: message.into(),
        }
    }

    pub fn acknowledged(step_id: StepId) -> Self {
        Self {
            status: RollbackStatus::Info,
            message: format!(
                "Rollback for step {} acknowledged. Automatic rollback is not yet implemented. \
                 Please perform manual rollback if needed.",
                step_id
            ),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RollbackStatus::Error,
            message: message.into(),
        }
    }
}

/// Backend that actually runs remediation tools.
///
/// Implementations own their own invocation history. Timeouts are the
/// backend's responsibility and surface as error results.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Invoke `tool` with `parameters`
    async fn execute(
        &self,
        tool: &str,
        parameters: &Parameters,
    ) -> std::result::Result<ToolResult, BackendError>;

    /// Attempt to revert the effects of a step
    async fn rollback(&self, step_id: StepId) -> std::result::Result<RollbackResult, BackendError>;

    /// Backend name for logs
    fn name(&self) -> &str;

    /// Every result this backend has produced, oldest first
    async fn history(&self) -> Vec<ToolResult> {
        Vec::new()
    }
}

/// Extract the `command` parameter, if present and a string
pub(crate) fn command_parameter(parameters: &Parameters) -> Option<&str> {
    parameters
        .get("command")
        .and_then(|value| value.as_str())
        .filter(|command| !command.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_precedence() {
        let result = ToolResult::failure("shell-command", "boom");
        assert_eq!(result.error_message(), "boom");

        let result = ToolResult::failed_with_output(
            "shell-command",
            ToolOutput {
                stderr: "permission denied\n".into(),
                return_code: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(result.error_message(), "permission denied");

        let result = ToolResult::failed_with_output("x", ToolOutput::default());
        assert_eq!(result.error_message(), "Unknown error");
    }

    #[test]
    fn test_acknowledged_rollback_is_info() {
        let rollback = RollbackResult::acknowledged(StepId(4));
        assert_eq!(rollback.status, RollbackStatus::Info);
        assert!(rollback.message.starts_with("Rollback for step 4 acknowledged."));
    }

    #[test]
    fn test_command_parameter() {
        let mut parameters = Parameters::new();
        assert_eq!(command_parameter(&parameters), None);
        parameters.insert("command".into(), "  ".into());
        assert_eq!(command_parameter(&parameters), None);
        parameters.insert("command".into(), "kubectl get pods".into());
        assert_eq!(command_parameter(&parameters), Some("kubectl get pods"));
    }
}

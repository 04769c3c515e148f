//! Execution configuration and backend selection

use crate::backend::ExecutionBackend;
use crate::backends::{SandboxBackend, ShellBackend};
use crate::error::{ExecutorError, Result};
use crate::scheduler::SchedulingMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Which backend runs the steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Simulated execution, nothing touches the host
    #[default]
    Sandbox,
    /// Real `sh -c` invocation
    Shell,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Sandbox => f.write_str("sandbox"),
            BackendKind::Shell => f.write_str("shell"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ExecutorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sandbox" => Ok(BackendKind::Sandbox),
            "shell" | "real" => Ok(BackendKind::Shell),
            other => Err(ExecutorError::InvalidConfig(format!(
                "unknown backend '{}', expected 'sandbox' or 'shell'",
                other
            ))),
        }
    }
}

/// Execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default)]
    pub scheduling: SchedulingMode,

    /// Per-command timeout of the shell backend
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Simulated latency of the sandbox backend
    #[serde(default = "default_sandbox_latency_ms")]
    pub sandbox_latency_ms: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            scheduling: SchedulingMode::default(),
            command_timeout_secs: default_command_timeout_secs(),
            sandbox_latency_ms: default_sandbox_latency_ms(),
        }
    }
}

fn default_command_timeout_secs() -> u64 {
    60
}

fn default_sandbox_latency_ms() -> u64 {
    500
}

/// Factory for the configured execution backend
pub fn create_backend(config: &ExecutionConfig) -> Result<Arc<dyn ExecutionBackend>> {
    match config.backend {
        BackendKind::Sandbox => Ok(Arc::new(SandboxBackend::new(Duration::from_millis(
            config.sandbox_latency_ms,
        )))),
        BackendKind::Shell => {
            if config.command_timeout_secs == 0 {
                return Err(ExecutorError::InvalidConfig(
                    "command_timeout_secs must be greater than zero".into(),
                ));
            }
            Ok(Arc::new(ShellBackend::new(Duration::from_secs(
                config.command_timeout_secs,
            ))))
        }
    }
}

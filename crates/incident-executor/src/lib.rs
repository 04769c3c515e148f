//! # Incident Commander Executor
//!
//! Runs remediation plans step by step against a pluggable
//! [`ExecutionBackend`].
//!
//! ## Guarantees
//!
//! - A step runs only once all of its dependencies succeeded in the same run
//! - A step is never both executed and failed
//! - Backend errors are recovered locally and become failed steps
//! - A failed step with a rollback instruction triggers one rollback attempt;
//!   a failed rollback is logged and the run continues
//! - In step-by-step mode the first failure pauses the run
//!
//! Steps run sequentially; there is no parallel dispatch, even for steps
//! with disjoint dependencies.
//!
//! ## Usage
//!
//! ```no_run
//! use incident_executor::{create_backend, ExecutionConfig, StepExecutor};
//! use incident_types::{Plan, Step};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExecutionConfig::default();
//! let mut executor = StepExecutor::new(create_backend(&config)?).with_mode(config.scheduling);
//!
//! let plan = Plan::new(
//!     "Restart api",
//!     vec![Step::new(1, "Restart api pods", "shell-command")
//!         .with_parameter("command", "kubectl rollout restart deploy/api")],
//! );
//! let result = executor.execute_plan(&plan, false).await;
//! println!("{}", result.status);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod executor;
pub mod mocks;
pub mod record;
pub mod scheduler;

// Re-exports
pub use backend::{
    ExecutionBackend, RollbackResult, RollbackStatus, ToolOutput, ToolResult, ToolStatus,
};
pub use backends::{SandboxBackend, ShellBackend, SHELL_COMMAND_TOOL};
pub use config::{create_backend, BackendKind, ExecutionConfig};
pub use error::{BackendError, ExecutorError, Result};
pub use executor::StepExecutor;
pub use record::{ExecutionResult, ExecutionStatus, LogEntry, LogLevel, StepOutcome};
pub use scheduler::SchedulingMode;

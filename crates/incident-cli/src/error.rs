//! CLI error types

use incident_engine::EngineError;
use incident_types::PlanIngestError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid alert: {0}")]
    InvalidAlert(#[source] serde_json::Error),

    #[error("Invalid plan: {0}")]
    InvalidPlan(#[from] PlanIngestError),

    #[error("Plan rejected by audit: {0}")]
    AuditRejected(String),

    #[error("Plan requires manual approval; rerun with --approve --role <role>")]
    ApprovalRequired,

    #[error("Role '{role}' may not approve a plan with total risk {risk:.2}")]
    RoleDenied { role: String, risk: f64 },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

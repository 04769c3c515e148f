//! Engine error types

use incident_executor::ExecutorError;
use incident_types::PlanIngestError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of the context-retrieval collaborator
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval index unavailable: {0}")]
    Unavailable(String),

    #[error("retrieval failed: {0}")]
    Failed(String),
}

/// Failure of the plan-generation collaborator
#[derive(Debug, Error)]
pub enum PlanGenerationError {
    #[error("failed to read plan from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("generator output rejected: {0}")]
    Ingest(#[from] PlanIngestError),

    #[error("plan generation failed: {0}")]
    Failed(String),
}

/// Errors surfaced by the orchestrator and its configuration
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No plan available to execute")]
    NoPlan,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

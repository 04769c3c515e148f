//! Executor error types

use thiserror::Error;

/// Failure raised by an execution backend while invoking a tool.
///
/// The step executor never propagates these; they become failed steps.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

/// Errors surfaced by the executor crate's fallible constructors
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Invalid execution config: {0}")]
    InvalidConfig(String),
}

/// Result type for executor construction
pub type Result<T> = std::result::Result<T, ExecutorError>;

//! Ingestion errors

use crate::ids::StepId;
use thiserror::Error;

/// Reasons a generator's plan cannot be turned into a typed [`crate::Plan`]
#[derive(Debug, Error)]
pub enum PlanIngestError {
    #[error("plan is not an object with a `steps` array")]
    MissingSteps,

    #[error("malformed plan: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("duplicate step id: {0}")]
    DuplicateStepId(StepId),

    #[error("step {step} depends on unknown step {dependency}")]
    UnknownDependency { step: StepId, dependency: StepId },
}

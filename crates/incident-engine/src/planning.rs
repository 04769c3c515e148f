//! Plan generation collaborator

use crate::error::PlanGenerationError;
use async_trait::async_trait;
use incident_executor::SHELL_COMMAND_TOOL;
use incident_types::{Alert, Plan, Step};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Risk of the diagnostic fallback step
const FALLBACK_RISK: f64 = 0.1;

/// Translates alert context into a structured plan
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn create_plan(
        &self,
        alert: &Alert,
        runbook_texts: &[String],
    ) -> Result<Plan, PlanGenerationError>;

    fn name(&self) -> &str;
}

/// Minimal one-step diagnostic plan for `service`
pub fn fallback_plan(service: &str) -> Plan {
    let service = if service.is_empty() {
        "unknown-service"
    } else {
        service
    };

    Plan::new(
        format!("Fallback mock plan for {}.", service),
        vec![Step::new(
            1,
            format!("Diagnose issue for {} by checking status.", service),
            SHELL_COMMAND_TOOL,
        )
        .with_parameter(
            "command",
            format!(
                "echo 'Checking status for {}... Service is reporting errors.'",
                service
            ),
        )
        .with_risk(FALLBACK_RISK)],
    )
    .with_service(service)
}

/// Generator that always emits [`fallback_plan`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPlanner;

#[async_trait]
impl PlanGenerator for FallbackPlanner {
    async fn create_plan(
        &self,
        alert: &Alert,
        _runbook_texts: &[String],
    ) -> Result<Plan, PlanGenerationError> {
        Ok(fallback_plan(&alert.service))
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Generator that reads a plan produced out of band from a JSON file.
///
/// The file goes through the typed ingestion boundary, so missing fields
/// get their defaults and structurally broken plans are rejected.
#[derive(Debug, Clone)]
pub struct JsonFilePlanGenerator {
    path: PathBuf,
}

impl JsonFilePlanGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlanGenerator for JsonFilePlanGenerator {
    async fn create_plan(
        &self,
        _alert: &Alert,
        _runbook_texts: &[String],
    ) -> Result<Plan, PlanGenerationError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PlanGenerationError::Read {
                path: self.path.clone(),
                source,
            })?;

        let plan = Plan::from_json_str(&json)?;
        debug!(path = %self.path.display(), steps = plan.steps.len(), "Plan loaded from file");
        Ok(plan)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

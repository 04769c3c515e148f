//! Incident orchestrator
//!
//! Sequences analysis, planning and audit for one alert, and separately
//! executes the resulting plan and renders the postmortem. One orchestrator
//! holds one in-flight incident; a new alert replaces it.

use crate::analysis::Analyst;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::planning::{fallback_plan, FallbackPlanner, PlanGenerator};
use crate::postmortem::PostmortemFormatter;
use crate::response::{Incident, IncidentResponse, IncidentState, ResponseStatus};
use crate::retrieval::{ContextRetriever, StaticRunbookRetriever};
use chrono::Utc;
use incident_audit::AuditEngine;
use incident_executor::{
    create_backend, ExecutionBackend, ExecutionResult, StepExecutor, StepOutcome,
};
use incident_types::{Alert, ContextBundle, IncidentId, Plan, PlanId, Step};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Top-level incident response driver
pub struct Orchestrator {
    analyst: Analyst,
    planner: Arc<dyn PlanGenerator>,
    auditor: AuditEngine,
    executor: StepExecutor,
    max_plan_steps: usize,
    state: IncidentState,
}

impl Orchestrator {
    /// Create an orchestrator with explicit collaborators
    pub fn new(
        config: &EngineConfig,
        retriever: Arc<dyn ContextRetriever>,
        planner: Arc<dyn PlanGenerator>,
        backend: Arc<dyn ExecutionBackend>,
    ) -> Self {
        Self {
            analyst: Analyst::new(retriever, config.retrieval.top_k),
            planner,
            auditor: AuditEngine::new(config.audit.clone()),
            executor: StepExecutor::new(backend).with_mode(config.execution.scheduling),
            max_plan_steps: config.planning.max_plan_steps,
            state: IncidentState::default(),
        }
    }

    /// Create an orchestrator with the built-in runbooks, the fallback
    /// planner and the configured execution backend
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let backend = create_backend(&config.execution)?;
        Ok(Self::new(
            config,
            Arc::new(StaticRunbookRetriever::new()),
            Arc::new(FallbackPlanner),
            backend,
        ))
    }

    /// Replace the plan generator
    pub fn with_planner(mut self, planner: Arc<dyn PlanGenerator>) -> Self {
        self.planner = planner;
        self
    }

    pub fn auditor(&self) -> &AuditEngine {
        &self.auditor
    }

    /// Current incident, plan and last execution
    pub fn current_state(&self) -> &IncidentState {
        &self.state
    }

    /// Step invocations across every execution of this orchestrator
    pub fn execution_history(&self) -> &[StepOutcome] {
        self.executor.history()
    }

    /// Analyze, plan and audit an alert. Replaces the current incident.
    #[instrument(skip_all, fields(service = %alert.service))]
    pub async fn process_incident(&mut self, alert: Alert) -> IncidentResponse {
        let opened_at = Utc::now();
        let incident_id = IncidentId::at(opened_at);
        info!(incident_id = %incident_id, severity = %alert.severity, "Incident received");

        let context = self.analyst.analyze(&alert).await;
        info!(
            incident_id = %incident_id,
            snippets = context.runbook_snippets.len(),
            root_causes = context.root_causes.len(),
            "Context built"
        );

        let plan = match self
            .planner
            .create_plan(&alert, &context.runbook_texts())
            .await
            .and_then(|plan| {
                plan.validate()?;
                Ok(plan)
            }) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(
                    incident_id = %incident_id,
                    planner = self.planner.name(),
                    error = %e,
                    "Plan generation failed, using fallback plan"
                );
                fallback_plan(&alert.service)
            }
        };

        let plan = annotate(plan, &incident_id, &context);
        if plan.steps.len() > self.max_plan_steps {
            warn!(
                incident_id = %incident_id,
                steps = plan.steps.len(),
                max_plan_steps = self.max_plan_steps,
                "Plan exceeds advisory step limit"
            );
        }
        info!(incident_id = %incident_id, plan_id = %plan.id, steps = plan.steps.len(), "Plan annotated");

        let audit = self.auditor.audit_plan(&plan);
        info!(
            incident_id = %incident_id,
            approved = audit.approved,
            requires_manual_approval = audit.requires_manual_approval,
            "Audit decision: {}",
            audit.verdict()
        );

        self.state = IncidentState {
            incident: Some(Incident {
                id: incident_id.clone(),
                alert: alert.clone(),
                context: context.clone(),
                opened_at,
            }),
            plan: Some(plan.clone()),
            execution: None,
        };

        IncidentResponse {
            incident_id,
            alert,
            context_bundle: context,
            plan,
            audit,
            status: ResponseStatus::Planned,
            timestamp: Utc::now(),
        }
    }

    /// Execute `plan`, or the current plan when `None`.
    ///
    /// Execution does not consult the audit; gating is the caller's call.
    #[instrument(skip_all, fields(step_by_step = step_by_step))]
    pub async fn execute_plan(
        &mut self,
        plan: Option<&Plan>,
        step_by_step: bool,
    ) -> Result<ExecutionResult> {
        let plan = plan
            .or(self.state.plan.as_ref())
            .ok_or(EngineError::NoPlan)?;

        let result = self.executor.execute_plan(plan, step_by_step).await;
        self.state.execution = Some(result.clone());
        Ok(result)
    }

    /// Execute one step, ignoring dependencies. Progress across calls is
    /// the caller's to track.
    #[instrument(skip_all, fields(step_id = %step.id))]
    pub async fn execute_single_step(&mut self, step: &Step) -> ExecutionResult {
        let plan_id = self
            .state
            .plan
            .as_ref()
            .map(|plan| plan.id.clone())
            .unwrap_or_default();
        self.executor.execute_single_step_for(plan_id, step).await
    }

    pub fn generate_postmortem(
        &self,
        response: &IncidentResponse,
        execution: &ExecutionResult,
    ) -> String {
        PostmortemFormatter::format(response, execution)
    }
}

/// Attach incident metadata and reasoning to a generated plan
fn annotate(mut plan: Plan, incident_id: &IncidentId, context: &ContextBundle) -> Plan {
    plan.id = PlanId::for_incident(incident_id);
    plan.alert_summary = context.summary.clone();
    plan.root_causes = context.root_causes.clone();
    plan.service = context.service.clone();
    plan.reasoning = reasoning(&context.root_causes, &plan.steps);
    if !(0.0..=1.0).contains(&plan.total_risk_score) {
        plan.total_risk_score = plan.max_step_risk();
    }
    plan
}

fn reasoning(root_causes: &[String], steps: &[Step]) -> String {
    let mut text = format!(
        "Plan generated based on {} identified root causes:\n",
        root_causes.len()
    );
    for (i, cause) in root_causes.iter().enumerate() {
        let _ = writeln!(text, "{}. {}", i + 1, cause);
    }

    let _ = write!(text, "\nRemediation plan consists of {} steps:\n", steps.len());
    for step in steps {
        let _ = writeln!(
            text,
            "- Step {}: {} (Risk: {:.2})",
            step.id, step.action, step.risk_score
        );
    }
    text
}

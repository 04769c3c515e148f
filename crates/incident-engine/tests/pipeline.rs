//! Orchestrator pipeline: analysis -> planning -> audit, then execution.

use async_trait::async_trait;
use incident_audit::AuditPolicy;
use incident_engine::{
    EngineConfig, EngineError, Orchestrator, PlanGenerationError, PlanGenerator, ResponseStatus,
    StaticRunbookRetriever,
};
use incident_executor::mocks::ScriptedBackend;
use incident_executor::{ExecutionStatus, SchedulingMode};
use incident_types::{Alert, Plan, Severity, Step, StepId};
use std::sync::Arc;

/// Generator that always returns the same plan
struct FixedPlanner(Plan);

#[async_trait]
impl PlanGenerator for FixedPlanner {
    async fn create_plan(&self, _alert: &Alert, _texts: &[String]) -> Result<Plan, PlanGenerationError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Generator that always fails
struct BrokenPlanner;

#[async_trait]
impl PlanGenerator for BrokenPlanner {
    async fn create_plan(&self, _alert: &Alert, _texts: &[String]) -> Result<Plan, PlanGenerationError> {
        Err(PlanGenerationError::Failed("model unavailable".into()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn config(require_approval: bool) -> EngineConfig {
    EngineConfig {
        audit: AuditPolicy {
            risk_threshold: 0.7,
            require_approval,
        },
        ..Default::default()
    }
}

fn orchestrator(config: &EngineConfig, planner: Arc<dyn PlanGenerator>, backend: Arc<ScriptedBackend>) -> Orchestrator {
    Orchestrator::new(config, Arc::new(StaticRunbookRetriever::new()), planner, backend)
}

fn restart_plan() -> Plan {
    Plan::new(
        "Restart api pods",
        vec![
            Step::new(1, "Check pods", "check").with_risk(0.1),
            Step::new(2, "Restart pods", "restart")
                .with_risk(0.4)
                .with_rollback("kubectl rollout undo deploy/api")
                .depends_on([1]),
        ],
    )
}

fn alert() -> Alert {
    Alert::new("api-service", "api pod crash loop")
        .with_severity(Severity::High)
        .with_type("pod_failure")
}

#[tokio::test]
async fn process_incident_annotates_and_audits() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(&config(false), Arc::new(FixedPlanner(restart_plan())), backend);

    let response = orchestrator.process_incident(alert()).await;

    assert_eq!(response.status, ResponseStatus::Planned);
    assert!(response.incident_id.as_str().starts_with("incident_"));
    assert_eq!(
        response.plan.id.as_str(),
        format!("plan_{}", response.incident_id)
    );
    assert_eq!(response.plan.service, "api-service");
    assert_eq!(response.plan.root_causes, vec!["Pod crash or OOM kill"]);
    assert!(response
        .plan
        .reasoning
        .starts_with("Plan generated based on 1 identified root causes:\n1. Pod crash or OOM kill\n"));
    assert!(response.plan.reasoning.contains("- Step 2: Restart pods (Risk: 0.40)\n"));
    assert_eq!(response.plan.alert_summary, response.context_bundle.summary);
    assert!(response.audit.approved);

    let state = orchestrator.current_state();
    assert_eq!(state.plan.as_ref(), Some(&response.plan));
    assert_eq!(
        state.incident.as_ref().map(|incident| &incident.id),
        Some(&response.incident_id)
    );
    assert!(state.execution.is_none());
}

#[tokio::test]
async fn default_policy_requires_manual_approval() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(&config(true), Arc::new(FixedPlanner(restart_plan())), backend);

    let response = orchestrator.process_incident(alert()).await;

    assert!(response.audit.requires_manual_approval);
    assert!(!response.audit.approved);
}

#[tokio::test]
async fn generator_failure_falls_back() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(&config(false), Arc::new(BrokenPlanner), backend);

    let response = orchestrator.process_incident(alert()).await;

    assert_eq!(response.plan.summary, "Fallback mock plan for api-service.");
    assert_eq!(response.plan.steps.len(), 1);
    assert_eq!(response.plan.total_risk_score, 0.1);
    assert!(response.audit.approved);
}

#[tokio::test]
async fn execute_without_plan_is_an_error() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(&config(false), Arc::new(BrokenPlanner), backend);

    let result = orchestrator.execute_plan(None, false).await;

    assert!(matches!(result, Err(EngineError::NoPlan)));
}

#[tokio::test]
async fn execute_current_plan_records_execution() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(
        &config(false),
        Arc::new(FixedPlanner(restart_plan())),
        backend.clone(),
    );
    let response = orchestrator.process_incident(alert()).await;

    let execution = orchestrator.execute_plan(None, false).await.unwrap();

    assert_eq!(execution.plan_id, response.plan.id);
    assert_eq!(execution.steps_executed, vec![StepId(1), StepId(2)]);
    assert_eq!(execution.status, ExecutionStatus::Completed);
    assert_eq!(orchestrator.current_state().execution.as_ref(), Some(&execution));
    assert_eq!(backend.calls().await, vec!["check".to_string(), "restart".to_string()]);
    assert_eq!(orchestrator.execution_history().len(), 2);
}

#[tokio::test]
async fn explicit_plan_overrides_current_plan() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(
        &config(false),
        Arc::new(FixedPlanner(restart_plan())),
        backend.clone(),
    );
    orchestrator.process_incident(alert()).await;

    let other = Plan::new("other", vec![Step::new(7, "Flush cache", "flush")]);
    let execution = orchestrator.execute_plan(Some(&other), false).await.unwrap();

    assert_eq!(execution.steps_executed, vec![StepId(7)]);
    assert_eq!(backend.calls().await, vec!["flush".to_string()]);
}

#[tokio::test]
async fn new_incident_replaces_state() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(
        &config(false),
        Arc::new(FixedPlanner(restart_plan())),
        backend,
    );
    orchestrator.process_incident(alert()).await;
    orchestrator.execute_plan(None, false).await.unwrap();
    assert!(orchestrator.current_state().execution.is_some());

    let second = orchestrator
        .process_incident(Alert::new("db-service", "database connection timeouts"))
        .await;

    let state = orchestrator.current_state();
    assert!(state.execution.is_none());
    assert_eq!(
        state.incident.as_ref().map(|incident| incident.alert.service.as_str()),
        Some("db-service")
    );
    assert_eq!(
        second.context_bundle.root_causes.first().map(String::as_str),
        Some("Network or database timeout")
    );
}

#[tokio::test]
async fn step_by_step_pauses_and_single_steps_resume() {
    let backend = Arc::new(ScriptedBackend::new().failing("check"));
    let mut orchestrator = orchestrator(
        &config(false),
        Arc::new(FixedPlanner(restart_plan())),
        backend,
    );
    let response = orchestrator.process_incident(alert()).await;

    let execution = orchestrator.execute_plan(None, true).await.unwrap();
    assert_eq!(execution.status, ExecutionStatus::Paused);
    assert!(execution.steps_executed.is_empty());

    // Caller-driven progression skips the dependency check
    let single = orchestrator
        .execute_single_step(&response.plan.steps[1])
        .await;
    assert_eq!(single.plan_id, response.plan.id);
    assert_eq!(single.steps_executed, vec![StepId(2)]);
    assert_eq!(single.status, ExecutionStatus::Completed);
}

#[tokio::test]
async fn single_pass_mode_from_config() {
    let mut config = config(false);
    config.execution.scheduling = SchedulingMode::SinglePass;
    let plan = Plan::new(
        "out of order",
        vec![
            Step::new(1, "Verify", "verify").depends_on([2]),
            Step::new(2, "Restart", "restart"),
        ],
    );
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(&config, Arc::new(FixedPlanner(plan)), backend);
    orchestrator.process_incident(alert()).await;

    let execution = orchestrator.execute_plan(None, false).await.unwrap();

    assert_eq!(execution.steps_executed, vec![StepId(2)]);
    assert_eq!(execution.steps_skipped, vec![StepId(1)]);
}

#[tokio::test]
async fn from_config_uses_sandbox_backend() {
    let mut config = config(false);
    config.execution.sandbox_latency_ms = 0;
    let mut orchestrator = Orchestrator::from_config(&config).unwrap();

    let response = orchestrator
        .process_incident(Alert::new("auth-service", "high CPU usage"))
        .await;
    let execution = orchestrator.execute_plan(None, false).await.unwrap();

    assert_eq!(response.plan.summary, "Fallback mock plan for auth-service.");
    assert_eq!(execution.status, ExecutionStatus::Completed);
}

#[tokio::test]
async fn json_plan_file_drives_the_pipeline() {
    use incident_engine::JsonFilePlanGenerator;
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "summary": "Delete stuck pod",
            "steps": [
                {{"id": 1, "action": "Delete stuck pod", "tool": "delete", "risk_score": 0.5}}
            ]
        }}"#
    )
    .unwrap();

    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(
        &config(false),
        Arc::new(JsonFilePlanGenerator::new(file.path())),
        backend,
    );
    let response = orchestrator.process_incident(alert()).await;

    assert_eq!(response.plan.summary, "Delete stuck pod");
    assert!(response.audit.requires_manual_approval);
    assert_eq!(
        response.audit.risk_assessment.destructive_steps,
        Some(vec![StepId(1)])
    );
}

#[tokio::test]
async fn unreadable_plan_file_falls_back() {
    use incident_engine::JsonFilePlanGenerator;

    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(
        &config(false),
        Arc::new(JsonFilePlanGenerator::new("/nonexistent/plan.json")),
        backend,
    );
    let response = orchestrator.process_incident(alert()).await;

    assert_eq!(response.plan.summary, "Fallback mock plan for api-service.");
}

#[tokio::test]
async fn duplicate_step_ids_fall_back() {
    let plan = Plan::new(
        "two steps share an id",
        vec![
            Step::new(1, "Run a", "tool-a"),
            Step::new(1, "Run b", "tool-b"),
        ],
    );
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(&config(false), Arc::new(FixedPlanner(plan)), backend.clone());

    let response = orchestrator.process_incident(alert()).await;
    assert_eq!(response.plan.summary, "Fallback mock plan for api-service.");
    assert_eq!(response.plan.steps.len(), 1);

    orchestrator.execute_plan(None, false).await.unwrap();
    assert!(!backend.calls().await.contains(&"tool-a".to_string()));
}

#[tokio::test]
async fn dangling_dependency_falls_back() {
    let plan = Plan::new(
        "depends on a missing step",
        vec![Step::new(1, "Restart", "restart").depends_on([9])],
    );
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(&config(false), Arc::new(FixedPlanner(plan)), backend);

    let response = orchestrator.process_incident(alert()).await;

    assert_eq!(response.plan.summary, "Fallback mock plan for api-service.");
}

#[tokio::test]
async fn out_of_range_total_risk_uses_step_maximum() {
    let plan = restart_plan().with_total_risk(f64::NAN);
    let backend = Arc::new(ScriptedBackend::new());
    let mut orchestrator = orchestrator(&config(false), Arc::new(FixedPlanner(plan)), backend);

    let response = orchestrator.process_incident(alert()).await;

    assert_eq!(response.plan.summary, "Restart api pods");
    assert_eq!(response.plan.total_risk_score, 0.4);
    assert!(response.audit.approved);
}

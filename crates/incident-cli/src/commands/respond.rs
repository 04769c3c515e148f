//! End-to-end incident response

use super::audit::RoleDecision;
use crate::error::{CliError, CliResult};
use crate::output::{
    print_error, print_execution, print_info, print_json, print_response, print_success,
    OutputFormat,
};
use chrono::{DateTime, Utc};
use clap::Args;
use incident_audit::{validate_role, Role};
use incident_engine::{EngineConfig, IncidentResponse, JsonFilePlanGenerator, Orchestrator};
use incident_executor::{ExecutionResult, ExecutionStatus};
use incident_types::{Plan, PlanId};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Args)]
pub struct RespondArgs {
    /// Alert JSON file (`-` for stdin)
    #[arg(short, long)]
    pub alert: PathBuf,

    /// Use this plan JSON file instead of the built-in planner
    #[arg(short, long)]
    pub plan: Option<PathBuf>,

    /// Execute the plan once it is approved
    #[arg(short = 'x', long)]
    pub execute: bool,

    /// Pause at the first failed step
    #[arg(long, requires = "execute", conflicts_with = "manual")]
    pub step_by_step: bool,

    /// Run steps one at a time in list order, stopping at the first failure
    #[arg(long, requires = "execute")]
    pub manual: bool,

    /// Approve a plan the audit did not approve
    #[arg(long, requires = "role")]
    pub approve: bool,

    /// Role of the approving operator (admin, sre, engineer, viewer)
    #[arg(short, long)]
    pub role: Option<Role>,

    /// Write a Markdown postmortem to this file after execution
    #[arg(long, requires = "execute")]
    pub postmortem: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RespondReport {
    response: IncidentResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    approval: Option<RoleDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution: Option<ExecutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postmortem: Option<PathBuf>,
}

/// Analyze, plan and audit an alert, then optionally execute the plan
pub async fn execute(args: RespondArgs, config: &EngineConfig, format: OutputFormat) -> CliResult<()> {
    let alert = super::load_alert(&args.alert)?;

    let mut orchestrator = Orchestrator::from_config(config)?;
    if let Some(path) = &args.plan {
        orchestrator = orchestrator.with_planner(Arc::new(JsonFilePlanGenerator::new(path.clone())));
    }

    let response = orchestrator.process_incident(alert).await;
    if format == OutputFormat::Text {
        print_response(&response);
    }

    let mut report = RespondReport {
        response,
        approval: None,
        execution: None,
        postmortem: None,
    };

    let outcome = if args.execute {
        run(&args, &mut orchestrator, &mut report, format).await
    } else {
        Ok(())
    };

    if format == OutputFormat::Json {
        print_json(&report)?;
    }
    outcome
}

async fn run(
    args: &RespondArgs,
    orchestrator: &mut Orchestrator,
    report: &mut RespondReport,
    format: OutputFormat,
) -> CliResult<()> {
    let plan = report.response.plan.clone();

    if report.response.audit.has_errors() {
        return Err(CliError::AuditRejected(report.response.audit.errors.join("; ")));
    }

    if !report.response.audit.approved {
        let role = match (&args.role, args.approve) {
            (Some(role), true) => role,
            _ => return Err(CliError::ApprovalRequired),
        };

        let permitted = validate_role(role, &plan);
        report.approval = Some(RoleDecision {
            role: role.to_string(),
            permitted,
        });
        if !permitted {
            return Err(CliError::RoleDenied {
                role: role.to_string(),
                risk: plan.total_risk_score,
            });
        }

        info!(role = %role, plan_id = %plan.id, "Plan approved manually");
        if format == OutputFormat::Text {
            print_success(&format!("Plan approved by role '{}'", role));
        }
    }

    let execution = if args.manual {
        run_manually(orchestrator, &plan, format).await
    } else {
        orchestrator.execute_plan(None, args.step_by_step).await?
    };

    if format == OutputFormat::Text {
        println!();
        print_execution(&execution);
    }

    if let Some(path) = &args.postmortem {
        let text = orchestrator.generate_postmortem(&report.response, &execution);
        std::fs::write(path, text).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        if format == OutputFormat::Text {
            print_success(&format!("Postmortem written to {}", path.display()));
        }
        report.postmortem = Some(path.clone());
    }

    report.execution = Some(execution);
    Ok(())
}

/// Drive the plan one step at a time. Dependencies are not checked.
async fn run_manually(orchestrator: &mut Orchestrator, plan: &Plan, format: OutputFormat) -> ExecutionResult {
    let started = Utc::now();
    let mut runs = Vec::with_capacity(plan.steps.len());

    for step in &plan.steps {
        let run = orchestrator.execute_single_step(step).await;
        let failed = !run.steps_failed.is_empty();
        if format == OutputFormat::Text {
            if failed {
                print_error(&format!("Step {} failed: {}", step.id, step.action));
            } else {
                print_info(&format!("Step {} done: {}", step.id, step.action));
            }
        }
        runs.push(run);
        if failed {
            break;
        }
    }

    merge_runs(plan.id.clone(), started, runs)
}

/// Fold single-step runs into one record for reporting
fn merge_runs(plan_id: PlanId, started: DateTime<Utc>, runs: Vec<ExecutionResult>) -> ExecutionResult {
    let mut merged = ExecutionResult {
        plan_id,
        status: ExecutionStatus::InProgress,
        steps_executed: Vec::new(),
        steps_failed: Vec::new(),
        steps_skipped: Vec::new(),
        rollbacks_performed: Vec::new(),
        start_time: started,
        end_time: None,
        duration_seconds: 0.0,
        logs: Vec::new(),
    };

    for run in runs {
        merged.steps_executed.extend(run.steps_executed);
        merged.steps_failed.extend(run.steps_failed);
        merged.steps_skipped.extend(run.steps_skipped);
        merged.rollbacks_performed.extend(run.rollbacks_performed);
        merged.logs.extend(run.logs);
        merged.duration_seconds += run.duration_seconds;
        merged.end_time = run.end_time.or(merged.end_time);
    }

    merged.status = merged.derived_status();
    merged
}

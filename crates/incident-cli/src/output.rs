//! Output formatting utilities

use crate::error::CliResult;
use colored::*;
use incident_audit::AuditResult;
use incident_engine::IncidentResponse;
use incident_executor::{ExecutionResult, ExecutionStatus, LogLevel};
use incident_types::Plan;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Print a single item as pretty JSON
pub fn print_json<T: Serialize>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

pub fn print_response(response: &IncidentResponse) {
    println!("{}", "Incident".bold());
    println!("  ID: {}", response.incident_id);
    println!("  Service: {}", response.context_bundle.service);
    println!("  Severity: {}", colorize_severity(response.alert.severity.as_str()));
    println!("  Summary: {}", response.context_bundle.summary);

    println!("\n{}", "Root causes".bold());
    for cause in &response.context_bundle.root_causes {
        println!("  - {}", cause);
    }

    println!();
    print_plan(&response.plan);
    println!();
    print_audit(&response.audit);
}

pub fn print_plan(plan: &Plan) {
    println!("{} {}", "Plan".bold(), plan.id.as_str().dimmed());
    println!("  {}", plan.summary);
    println!("  Total risk: {:.2}", plan.total_risk_score);
    for step in &plan.steps {
        let deps = if step.dependencies.is_empty() {
            String::new()
        } else {
            let ids: Vec<String> = step.dependencies.iter().map(ToString::to_string).collect();
            format!(" (after {})", ids.join(", "))
        };
        println!(
            "  {}. {} [{}] risk {:.2}{}",
            step.id,
            step.action,
            step.tool,
            step.risk_score,
            deps.dimmed()
        );
    }
}

pub fn print_audit(audit: &AuditResult) {
    let verdict = audit.verdict();
    let verdict = if audit.approved {
        verdict.green()
    } else if audit.has_errors() {
        verdict.red()
    } else {
        verdict.yellow()
    };
    println!("{} {}", "Audit:".bold(), verdict);

    for error in &audit.errors {
        println!("  {} {}", "✗".red(), error);
    }
    for warning in &audit.warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }
    for recommendation in &audit.recommendations {
        println!("  {} {}", "ℹ".blue(), recommendation);
    }
}

pub fn print_execution(execution: &ExecutionResult) {
    println!(
        "{} {} in {:.2}s",
        "Execution:".bold(),
        colorize_status(execution.status),
        execution.duration_seconds
    );
    println!("  Executed: {}", join(&execution.steps_executed));
    println!("  Failed: {}", join(&execution.steps_failed));
    if !execution.steps_skipped.is_empty() {
        println!("  Skipped: {}", join(&execution.steps_skipped));
    }
    if !execution.rollbacks_performed.is_empty() {
        println!("  Rolled back: {}", join(&execution.rollbacks_performed));
    }

    for entry in &execution.logs {
        let level = match entry.level {
            LogLevel::Info => "info".normal(),
            LogLevel::Success => "success".green(),
            LogLevel::Warning => "warning".yellow(),
            LogLevel::Error => "error".red(),
        };
        println!(
            "  [{}] [{}] {}",
            entry.timestamp.format("%H:%M:%S"),
            level,
            entry.message
        );
    }
}

fn colorize_status(status: ExecutionStatus) -> ColoredString {
    match status {
        ExecutionStatus::Completed => status.as_str().green(),
        ExecutionStatus::Partial | ExecutionStatus::Paused => status.as_str().yellow(),
        ExecutionStatus::Failed => status.as_str().red(),
        ExecutionStatus::InProgress => status.as_str().dimmed(),
    }
}

fn colorize_severity(severity: &str) -> ColoredString {
    match severity {
        "critical" => severity.red().bold(),
        "high" => severity.red(),
        "medium" => severity.yellow(),
        _ => severity.normal(),
    }
}

fn join<T: ToString>(ids: &[T]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

//! Postmortem report
//!
//! Fixed Markdown layout; downstream tooling splits it by heading, so the
//! headings and line shapes must not drift. Timestamps render in UTC.

use crate::response::IncidentResponse;
use chrono::{DateTime, Utc};
use incident_executor::ExecutionResult;
use std::fmt;

/// Log entries included in the report, most recent last
pub const LOG_TAIL: usize = 20;

const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";
const TIME: &str = "%H:%M:%S";

/// Renders postmortems
#[derive(Debug, Clone, Copy, Default)]
pub struct PostmortemFormatter;

impl PostmortemFormatter {
    pub fn format(response: &IncidentResponse, execution: &ExecutionResult) -> String {
        Postmortem {
            response,
            execution,
        }
        .to_string()
    }
}

/// A postmortem ready to be displayed
pub struct Postmortem<'a> {
    pub response: &'a IncidentResponse,
    pub execution: &'a ExecutionResult,
}

impl fmt::Display for Postmortem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alert = &self.response.alert;
        let plan = &self.response.plan;
        let execution = self.execution;
        let received = stamp(&self.response.timestamp);

        writeln!(f, "# Incident Postmortem")?;
        writeln!(f)?;
        writeln!(f, "## Incident Summary")?;
        writeln!(f)?;
        writeln!(f, "**Incident ID:** {}", or(self.response.incident_id.as_str(), "unknown"))?;
        writeln!(f, "**Service:** {}", or(&alert.service, "unknown"))?;
        writeln!(f, "**Severity:** {}", alert.severity)?;
        writeln!(f, "**Timestamp:** {}", received)?;
        writeln!(f)?;
        writeln!(f, "## Alert Description")?;
        writeln!(f)?;
        writeln!(f, "{}", or(&alert.description, "No description provided"))?;
        writeln!(f)?;
        writeln!(f, "## Root Causes Identified")?;
        writeln!(f)?;
        for (i, cause) in self.response.context_bundle.root_causes.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, cause)?;
        }

        writeln!(f)?;
        writeln!(f, "## Remediation Plan")?;
        writeln!(f)?;
        writeln!(f, "**Plan Summary:** {}", or(&plan.summary, "No summary"))?;
        writeln!(f)?;
        writeln!(f, "**Total Risk Score:** {:.2}", plan.total_risk_score)?;
        writeln!(f)?;
        writeln!(f, "### Steps Executed")?;
        writeln!(f)?;
        for step in &plan.steps {
            let marker = if execution.was_executed(step.id) {
                "✓"
            } else {
                "✗"
            };
            writeln!(
                f,
                "{} **Step {}:** {} (Risk: {:.2})",
                marker, step.id, step.action, step.risk_score
            )?;
        }

        writeln!(f)?;
        writeln!(f, "## Execution Results")?;
        writeln!(f)?;
        writeln!(f, "**Status:** {}", execution.status)?;
        writeln!(f, "**Duration:** {:.2} seconds", execution.duration_seconds)?;
        writeln!(f, "**Steps Executed:** {}", execution.steps_executed.len())?;
        writeln!(f, "**Steps Failed:** {}", execution.steps_failed.len())?;
        writeln!(f, "**Rollbacks Performed:** {}", execution.rollbacks_performed.len())?;
        writeln!(f)?;
        writeln!(f, "### Execution Log")?;
        writeln!(f)?;
        let skip = execution.logs.len().saturating_sub(LOG_TAIL);
        for entry in execution.logs.iter().skip(skip) {
            writeln!(
                f,
                "[{}] [{}] {}",
                entry.timestamp.format(TIME),
                entry.level.as_str().to_uppercase(),
                entry.message
            )?;
        }

        writeln!(f)?;
        writeln!(f, "## Long-term Recommendations")?;
        writeln!(f)?;
        writeln!(f, "1. Monitor {} metrics more closely", or(&alert.service, "service"))?;
        writeln!(f, "2. Consider implementing automated scaling policies")?;
        writeln!(f, "3. Review and update runbooks based on this incident")?;
        writeln!(f, "4. Implement preventive measures to avoid similar incidents")?;
        writeln!(f)?;
        writeln!(f, "## Timeline")?;
        writeln!(f)?;
        writeln!(f, "- **Alert Received:** {}", received)?;
        writeln!(f, "- **Plan Generated:** {}", stamp(&plan.created_at))?;
        writeln!(f, "- **Execution Started:** {}", stamp(&execution.start_time))?;
        writeln!(
            f,
            "- **Execution Completed:** {}",
            stamp(execution.end_time.as_ref().unwrap_or(&execution.start_time))
        )?;
        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(f, "*Generated automatically by Incident Commander*")
    }
}

fn stamp(at: &DateTime<Utc>) -> String {
    at.format(DATE_TIME).to_string()
}

fn or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

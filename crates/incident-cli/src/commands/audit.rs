//! Offline plan audit

use crate::error::CliResult;
use crate::output::{print_audit, print_json, print_plan, print_success, print_warning, OutputFormat};
use clap::Args;
use incident_audit::{validate_role, AuditEngine, AuditPolicy, AuditResult, Role};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Plan JSON file (`-` for stdin)
    #[arg(short, long)]
    pub plan: PathBuf,

    /// Check whether this role may approve the plan
    #[arg(short, long)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
struct AuditReport {
    audit: AuditResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<RoleDecision>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoleDecision {
    pub role: String,
    pub permitted: bool,
}

/// Audit a plan file against the configured policy
pub fn execute(args: AuditArgs, policy: AuditPolicy, format: OutputFormat) -> CliResult<()> {
    let plan = super::load_plan(&args.plan)?;
    let audit = AuditEngine::new(policy).audit_plan(&plan);
    let role = args.role.map(|role| RoleDecision {
        permitted: !audit.has_errors() && validate_role(&role, &plan),
        role: role.to_string(),
    });

    match format {
        OutputFormat::Json => print_json(&AuditReport { audit, role }),
        OutputFormat::Text => {
            print_plan(&plan);
            println!();
            print_audit(&audit);
            if let Some(decision) = role {
                if decision.permitted {
                    print_success(&format!("Role '{}' may approve this plan", decision.role));
                } else {
                    print_warning(&format!("Role '{}' may not approve this plan", decision.role));
                }
            }
            Ok(())
        }
    }
}

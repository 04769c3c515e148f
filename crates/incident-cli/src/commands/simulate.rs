//! Simulated alert generation

use crate::error::CliResult;
use crate::output::print_json;
use clap::Args;
use incident_engine::simulate::{simulate_alert, ALERT_KINDS};
use tracing::warn;

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Affected service
    #[arg(short, long, default_value = "api-service")]
    pub service: String,

    /// Alert kind (pod_failure, high_cpu, memory_leak, network_error, database_timeout)
    #[arg(short, long, default_value = "pod_failure")]
    pub kind: String,
}

/// Print a simulated alert as JSON, ready to pipe into `respond --alert -`
pub fn execute(args: SimulateArgs) -> CliResult<()> {
    if !ALERT_KINDS.contains(&args.kind.as_str()) {
        warn!(kind = %args.kind, "Unknown alert kind, emitting a generic alert");
    }
    print_json(&simulate_alert(&args.service, &args.kind))
}

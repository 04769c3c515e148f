//! Incident Commander CLI
//!
//! Drives the incident pipeline from the terminal:
//! - analyze, plan, audit and optionally execute a response to an alert file
//! - audit a plan file offline
//! - generate simulated alerts for drills

use clap::{Parser, Subcommand};
use incident_engine::{EngineConfig, EngineError};
use incident_executor::BackendKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{audit, respond, simulate};
use error::CliResult;
use output::{print_error, print_json, OutputFormat};

/// Incident Commander CLI
#[derive(Parser)]
#[command(name = "incidentctl")]
#[command(about = "Incident Commander - alert analysis, risk-gated remediation and postmortems", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "INCIDENT_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (overrides logging.level)
    #[arg(long, env = "INCIDENT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "INCIDENT_LOG_JSON", global = true)]
    json: bool,

    /// Execution backend (sandbox, shell)
    #[arg(long, env = "INCIDENT_BACKEND", global = true)]
    backend: Option<BackendKind>,

    /// Audit risk threshold (overrides audit.risk_threshold)
    #[arg(long, global = true)]
    risk_threshold: Option<f64>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Respond to an alert: analyze, plan, audit and optionally execute
    Respond(respond::RespondArgs),

    /// Audit a plan file
    Audit(audit::AuditArgs),

    /// Print a simulated alert as JSON
    Simulate(simulate::SimulateArgs),

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load configuration
    let mut config = EngineConfig::load(cli.config.as_deref()).map_err(EngineError::from)?;

    // Override with CLI args
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }
    if let Some(backend) = cli.backend {
        config.execution.backend = backend;
    }
    if let Some(threshold) = cli.risk_threshold {
        config.audit.risk_threshold = threshold;
    }

    init_tracing(&config);

    match cli.command {
        Commands::Respond(args) => respond::execute(args, &config, cli.output).await,
        Commands::Audit(args) => audit::execute(args, config.audit.clone(), cli.output),
        Commands::Simulate(args) => simulate::execute(args),
        Commands::Config => print_json(&config),
    }
}

/// Operator logs go to stderr so stdout stays parseable
fn init_tracing(config: &EngineConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

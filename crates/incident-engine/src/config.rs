//! Configuration for the incident engine

use incident_audit::AuditPolicy;
use incident_executor::ExecutionConfig;
use serde::{Deserialize, Serialize};

/// Environment variable prefix, e.g. `INCIDENT__AUDIT__RISK_THRESHOLD`
pub const ENV_PREFIX: &str = "INCIDENT";

/// Main engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Risk policy applied to every plan
    #[serde(default)]
    pub audit: AuditPolicy,

    #[serde(default)]
    pub planning: PlanningConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Backend and scheduling for step execution
    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Plan generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Advisory cap on plan length; longer plans are logged, never truncated
    #[serde(default = "default_max_plan_steps")]
    pub max_plan_steps: usize,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            max_plan_steps: default_max_plan_steps(),
        }
    }
}

/// Context retrieval settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Snippets requested per incident
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_max_plan_steps() -> usize {
    10
}

fn default_top_k() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `INCIDENT__*` environment variables
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&EngineConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

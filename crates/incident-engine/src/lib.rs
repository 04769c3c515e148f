//! # Incident Commander Engine
//!
//! The response pipeline: an [`Alert`](incident_types::Alert) is analyzed
//! into a context bundle, a [`PlanGenerator`] turns it into a plan, the
//! plan is annotated and audited, and on request executed and summarized in
//! a postmortem.
//!
//! ## Architectural Boundaries
//!
//! - `incident-audit` owns: risk policy and approval decisions
//! - `incident-executor` owns: step dispatch, rollback, execution backends
//! - `incident-engine` owns: stage sequencing, the in-flight incident, analysis
//!   heuristics, postmortem rendering
//!
//! Context retrieval and plan generation are capability traits
//! ([`ContextRetriever`], [`PlanGenerator`]) injected at construction;
//! deterministic implementations ship with the crate.
//!
//! ## Usage
//!
//! ```no_run
//! use incident_engine::{EngineConfig, Orchestrator};
//! use incident_engine::simulate::simulate_alert;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::load(None)?;
//! let mut orchestrator = Orchestrator::from_config(&config)?;
//!
//! let response = orchestrator
//!     .process_incident(simulate_alert("auth-service", "high_cpu"))
//!     .await;
//!
//! if response.audit.approved {
//!     let execution = orchestrator.execute_plan(None, false).await?;
//!     println!("{}", orchestrator.generate_postmortem(&response, &execution));
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod analysis;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod planning;
pub mod postmortem;
pub mod response;
pub mod retrieval;
pub mod simulate;

// Re-exports
pub use analysis::Analyst;
pub use config::{EngineConfig, LoggingConfig, PlanningConfig, RetrievalConfig};
pub use error::{EngineError, PlanGenerationError, Result, RetrievalError};
pub use orchestrator::Orchestrator;
pub use planning::{fallback_plan, FallbackPlanner, JsonFilePlanGenerator, PlanGenerator};
pub use postmortem::{Postmortem, PostmortemFormatter};
pub use response::{Incident, IncidentResponse, IncidentState, ResponseStatus};
pub use retrieval::{ContextRetriever, StaticRunbookRetriever};

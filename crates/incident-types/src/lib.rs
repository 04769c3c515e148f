//! Incident Commander Types - Core records for incident response
//!
//! These types flow through every stage of the response pipeline:
//! an [`Alert`] is analyzed into a [`ContextBundle`], a generator turns the
//! bundle into a [`Plan`] of [`Step`]s, and the plan is audited and executed.
//!
//! ## Ingestion Boundary
//!
//! Plan generators are external collaborators whose output is loosely
//! shaped. [`Plan::from_value`] is the single place where that output is
//! turned into a typed plan: missing fields get their declared defaults,
//! structural violations are rejected with a [`PlanIngestError`].

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod alert;
pub mod context;
pub mod error;
pub mod ids;
pub mod ingest;
pub mod plan;

pub use alert::{Alert, Severity};
pub use context::{ContextBundle, Snippet};
pub use error::PlanIngestError;
pub use ids::{IncidentId, PlanId, StepId};
pub use plan::{Parameters, Plan, Step, DEFAULT_STEP_RISK};

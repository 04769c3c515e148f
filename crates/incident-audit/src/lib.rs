//! # Incident Commander Audit
//!
//! Risk-policy evaluation of remediation plans.
//!
//! The [`AuditEngine`] is a pure function of a [`Plan`](incident_types::Plan)
//! and an [`AuditPolicy`]: the same plan audited twice yields the same
//! [`AuditResult`]. A plan that fails the audit is not an error; it is an
//! `AuditResult` with `approved == false` and the reasons attached.
//!
//! ## Checks
//!
//! 1. Empty plan: hard error, nothing else is evaluated
//! 2. Total risk above the threshold: manual approval
//! 3. Individual steps above the threshold: manual approval
//! 4. Risky steps without rollback: recommendation only
//! 5. Destructive actions (`delete`, `kill`, `terminate`, `destroy`, `drop`): manual approval
//! 6. Policy-wide approval requirement: manual approval
//!
//! ## Example
//!
//! ```rust
//! use incident_audit::{AuditEngine, AuditPolicy};
//! use incident_types::{Plan, Step};
//!
//! let engine = AuditEngine::new(AuditPolicy {
//!     risk_threshold: 0.7,
//!     require_approval: false,
//! });
//!
//! let plan = Plan::new(
//!     "Inspect pods",
//!     vec![Step::new(1, "List pods", "shell-command").with_risk(0.1)],
//! );
//!
//! let result = engine.audit_plan(&plan);
//! assert!(result.approved);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod engine;
pub mod policy;
pub mod result;
pub mod role;

pub use engine::{AuditEngine, DESTRUCTIVE_TOKENS};
pub use policy::AuditPolicy;
pub use result::{AuditResult, HighRiskStep, RiskAssessment};
pub use role::{validate_role, Permission, Role};

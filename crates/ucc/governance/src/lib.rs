//! # ucc-governance
//!
//! The governance service: one [`GovernanceService`] owns the use case
//! portfolio, the event bus, the escalation policy and the security
//! preset registry, and emits a [`GovernanceEvent`](ucc_hooks::GovernanceEvent)
//! for every state change it makes.
//!
//! ```
//! use std::sync::Arc;
//! use ucc_governance::{GovernanceService, ucc_hooks::{AuditLogger, GovernanceHook}};
//! use ucc_types::{Dimension, RiskLevel};
//!
//! let audit = Arc::new(AuditLogger::new());
//! let mut service = GovernanceService::new();
//! service.bus().register(audit.clone() as Arc<dyn GovernanceHook>);
//!
//! let uc = service.create_use_case("AI Dailies Review");
//! service.register_use_case(uc).unwrap();
//! let index = service
//!     .flag_risk("AI Dailies Review", Dimension::BIAS, RiskLevel::Medium, "Skin tone grading", None)
//!     .unwrap();
//! service.resolve_flag("AI Dailies Review", index, "Reviewed with colorist").unwrap();
//!
//! assert_eq!(audit.len(), 2);
//! ```
//!
//! Configuration comes from [`GovernanceConfig`]; [`init_tracing`] installs
//! the log subscriber it describes.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use config::{
    EscalationConfig, EscalationRuleConfig, GovernanceConfig, LoggingConfig, RoutingOverride,
    SecurityConfig,
};
pub use error::{ConfigError, GovernanceError, Result};
pub use service::GovernanceService;
pub use telemetry::init_tracing;

pub use ucc_context;
pub use ucc_dashboard;
pub use ucc_escalation;
pub use ucc_hooks;
pub use ucc_security;
pub use ucc_types;

//! # ucc-hooks
//!
//! The outbound integration point of UCC governance. Every lifecycle
//! transition is emitted as a [`GovernanceEvent`] through a
//! [`HookRegistry`], and each registered [`GovernanceHook`] sees it.
//!
//! ## Core Components
//!
//! - [`GovernanceEvent`] / [`EventRecord`]: the event value and its stable
//!   serialized shape
//! - [`GovernanceHook`]: observer trait; every callback defaults to a no-op
//! - [`HookRegistry`]: ordered, deduplicated hook list with `emit`
//!
//! ## Built-in Adapters
//!
//! - [`AuditLogger`]: in-memory audit trail with an optional forwarding sink
//! - [`ComplianceGate`]: named criteria evaluated against an event; the
//!   verdict is re-emitted as `COMPLIANCE_GATE_PASSED`/`FAILED`
//! - [`NotificationBridge`]: forwards filtered events to a callback
//!
//! ## Dispatch
//!
//! For each hook in registration order, the event-specific callback runs
//! first (when the event type has one), then `on_event` always runs.
//! `COMPLIANCE_GATE_PASSED` and `COMPLIANCE_GATE_FAILED` both map to
//! `on_compliance_check`. `AUDIT_QUERY` and `CUSTOM` only reach `on_event`.

#![deny(unsafe_code)]

pub mod adapters;
pub mod event;
pub mod hook;
pub mod registry;

pub use adapters::{AuditLogger, AuditQuery, ComplianceGate, ComplianceResult, NotificationBridge};
pub use event::{EventRecord, GovernanceEvent, GovernanceEventType};
pub use hook::GovernanceHook;
pub use registry::{global_registry, HookRegistry};

//! Built-in hook adapters.

mod audit;
mod compliance;
mod notification;

pub use audit::{AuditLogger, AuditQuery};
pub use compliance::{ComplianceGate, ComplianceResult};
pub use notification::NotificationBridge;

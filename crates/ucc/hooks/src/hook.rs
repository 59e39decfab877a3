use crate::event::{GovernanceEvent, GovernanceEventType};

/// Observer of governance lifecycle events.
///
/// Every method has an empty default body, so an integration only overrides
/// the events it cares about. Hooks are shared across threads behind `Arc`,
/// which is why callbacks take `&self`; keep any state behind a lock.
pub trait GovernanceHook: Send + Sync {
    /// A new risk flag was created.
    fn on_flag_raised(&self, _event: &GovernanceEvent) {}

    fn on_flag_resolved(&self, _event: &GovernanceEvent) {}

    /// A flag's risk was accepted.
    fn on_flag_accepted(&self, _event: &GovernanceEvent) {}

    /// A flag was escalated by policy.
    fn on_flag_escalated(&self, _event: &GovernanceEvent) {}

    fn on_review_started(&self, _event: &GovernanceEvent) {}

    /// A compliance evaluation ran, or a gate reported its verdict.
    fn on_compliance_check(&self, _event: &GovernanceEvent) {}

    fn on_security_profile_applied(&self, _event: &GovernanceEvent) {}

    /// Catch-all, called for every event after the specific callback.
    fn on_event(&self, _event: &GovernanceEvent) {}
}

/// Deliver one event to one hook.
pub(crate) fn dispatch(hook: &dyn GovernanceHook, event: &GovernanceEvent) {
    match event.event_type {
        GovernanceEventType::FlagRaised => hook.on_flag_raised(event),
        GovernanceEventType::FlagResolved => hook.on_flag_resolved(event),
        GovernanceEventType::FlagAccepted => hook.on_flag_accepted(event),
        GovernanceEventType::FlagEscalated => hook.on_flag_escalated(event),
        GovernanceEventType::ReviewStarted => hook.on_review_started(event),
        GovernanceEventType::ComplianceCheck
        | GovernanceEventType::ComplianceGatePassed
        | GovernanceEventType::ComplianceGateFailed => hook.on_compliance_check(event),
        GovernanceEventType::SecurityProfileApplied => hook.on_security_profile_applied(event),
        GovernanceEventType::AuditQuery | GovernanceEventType::Custom => {}
    }
    hook.on_event(event);
}

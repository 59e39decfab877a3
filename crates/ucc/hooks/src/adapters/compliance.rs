use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use ucc_types::time;

use crate::event::{EventRecord, GovernanceEvent, GovernanceEventType};
use crate::hook::GovernanceHook;
use crate::registry::HookRegistry;

type Criterion = Box<dyn Fn(&GovernanceEvent) -> bool + Send + Sync>;

/// Outcome of one [`ComplianceGate::evaluate`] call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub event: EventRecord,
    pub passed: bool,
    pub failed_criteria: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// Named pass/fail criteria evaluated against governance events.
///
/// Each evaluation is logged and its verdict re-emitted on the bus as
/// `COMPLIANCE_GATE_PASSED` or `COMPLIANCE_GATE_FAILED`, so other hooks
/// (an [`AuditLogger`](super::AuditLogger), say) observe it too.
#[derive(Default)]
pub struct ComplianceGate {
    criteria: RwLock<Vec<(String, Criterion)>>,
    results: RwLock<Vec<ComplianceResult>>,
}

impl ComplianceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named criterion. Re-adding a name replaces the predicate in
    /// its original position.
    pub fn add_criterion<F>(&self, name: impl Into<String>, criterion: F)
    where
        F: Fn(&GovernanceEvent) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let mut criteria = self.criteria.write();
        match criteria.iter().position(|(n, _)| *n == name) {
            Some(index) => criteria[index].1 = Box::new(criterion),
            None => criteria.push((name, Box::new(criterion))),
        }
    }

    /// Returns whether the criterion existed.
    pub fn remove_criterion(&self, name: &str) -> bool {
        let mut criteria = self.criteria.write();
        let before = criteria.len();
        criteria.retain(|(n, _)| n != name);
        criteria.len() != before
    }

    /// Criterion names in registration order.
    pub fn criteria_names(&self) -> Vec<String> {
        self.criteria.read().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn results_log(&self) -> Vec<ComplianceResult> {
        self.results.read().clone()
    }

    /// Run every criterion against `event`, log the result and emit the
    /// verdict on `bus`. Returns `(passed, failed criterion names)`.
    pub fn evaluate(&self, event: &GovernanceEvent, bus: &HookRegistry) -> (bool, Vec<String>) {
        let failed: Vec<String> = self
            .criteria
            .read()
            .iter()
            .filter(|(_, check)| !check(event))
            .map(|(name, _)| name.clone())
            .collect();
        let passed = failed.is_empty();

        self.results.write().push(ComplianceResult {
            event: event.to_record(),
            passed,
            failed_criteria: failed.clone(),
            evaluated_at: time::now(),
        });

        let (event_type, description) = if passed {
            info!(use_case = %event.use_case_name, "Compliance gate passed");
            (
                GovernanceEventType::ComplianceGatePassed,
                "Compliance gate PASSED: all criteria met".to_string(),
            )
        } else {
            warn!(use_case = %event.use_case_name, failed = ?failed, "Compliance gate failed");
            (
                GovernanceEventType::ComplianceGateFailed,
                format!("Compliance gate FAILED: {}", failed.join(", ")),
            )
        };

        let verdict = GovernanceEvent::new(event_type)
            .with_use_case(event.use_case_name.clone())
            .with_description(description)
            .with_actor("compliance_gate")
            .with_metadata("source_event", event.event_type.as_str())
            .with_metadata("failed", json!(failed));
        bus.emit(&verdict);

        (passed, failed)
    }
}

impl GovernanceHook for ComplianceGate {}

impl std::fmt::Debug for ComplianceGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceGate")
            .field("criteria", &self.criteria_names())
            .field("results", &self.results.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AuditLogger, AuditQuery};
    use std::sync::Arc;

    fn critical_event() -> GovernanceEvent {
        GovernanceEvent::new(GovernanceEventType::ComplianceCheck)
            .with_use_case("uc")
            .with_level("CRITICAL")
    }

    #[test]
    fn criteria_in_registration_order() {
        let gate = ComplianceGate::new();
        gate.add_criterion("b", |_| true);
        gate.add_criterion("a", |_| true);
        gate.add_criterion("b", |_| false);
        assert_eq!(gate.criteria_names(), vec!["b", "a"]);
        assert!(gate.remove_criterion("b"));
        assert!(!gate.remove_criterion("b"));
        assert_eq!(gate.criteria_names(), vec!["a"]);
    }

    #[test]
    fn evaluate_reports_failures_and_logs() {
        let gate = ComplianceGate::new();
        gate.add_criterion("no_critical", |e| e.level != "CRITICAL");
        gate.add_criterion("has_use_case", |e| !e.use_case_name.is_empty());
        let bus = HookRegistry::new();

        let (passed, failed) = gate.evaluate(&critical_event(), &bus);
        assert!(!passed);
        assert_eq!(failed, vec!["no_critical"]);

        let log = gate.results_log();
        assert_eq!(log.len(), 1);
        assert!(!log[0].passed);
        assert_eq!(log[0].event.level, "CRITICAL");
    }

    #[test]
    fn empty_gate_passes() {
        let gate = ComplianceGate::new();
        let (passed, failed) = gate.evaluate(&critical_event(), &HookRegistry::new());
        assert!(passed);
        assert!(failed.is_empty());
    }

    #[test]
    fn verdict_cascades_to_other_hooks() {
        let bus = HookRegistry::new();
        let logger = Arc::new(AuditLogger::new());
        bus.register(logger.clone());

        let gate = ComplianceGate::new();
        gate.add_criterion("no_critical", |e| e.level != "CRITICAL");
        gate.evaluate(&critical_event(), &bus);

        let failed = logger.query(&AuditQuery::new().event_type(GovernanceEventType::ComplianceGateFailed));
        assert_eq!(failed.len(), 1);
        let record = &failed[0];
        assert_eq!(record.actor, "compliance_gate");
        assert_eq!(record.use_case_name, "uc");
        assert!(record.description.starts_with("Compliance gate FAILED"));
        assert_eq!(record.metadata["source_event"], "compliance_check");
        assert_eq!(record.metadata["failed"], json!(["no_critical"]));
    }
}

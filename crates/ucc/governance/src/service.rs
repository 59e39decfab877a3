use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};
use ucc_context::UseCaseContext;
use ucc_dashboard::GovernanceDashboard;
use ucc_escalation::{EscalationPolicy, EscalationResult};
use ucc_hooks::{ComplianceGate, GovernanceEvent, GovernanceEventType, HookRegistry};
use ucc_security::{apply_security_profile, PresetRegistry, SecurityProfile};
use ucc_types::{default_routing, Dimension, RiskFlag, RiskLevel, RoutingTable};

use crate::config::GovernanceConfig;
use crate::error::Result;

const ESCALATION_ACTOR: &str = "escalation_policy";

/// The governance portfolio together with its event bus.
///
/// Every state change made through the service is followed by the matching
/// [`GovernanceEvent`] on [`bus`](Self::bus). Use cases are addressed by
/// name and flags by their index within the use case; unknown names and
/// out-of-range indices yield `None`.
pub struct GovernanceService {
    dashboard: GovernanceDashboard,
    bus: Arc<HookRegistry>,
    escalation: EscalationPolicy,
    presets: Arc<PresetRegistry>,
    routing: Arc<RoutingTable>,
    default_presets: Vec<String>,
}

impl GovernanceService {
    /// Default routing, the default escalation rules, the built-in presets
    /// and a private event bus.
    pub fn new() -> Self {
        Self {
            dashboard: GovernanceDashboard::new(),
            bus: Arc::new(HookRegistry::new()),
            escalation: EscalationPolicy::default(),
            presets: Arc::new(PresetRegistry::with_builtins()),
            routing: default_routing(),
            default_presets: Vec::new(),
        }
    }

    /// Build a service from configuration.
    ///
    /// Fails if a default preset is not in the preset registry.
    pub fn from_config(config: &GovernanceConfig) -> Result<Self> {
        let routing = Arc::new(config.routing_table()?);
        let escalation = config.escalation_policy()?;
        let service = Self {
            escalation,
            routing,
            default_presets: config.security.default_presets.clone(),
            ..Self::new()
        };
        service.default_profile()?;
        info!(
            rules = service.escalation.rules().len(),
            routes = service.routing.len(),
            presets = ?service.default_presets,
            "Governance service configured"
        );
        Ok(service)
    }

    pub fn with_bus(mut self, bus: Arc<HookRegistry>) -> Self {
        self.bus = bus;
        self
    }

    pub fn with_presets(mut self, presets: Arc<PresetRegistry>) -> Self {
        self.presets = presets;
        self
    }

    pub fn with_escalation_policy(mut self, policy: EscalationPolicy) -> Self {
        self.escalation = policy;
        self
    }

    pub fn dashboard(&self) -> &GovernanceDashboard {
        &self.dashboard
    }

    pub fn bus(&self) -> &Arc<HookRegistry> {
        &self.bus
    }

    pub fn presets(&self) -> &Arc<PresetRegistry> {
        &self.presets
    }

    pub fn escalation_policy(&self) -> &EscalationPolicy {
        &self.escalation
    }

    /// Routing table given to use cases that still use the process default.
    pub fn routing(&self) -> &Arc<RoutingTable> {
        &self.routing
    }

    pub fn use_case(&self, name: &str) -> Option<&UseCaseContext> {
        self.dashboard.get(name)
    }

    // -- Registration ------------------------------------------------------

    /// A new, unregistered use case routed through the service table.
    pub fn create_use_case(&self, name: impl Into<String>) -> UseCaseContext {
        UseCaseContext::new(name).with_routing(Arc::clone(&self.routing))
    }

    /// Register a use case, replacing any with the same name.
    ///
    /// A use case still on the process default table is moved to the
    /// service table, then the configured default presets are overlaid.
    pub fn register_use_case(&mut self, mut use_case: UseCaseContext) -> Result<()> {
        if Arc::ptr_eq(use_case.routing(), &default_routing()) {
            use_case.set_routing(Arc::clone(&self.routing));
        }
        if let Some(profile) = self.default_profile()? {
            apply_security_profile(&mut use_case, &profile);
        }
        self.dashboard.register(use_case);
        Ok(())
    }

    pub fn unregister_use_case(&mut self, name: &str) -> Option<UseCaseContext> {
        self.dashboard.unregister(name)
    }

    /// Decode a serialized use case with the service routing and register it.
    ///
    /// Returns the registered name.
    pub fn import_json(&mut self, json: &str) -> Result<String> {
        let use_case = ucc_context::codec::from_json(json, Some(Arc::clone(&self.routing)))?;
        let name = use_case.name.clone();
        self.register_use_case(use_case)?;
        Ok(name)
    }

    pub fn export_json(&self, name: &str) -> Option<Result<String>> {
        self.dashboard
            .get(name)
            .map(|uc| uc.to_json().map_err(Into::into))
    }

    fn default_profile(&self) -> Result<Option<SecurityProfile>> {
        if self.default_presets.is_empty() {
            return Ok(None);
        }
        let names: Vec<&str> = self.default_presets.iter().map(String::as_str).collect();
        Ok(Some(self.presets.security_profile(&names)?))
    }

    // -- Flag lifecycle ----------------------------------------------------

    /// Flag a risk and emit `FLAG_RAISED`. Returns the new flag's index.
    pub fn flag_risk(
        &mut self,
        name: &str,
        dimension: Dimension,
        level: RiskLevel,
        description: impl Into<String>,
        reviewer: Option<&str>,
    ) -> Option<usize> {
        let use_case = self.dashboard.get_mut(name)?;
        let flag = use_case.flag_risk(dimension, level, description, reviewer).clone();
        let index = use_case.flags().len() - 1;

        let event = GovernanceEvent::for_flag(GovernanceEventType::FlagRaised, name, &flag)
            .with_metadata("flag_index", index)
            .with_metadata("reviewer", flag.reviewer.as_str())
            .with_metadata("blocking", flag.is_blocking());
        self.bus.emit(&event);
        Some(index)
    }

    /// Move a flag to review and emit `REVIEW_STARTED`.
    pub fn begin_review(&mut self, name: &str, index: usize) -> Option<RiskFlag> {
        self.transition(name, index, GovernanceEventType::ReviewStarted, |flag| {
            flag.begin_review();
        })
    }

    /// Resolve a flag and emit `FLAG_RESOLVED`.
    pub fn resolve_flag(&mut self, name: &str, index: usize, notes: &str) -> Option<RiskFlag> {
        self.transition(name, index, GovernanceEventType::FlagResolved, |flag| {
            flag.resolve(notes);
        })
    }

    /// Accept a flag's risk and emit `FLAG_ACCEPTED`.
    pub fn accept_flag(&mut self, name: &str, index: usize, notes: &str) -> Option<RiskFlag> {
        self.transition(name, index, GovernanceEventType::FlagAccepted, |flag| {
            flag.accept_risk(notes);
        })
    }

    /// Block a flag and emit a `CUSTOM` event with `action = "mark_blocked"`.
    pub fn mark_blocked(&mut self, name: &str, index: usize) -> Option<RiskFlag> {
        self.transition(name, index, GovernanceEventType::Custom, |flag| {
            flag.mark_blocked();
        })
    }

    fn transition<F>(
        &mut self,
        name: &str,
        index: usize,
        event_type: GovernanceEventType,
        apply: F,
    ) -> Option<RiskFlag>
    where
        F: FnOnce(&mut RiskFlag),
    {
        let flag = self.dashboard.get_mut(name)?.flag_mut(index)?;
        let previous = flag.status;
        apply(&mut *flag);
        let flag = flag.clone();
        debug!(
            use_case = %name,
            index,
            from = %previous,
            to = %flag.status,
            "Flag status changed"
        );

        let mut event = GovernanceEvent::for_flag(event_type, name, &flag)
            .with_metadata("flag_index", index)
            .with_metadata("reviewer", flag.reviewer.as_str())
            .with_metadata("previous_status", previous.name())
            .with_metadata("status", flag.status.name());
        if !flag.resolution_notes.is_empty() {
            event = event.with_metadata("resolution_notes", flag.resolution_notes.as_str());
        }
        if event_type == GovernanceEventType::Custom {
            event = event.with_metadata("action", "mark_blocked");
        }
        self.bus.emit(&event);
        Some(flag)
    }

    // -- Escalation --------------------------------------------------------

    /// Escalations due across the portfolio, without applying them.
    pub fn check_escalations(&self, now: DateTime<Utc>) -> Vec<EscalationResult> {
        self.escalation.check_dashboard(&self.dashboard, now)
    }

    /// Apply due escalations to one use case, emitting `FLAG_ESCALATED` for
    /// each.
    pub fn apply_escalations(&mut self, name: &str, now: DateTime<Utc>) -> Option<Vec<EscalationResult>> {
        let use_case = self.dashboard.get_mut(name)?;
        let results = self.escalation.apply_escalations(use_case, now);
        for result in &results {
            self.bus.emit(&escalation_event(result));
        }
        Some(results)
    }

    /// Apply due escalations to every registered use case.
    pub fn apply_all_escalations(&mut self, now: DateTime<Utc>) -> Vec<EscalationResult> {
        let mut results = Vec::new();
        for use_case in self.dashboard.use_cases_mut() {
            results.extend(self.escalation.apply_escalations(use_case, now));
        }
        for result in &results {
            self.bus.emit(&escalation_event(result));
        }
        results
    }

    // -- Security profiles -------------------------------------------------

    /// Compose `presets` and overlay the result onto one use case, emitting
    /// `SECURITY_PROFILE_APPLIED`.
    ///
    /// An unknown preset name is an error even when the use case does not
    /// exist.
    pub fn apply_security_profile(
        &mut self,
        name: &str,
        presets: &[&str],
    ) -> Result<Option<SecurityProfile>> {
        let profile = self.presets.security_profile(presets)?;
        let Some(use_case) = self.dashboard.get_mut(name) else {
            return Ok(None);
        };
        apply_security_profile(use_case, &profile);
        let routes = use_case.routing().len();

        let event = GovernanceEvent::new(GovernanceEventType::SecurityProfileApplied)
            .with_use_case(name)
            .with_description(profile.to_string())
            .with_metadata("presets", profile.presets().to_vec())
            .with_metadata("dimensions", profile.dimensions().len())
            .with_metadata("routes", routes);
        self.bus.emit(&event);
        Ok(Some(profile))
    }

    // -- Compliance --------------------------------------------------------

    /// Emit `COMPLIANCE_CHECK` for a use case and evaluate it through
    /// `gate`, which emits its own verdict. Returns `(passed, failed)`.
    pub fn run_compliance_check(
        &self,
        name: &str,
        gate: &ComplianceGate,
    ) -> Option<(bool, Vec<String>)> {
        let use_case = self.dashboard.get(name)?;
        let blockers: Vec<String> = use_case
            .get_blockers()
            .iter()
            .map(|f| f.dimension.name().to_string())
            .collect();

        let event = GovernanceEvent::new(GovernanceEventType::ComplianceCheck)
            .with_use_case(name)
            .with_level(use_case.max_risk_level().name())
            .with_description(format!("Compliance check for {name}"))
            .with_metadata("blocked", use_case.is_blocked())
            .with_metadata("blockers", blockers)
            .with_metadata("pending_reviews", use_case.get_pending_reviews().len())
            .with_metadata("reviewers_needed", use_case.get_reviewers_needed())
            .with_metadata("risk_score", json!(use_case.risk_score()));
        self.bus.emit(&event);

        let verdict = gate.evaluate(&event, &self.bus);
        if !verdict.0 {
            warn!(use_case = %name, failed = ?verdict.1, "Use case failed compliance check");
        }
        Some(verdict)
    }

    /// Portfolio summary text.
    pub fn summary(&self) -> String {
        self.dashboard.summary()
    }
}

impl Default for GovernanceService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GovernanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceService")
            .field("use_cases", &self.dashboard.len())
            .field("hooks", &self.bus.len())
            .field("rules", &self.escalation.rules().len())
            .field("default_presets", &self.default_presets)
            .finish()
    }
}

fn escalation_event(result: &EscalationResult) -> GovernanceEvent {
    let mut event = GovernanceEvent::for_flag(
        GovernanceEventType::FlagEscalated,
        &result.use_case_name,
        &result.flag,
    )
    .with_actor(ESCALATION_ACTOR)
    .with_description(result.message.clone())
    .with_metadata("from_level", result.flag.level.name())
    .with_metadata("to_level", result.escalate_to_level.name())
    .with_metadata("from_reviewer", result.flag.reviewer.as_str())
    .with_metadata("to_reviewer", result.escalate_to_reviewer.as_str())
    .with_metadata("age_secs", result.age.num_seconds())
    .with_metadata("threshold_secs", result.threshold.num_seconds());
    if let Some(index) = result.flag_index {
        event = event.with_metadata("flag_index", index);
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use ucc_hooks::{AuditLogger, AuditQuery, GovernanceHook};
    use ucc_types::ReviewStatus;

    fn service_with_audit() -> (GovernanceService, Arc<AuditLogger>) {
        let audit = Arc::new(AuditLogger::new());
        let bus = Arc::new(HookRegistry::new());
        bus.register(audit.clone() as Arc<dyn GovernanceHook>);
        (GovernanceService::new().with_bus(bus), audit)
    }

    #[test]
    fn unknown_use_case_is_none() {
        let (mut service, audit) = service_with_audit();
        assert!(service
            .flag_risk("missing", Dimension::BIAS, RiskLevel::Low, "x", None)
            .is_none());
        assert!(service.begin_review("missing", 0).is_none());
        assert!(service.apply_escalations("missing", ucc_types::now()).is_none());
        assert!(audit.is_empty());
    }

    #[test]
    fn out_of_range_index_is_none() {
        let (mut service, audit) = service_with_audit();
        service.register_use_case(service.create_use_case("uc")).unwrap();
        assert!(service.resolve_flag("uc", 3, "done").is_none());
        assert!(audit.is_empty());
    }

    #[test]
    fn flag_lifecycle_emits_events() {
        let (mut service, audit) = service_with_audit();
        service.register_use_case(UseCaseContext::new("uc")).unwrap();
        let i = service
            .flag_risk("uc", Dimension::LEGAL_IP, RiskLevel::High, "Training data", None)
            .unwrap();
        assert_eq!(i, 0);
        assert_eq!(
            service.begin_review("uc", i).unwrap().status,
            ReviewStatus::InReview
        );
        let resolved = service.resolve_flag("uc", i, "Licensed").unwrap();
        assert_eq!(resolved.status, ReviewStatus::Resolved);

        let types: Vec<_> = audit.entries().iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                GovernanceEventType::FlagRaised,
                GovernanceEventType::ReviewStarted,
                GovernanceEventType::FlagResolved,
            ]
        );
        let raised = &audit.entries()[0];
        assert_eq!(raised.metadata["reviewer"], json!("VP Legal / Business Affairs"));
        assert_eq!(raised.metadata["blocking"], json!(true));
        let resolved = &audit.entries()[2];
        assert_eq!(resolved.metadata["resolution_notes"], json!("Licensed"));
        assert_eq!(resolved.metadata["previous_status"], json!("IN_REVIEW"));
    }

    #[test]
    fn mark_blocked_is_custom_event() {
        let (mut service, audit) = service_with_audit();
        service.register_use_case(UseCaseContext::new("uc")).unwrap();
        service.flag_risk("uc", Dimension::SAFETY, RiskLevel::Medium, "x", None);
        service.mark_blocked("uc", 0).unwrap();
        let custom = audit.query(&AuditQuery::new().event_type(GovernanceEventType::Custom));
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].metadata["action"], json!("mark_blocked"));
    }

    #[test]
    fn escalation_events_carry_both_levels() {
        let (mut service, audit) = service_with_audit();
        service.register_use_case(UseCaseContext::new("uc")).unwrap();
        service.flag_risk("uc", Dimension::QUALITY, RiskLevel::Low, "Artifacts", None);
        let created = service.use_case("uc").unwrap().flags()[0].created_at;

        let results = service
            .apply_escalations("uc", created + TimeDelta::days(8))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(service.use_case("uc").unwrap().flags()[0].level, RiskLevel::Medium);

        let escalated = audit.query(&AuditQuery::new().event_type(GovernanceEventType::FlagEscalated));
        assert_eq!(escalated.len(), 1);
        assert_eq!(escalated[0].actor, "escalation_policy");
        assert_eq!(escalated[0].metadata["from_level"], json!("LOW"));
        assert_eq!(escalated[0].metadata["to_level"], json!("MEDIUM"));
    }

    #[test]
    fn unknown_preset_fails_before_lookup() {
        let mut service = GovernanceService::new();
        assert!(service.apply_security_profile("missing", &["nope"]).is_err());
        assert!(service.apply_security_profile("missing", &["tpn"]).unwrap().is_none());
    }

    #[test]
    fn registration_moves_default_routing_to_service_table() {
        let config = GovernanceConfig::from_json_str(
            r#"{"routing_overrides": [{"dimension": "BIAS", "level": "LOW", "reviewer": "Fairness Desk"}]}"#,
        )
        .unwrap();
        let mut service = GovernanceService::from_config(&config).unwrap();
        service.register_use_case(UseCaseContext::new("uc")).unwrap();
        assert!(Arc::ptr_eq(service.use_case("uc").unwrap().routing(), service.routing()));
        service.flag_risk("uc", Dimension::BIAS, RiskLevel::Low, "x", None);
        assert_eq!(service.use_case("uc").unwrap().flags()[0].reviewer, "Fairness Desk");
    }

    #[test]
    fn misspelled_default_preset_fails_at_startup() {
        let mut config = GovernanceConfig::default();
        config.security.default_presets = vec!["tpm".into()];
        assert!(GovernanceService::from_config(&config).is_err());
    }
}

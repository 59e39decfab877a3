use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ucc_types::{time, RiskFlag};

/// Categories of governance lifecycle events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceEventType {
    FlagRaised,
    FlagResolved,
    FlagAccepted,
    FlagEscalated,
    ReviewStarted,
    ComplianceCheck,
    ComplianceGatePassed,
    ComplianceGateFailed,
    SecurityProfileApplied,
    AuditQuery,
    Custom,
}

impl GovernanceEventType {
    pub const ALL: [GovernanceEventType; 11] = [
        GovernanceEventType::FlagRaised,
        GovernanceEventType::FlagResolved,
        GovernanceEventType::FlagAccepted,
        GovernanceEventType::FlagEscalated,
        GovernanceEventType::ReviewStarted,
        GovernanceEventType::ComplianceCheck,
        GovernanceEventType::ComplianceGatePassed,
        GovernanceEventType::ComplianceGateFailed,
        GovernanceEventType::SecurityProfileApplied,
        GovernanceEventType::AuditQuery,
        GovernanceEventType::Custom,
    ];

    /// Wire value, e.g. `"flag_raised"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            GovernanceEventType::FlagRaised => "flag_raised",
            GovernanceEventType::FlagResolved => "flag_resolved",
            GovernanceEventType::FlagAccepted => "flag_accepted",
            GovernanceEventType::FlagEscalated => "flag_escalated",
            GovernanceEventType::ReviewStarted => "review_started",
            GovernanceEventType::ComplianceCheck => "compliance_check",
            GovernanceEventType::ComplianceGatePassed => "compliance_gate_passed",
            GovernanceEventType::ComplianceGateFailed => "compliance_gate_failed",
            GovernanceEventType::SecurityProfileApplied => "security_profile_applied",
            GovernanceEventType::AuditQuery => "audit_query",
            GovernanceEventType::Custom => "custom",
        }
    }
}

impl fmt::Display for GovernanceEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A governance event handed to every hook.
///
/// Dimension and level are carried as their names so that hooks never
/// depend on the domain types.
#[derive(Clone, Debug, PartialEq)]
pub struct GovernanceEvent {
    pub event_type: GovernanceEventType,
    pub use_case_name: String,
    pub dimension: String,
    pub level: String,
    pub description: String,
    /// Who or what triggered the event. Defaults to `"system"`.
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: BTreeMap<String, Value>,
}

impl GovernanceEvent {
    pub fn new(event_type: GovernanceEventType) -> Self {
        Self {
            event_type,
            use_case_name: String::new(),
            dimension: String::new(),
            level: String::new(),
            description: String::new(),
            actor: "system".to_string(),
            timestamp: time::now(),
            metadata: BTreeMap::new(),
        }
    }

    /// Event describing a flag on a use case.
    pub fn for_flag(event_type: GovernanceEventType, use_case_name: &str, flag: &RiskFlag) -> Self {
        Self::new(event_type)
            .with_use_case(use_case_name)
            .with_dimension(flag.dimension.name())
            .with_level(flag.level.name())
            .with_description(flag.description.clone())
    }

    pub fn with_use_case(mut self, name: impl Into<String>) -> Self {
        self.use_case_name = name.into();
        self
    }

    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = dimension.into();
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Stable record shape for logs, webhooks and SIEM ingestion.
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            event_type: self.event_type,
            use_case_name: self.use_case_name.clone(),
            dimension: self.dimension.clone(),
            level: self.level.clone(),
            description: self.description.clone(),
            actor: self.actor.clone(),
            timestamp: self.timestamp,
            metadata: self.metadata.clone(),
        }
    }
}

/// Serialized form of a [`GovernanceEvent`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_type: GovernanceEventType,
    pub use_case_name: String,
    pub dimension: String,
    pub level: String,
    pub description: String,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use ucc_types::{Dimension, RiskLevel};

    #[test]
    fn wire_values_are_snake_case() {
        for t in GovernanceEventType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        assert_eq!(
            GovernanceEventType::SecurityProfileApplied.to_string(),
            "security_profile_applied"
        );
    }

    #[test]
    fn defaults() {
        let e = GovernanceEvent::new(GovernanceEventType::Custom);
        assert_eq!(e.actor, "system");
        assert!(e.use_case_name.is_empty());
        assert!(e.metadata.is_empty());
    }

    #[test]
    fn for_flag_carries_names() {
        let flag = RiskFlag::new(Dimension::BIAS, RiskLevel::High, "Skewed casting");
        let e = GovernanceEvent::for_flag(GovernanceEventType::FlagRaised, "Casting", &flag);
        assert_eq!(e.dimension, "BIAS");
        assert_eq!(e.level, "HIGH");
        assert_eq!(e.description, "Skewed casting");
        assert_eq!(e.use_case_name, "Casting");
    }

    #[test]
    fn record_shape() {
        let e = GovernanceEvent::new(GovernanceEventType::FlagEscalated)
            .with_use_case("uc")
            .with_actor("escalation_policy")
            .with_metadata("to_level", "CRITICAL");
        let value = serde_json::to_value(e.to_record()).unwrap();
        assert_eq!(value["event_type"], "flag_escalated");
        assert_eq!(value["actor"], "escalation_policy");
        assert_eq!(value["metadata"], json!({"to_level": "CRITICAL"}));
        for key in ["use_case_name", "dimension", "level", "description", "timestamp"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}

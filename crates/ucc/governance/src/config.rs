//! Service configuration.
//!
//! Loaded from an optional file, then overridden by `UCC__`-prefixed
//! environment variables (`UCC__LOGGING__LEVEL=debug`). Every section is
//! optional.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use ucc_escalation::{EscalationPolicy, EscalationRule};
use ucc_types::{default_routing, Dimension, RiskLevel, RoutingTable};

use crate::error::ConfigError;

/// Root configuration for a [`GovernanceService`](crate::GovernanceService).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub escalation: EscalationConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    /// Layered over the default routing table.
    #[serde(default)]
    pub routing_overrides: Vec<RoutingOverride>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Escalation rules. An empty list means the built-in rule table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EscalationConfig {
    #[serde(default)]
    pub rules: Vec<EscalationRuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationRuleConfig {
    pub from_level: String,
    pub threshold_secs: u64,
    pub escalate_to_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_to_reviewer: Option<String>,
}

/// Presets applied to every use case registered through the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub default_presets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingOverride {
    pub dimension: String,
    pub level: String,
    pub reviewer: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GovernanceConfig {
    /// Load from an optional file plus the `UCC__` environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        builder = builder.add_source(config::Config::try_from(&GovernanceConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("UCC")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("security.default_presets")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the escalation policy described by this config.
    pub fn escalation_policy(&self) -> Result<EscalationPolicy, ConfigError> {
        if self.escalation.rules.is_empty() {
            return Ok(EscalationPolicy::default());
        }

        let rules = self
            .escalation
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| rule.to_rule(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EscalationPolicy::new(rules))
    }

    /// The default routing table with `routing_overrides` applied.
    pub fn routing_table(&self) -> Result<RoutingTable, ConfigError> {
        let mut table = default_routing().as_ref().clone();
        for (i, entry) in self.routing_overrides.iter().enumerate() {
            let level = parse_level(&format!("routing_overrides[{i}].level"), &entry.level)?;
            if entry.reviewer.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("routing_overrides[{i}].reviewer"),
                    "reviewer must not be empty",
                ));
            }
            table.insert(resolve_dimension(&entry.dimension), level, entry.reviewer.clone());
        }
        Ok(table)
    }
}

impl EscalationRuleConfig {
    fn to_rule(&self, index: usize) -> Result<EscalationRule, ConfigError> {
        let field = |name: &str| format!("escalation.rules[{index}].{name}");
        let from_level = parse_level(&field("from_level"), &self.from_level)?;
        let escalate_to_level = parse_level(&field("escalate_to_level"), &self.escalate_to_level)?;
        let threshold = i64::try_from(self.threshold_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| ConfigError::invalid(field("threshold_secs"), "threshold out of range"))?;

        let rule = EscalationRule::new(from_level, threshold, escalate_to_level);
        Ok(match self.escalate_to_reviewer.as_deref().filter(|r| !r.is_empty()) {
            Some(reviewer) => rule.with_reviewer(reviewer),
            None => rule,
        })
    }
}

fn parse_level(field: &str, value: &str) -> Result<RiskLevel, ConfigError> {
    value
        .trim()
        .to_uppercase()
        .parse()
        .map_err(|e: ucc_types::TypesError| ConfigError::invalid(field, e.to_string()))
}

/// Built-in names map to built-ins; anything else becomes a custom
/// dimension labelled with its own name.
fn resolve_dimension(name: &str) -> Dimension {
    Dimension::builtin(name).unwrap_or_else(|| Dimension::custom(name, name))
}

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use lazy_static::lazy_static;
use tracing::{debug, info};
use ucc_context::UseCaseContext;
use ucc_dashboard::GovernanceDashboard;
use ucc_types::{RiskFlag, RiskLevel, RoutingTable};

/// Reviewer for re-notified CRITICAL flags.
pub const CSUITE_REVIEWER: &str = "C-Suite Escalation";

/// Escalate flags at `from_level` that stay unsettled past `threshold`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscalationRule {
    pub from_level: RiskLevel,
    pub threshold: TimeDelta,
    pub escalate_to_level: RiskLevel,
    /// Explicit target reviewer; when unset the policy routing table or a
    /// fallback is used.
    pub escalate_to_reviewer: Option<String>,
}

impl EscalationRule {
    pub fn new(from_level: RiskLevel, threshold: TimeDelta, escalate_to_level: RiskLevel) -> Self {
        Self {
            from_level,
            threshold,
            escalate_to_level,
            escalate_to_reviewer: None,
        }
    }

    pub fn with_reviewer(mut self, reviewer: impl Into<String>) -> Self {
        self.escalate_to_reviewer = Some(reviewer.into());
        self
    }
}

lazy_static! {
    static ref DEFAULT_RULES: Vec<EscalationRule> = vec![
        EscalationRule::new(RiskLevel::Low, TimeDelta::days(7), RiskLevel::Medium),
        EscalationRule::new(RiskLevel::Medium, TimeDelta::days(3), RiskLevel::High),
        EscalationRule::new(RiskLevel::High, TimeDelta::days(1), RiskLevel::Critical),
        EscalationRule::new(RiskLevel::Critical, TimeDelta::hours(4), RiskLevel::Critical)
            .with_reviewer(CSUITE_REVIEWER),
    ];
}

/// A flag that has outlived its review window.
#[derive(Clone, Debug, PartialEq)]
pub struct EscalationResult {
    /// Position of the flag in its use case, when checked through one.
    pub flag_index: Option<usize>,
    /// The flag as it was when checked.
    pub flag: RiskFlag,
    pub use_case_name: String,
    pub age: TimeDelta,
    pub threshold: TimeDelta,
    pub escalate_to_level: RiskLevel,
    pub escalate_to_reviewer: String,
    pub message: String,
}

fn days_hours(delta: TimeDelta) -> String {
    let days = delta.num_days();
    let hours = (delta - TimeDelta::days(days)).num_hours();
    format!("{}d {}h", days, hours)
}

/// Ordered escalation rules plus an optional routing table for targets.
#[derive(Clone, Debug)]
pub struct EscalationPolicy {
    rules: Vec<EscalationRule>,
    routing: Option<Arc<RoutingTable>>,
}

impl EscalationPolicy {
    pub fn new(rules: Vec<EscalationRule>) -> Self {
        Self {
            rules,
            routing: None,
        }
    }

    /// The default rule table.
    pub fn default_rules() -> Vec<EscalationRule> {
        DEFAULT_RULES.clone()
    }

    pub fn with_routing(mut self, routing: Arc<RoutingTable>) -> Self {
        self.routing = Some(routing);
        self
    }

    pub fn rules(&self) -> &[EscalationRule] {
        &self.rules
    }

    pub fn routing(&self) -> Option<&Arc<RoutingTable>> {
        self.routing.as_ref()
    }

    /// First rule whose source level matches.
    fn rule_for(&self, level: RiskLevel) -> Option<&EscalationRule> {
        self.rules.iter().find(|r| r.from_level == level)
    }

    /// Target reviewer: explicit rule reviewer, then the policy routing
    /// table at the target level, then `"Escalated from {reviewer}"`.
    fn target_reviewer(&self, rule: &EscalationRule, flag: &RiskFlag) -> String {
        if let Some(reviewer) = rule.escalate_to_reviewer.as_deref().filter(|r| !r.is_empty()) {
            return reviewer.to_string();
        }
        let routed = self
            .routing
            .as_ref()
            .filter(|table| !table.is_empty())
            .and_then(|table| table.get(&flag.dimension, rule.escalate_to_level))
            .filter(|r| !r.is_empty());
        match routed {
            Some(reviewer) => reviewer.to_string(),
            None => format!("Escalated from {}", flag.reviewer),
        }
    }

    /// Check one flag. Settled flags never escalate.
    pub fn check_flag(
        &self,
        flag: &RiskFlag,
        use_case_name: &str,
        now: DateTime<Utc>,
    ) -> Option<EscalationResult> {
        if flag.is_settled() {
            return None;
        }
        let rule = self.rule_for(flag.level)?;
        let age = now - flag.created_at;
        if age < rule.threshold {
            return None;
        }

        let escalate_to_reviewer = self.target_reviewer(rule, flag);
        let message = format!(
            "Flag '{}' ({}) has been open for {} — exceeds threshold of {}. Escalating to {}.",
            flag.description,
            flag.level.name(),
            days_hours(age),
            days_hours(rule.threshold),
            rule.escalate_to_level.name()
        );
        debug!(
            use_case = %use_case_name,
            dimension = %flag.dimension.name(),
            from = %flag.level,
            to = %rule.escalate_to_level,
            "Flag exceeds escalation threshold"
        );

        Some(EscalationResult {
            flag_index: None,
            flag: flag.clone(),
            use_case_name: use_case_name.to_string(),
            age,
            threshold: rule.threshold,
            escalate_to_level: rule.escalate_to_level,
            escalate_to_reviewer,
            message,
        })
    }

    /// Check every flag of a use case, in flag order.
    pub fn check_use_case(&self, use_case: &UseCaseContext, now: DateTime<Utc>) -> Vec<EscalationResult> {
        use_case
            .flags()
            .iter()
            .enumerate()
            .filter_map(|(index, flag)| {
                self.check_flag(flag, &use_case.name, now).map(|mut result| {
                    result.flag_index = Some(index);
                    result
                })
            })
            .collect()
    }

    /// Check every registered use case, in registration order.
    pub fn check_dashboard(&self, dashboard: &GovernanceDashboard, now: DateTime<Utc>) -> Vec<EscalationResult> {
        dashboard
            .use_cases()
            .iter()
            .flat_map(|uc| self.check_use_case(uc, now))
            .collect()
    }

    /// Check a use case and rewrite each escalated flag's level and reviewer.
    ///
    /// Returns the escalations that were applied.
    pub fn apply_escalations(
        &self,
        use_case: &mut UseCaseContext,
        now: DateTime<Utc>,
    ) -> Vec<EscalationResult> {
        let results = self.check_use_case(use_case, now);
        for result in &results {
            let Some(flag) = result.flag_index.and_then(|i| use_case.flag_mut(i)) else {
                continue;
            };
            flag.level = result.escalate_to_level;
            if !result.escalate_to_reviewer.is_empty() {
                flag.reviewer = result.escalate_to_reviewer.clone();
            }
            info!(
                use_case = %result.use_case_name,
                dimension = %flag.dimension.name(),
                level = %flag.level,
                reviewer = %flag.reviewer,
                "Escalation applied"
            );
        }
        results
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}

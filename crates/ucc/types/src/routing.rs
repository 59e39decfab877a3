use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::debug;

use crate::dimension::{BuiltinDimension, Dimension};
use crate::level::RiskLevel;

/// Reviewer assigned when no routing entry matches.
pub const UNASSIGNED_REVIEWER: &str = "Unassigned";

/// Mapping of `(dimension, level)` to a suggested reviewer role.
///
/// Keys use dimension name identity, so a custom dimension and a built-in
/// with the same name resolve to the same entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoutingTable {
    entries: HashMap<(Dimension, RiskLevel), String>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the reviewer it replaced.
    pub fn insert(
        &mut self,
        dimension: Dimension,
        level: RiskLevel,
        reviewer: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert((dimension, level), reviewer.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, dimension: Dimension, level: RiskLevel, reviewer: impl Into<String>) -> Self {
        self.insert(dimension, level, reviewer);
        self
    }

    pub fn get(&self, dimension: &Dimension, level: RiskLevel) -> Option<&str> {
        self.entries
            .get(&(dimension.clone(), level))
            .map(String::as_str)
    }

    pub fn contains(&self, dimension: &Dimension, level: RiskLevel) -> bool {
        self.entries.contains_key(&(dimension.clone(), level))
    }

    /// Resolve a reviewer, degrading to [`UNASSIGNED_REVIEWER`].
    pub fn resolve(&self, dimension: &Dimension, level: RiskLevel) -> String {
        match self.get(dimension, level) {
            Some(reviewer) => reviewer.to_string(),
            None => {
                debug!(dimension = %dimension.name(), level = %level, "No routing entry");
                UNASSIGNED_REVIEWER.to_string()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, RiskLevel, &str)> {
        self.entries
            .iter()
            .map(|((d, l), r)| (d, *l, r.as_str()))
    }

    /// Overlay `other` onto this table; `other` wins on collision.
    pub fn extend_from(&mut self, other: &RoutingTable) {
        for ((dimension, level), reviewer) in &other.entries {
            self.entries
                .insert((dimension.clone(), *level), reviewer.clone());
        }
    }

    /// Right-biased union of two tables.
    pub fn merged(&self, other: &RoutingTable) -> RoutingTable {
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    /// Build the built-in default routing table (24 entries).
    pub fn builtin_defaults() -> RoutingTable {
        let rows: [(BuiltinDimension, [&str; 4]); 6] = [
            (
                BuiltinDimension::LegalIp,
                [
                    "IP Coordinator",
                    "Legal Counsel",
                    "VP Legal / Business Affairs",
                    "General Counsel + C-Suite",
                ],
            ),
            (
                BuiltinDimension::Bias,
                [
                    "Fairness Analyst",
                    "Bias Review Board",
                    "VP Ethics / Policy",
                    "C-Suite + External Fairness Auditor",
                ],
            ),
            (
                BuiltinDimension::Safety,
                [
                    "Safety Analyst",
                    "Safety Review Board",
                    "VP Safety / Policy",
                    "C-Suite + External Safety Advisor",
                ],
            ),
            (
                BuiltinDimension::Security,
                [
                    "Security Analyst",
                    "Security Engineer",
                    "CISO / VP Security",
                    "CISO + External Security Audit",
                ],
            ),
            (
                BuiltinDimension::Feasibility,
                [
                    "Tech Lead",
                    "VFX Supervisor",
                    "VP Technology / CTO",
                    "CTO + External Technical Review",
                ],
            ),
            (
                BuiltinDimension::Quality,
                [
                    "QA Lead",
                    "Department Supervisor",
                    "VP Production / Post",
                    "Executive Producer + Department Head",
                ],
            ),
        ];

        let mut table = RoutingTable::new();
        for (dimension, reviewers) in rows {
            table.insert_row(Dimension::Builtin(dimension), reviewers);
        }
        table
    }

    /// Insert LOW..CRITICAL reviewers for one dimension.
    pub fn insert_row(&mut self, dimension: Dimension, reviewers: [&str; 4]) {
        let levels = [
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::Critical,
        ];
        for (level, reviewer) in levels.into_iter().zip(reviewers) {
            self.insert(dimension.clone(), level, reviewer);
        }
    }
}

impl FromIterator<((Dimension, RiskLevel), String)> for RoutingTable {
    fn from_iter<I: IntoIterator<Item = ((Dimension, RiskLevel), String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

lazy_static! {
    static ref DEFAULT_ROUTING: Arc<RoutingTable> = Arc::new(RoutingTable::builtin_defaults());
}

/// The shared process-wide default routing table.
pub fn default_routing() -> Arc<RoutingTable> {
    Arc::clone(&DEFAULT_ROUTING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::custom_dimension;

    #[test]
    fn defaults_cover_every_builtin_and_routed_level() {
        let table = default_routing();
        assert_eq!(table.len(), 24);
        for dim in Dimension::builtins() {
            for level in [
                RiskLevel::Low,
                RiskLevel::Medium,
                RiskLevel::High,
                RiskLevel::Critical,
            ] {
                assert!(table.contains(&dim, level), "missing {} x {}", dim.name(), level);
            }
            assert!(!table.contains(&dim, RiskLevel::None));
        }
    }

    #[test]
    fn default_is_shared() {
        assert!(Arc::ptr_eq(&default_routing(), &default_routing()));
    }

    #[test]
    fn resolve_known_and_unknown() {
        let table = default_routing();
        assert_eq!(
            table.resolve(&Dimension::LEGAL_IP, RiskLevel::High),
            "VP Legal / Business Affairs"
        );
        let financial = custom_dimension("FINANCIAL", "Financial Risk");
        assert_eq!(table.resolve(&financial, RiskLevel::High), UNASSIGNED_REVIEWER);
    }

    #[test]
    fn lookup_across_dimension_variants() {
        let table = RoutingTable::new().with(Dimension::SAFETY, RiskLevel::Low, "X");
        let shadow = custom_dimension("SAFETY", "Shadow");
        assert_eq!(table.get(&shadow, RiskLevel::Low), Some("X"));
    }

    #[test]
    fn merged_is_right_biased() {
        let fin = custom_dimension("FINANCIAL", "Financial Risk");
        let left = RoutingTable::new()
            .with(fin.clone(), RiskLevel::Low, "left")
            .with(fin.clone(), RiskLevel::High, "left-high");
        let right = RoutingTable::new().with(fin.clone(), RiskLevel::Low, "right");

        let merged = left.merged(&right);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(&fin, RiskLevel::Low), Some("right"));
        assert_eq!(merged.get(&fin, RiskLevel::High), Some("left-high"));
        // inputs untouched
        assert_eq!(left.get(&fin, RiskLevel::Low), Some("left"));
    }
}

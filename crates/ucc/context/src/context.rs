use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use ucc_types::{
    default_routing, time, Dimension, ReviewStatus, RiskFlag, RiskLevel, RoutingTable,
    UNASSIGNED_REVIEWER,
};

/// One production AI use case and the risks flagged against it.
///
/// The context owns its flags exclusively. Its routing table is shared and
/// may be aliased by other contexts; replacing it never touches existing
/// flags.
#[derive(Clone, Debug)]
pub struct UseCaseContext {
    /// Identity key inside a dashboard.
    pub name: String,
    pub description: String,
    /// Workflow phase label; empty when unset.
    pub workflow_phase: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    flags: Vec<RiskFlag>,
    routing: Arc<RoutingTable>,
}

impl UseCaseContext {
    /// Create an empty context routed through the default table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            workflow_phase: String::new(),
            tags: Vec::new(),
            created_at: time::now(),
            flags: Vec::new(),
            routing: default_routing(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.workflow_phase = phase.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_routing(mut self, routing: Arc<RoutingTable>) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn routing(&self) -> &Arc<RoutingTable> {
        &self.routing
    }

    pub fn set_routing(&mut self, routing: Arc<RoutingTable>) {
        self.routing = routing;
    }

    // -- Flagging ----------------------------------------------------------

    /// Flag a risk on this use case.
    ///
    /// With no reviewer (or an empty one) the reviewer is looked up in the
    /// routing table, falling back to [`UNASSIGNED_REVIEWER`]. Returns the
    /// new flag for further manipulation.
    pub fn flag_risk(
        &mut self,
        dimension: Dimension,
        level: RiskLevel,
        description: impl Into<String>,
        reviewer: Option<&str>,
    ) -> &mut RiskFlag {
        let reviewer = match reviewer.filter(|r| !r.is_empty()) {
            Some(r) => r.to_string(),
            None => {
                let routed = self.routing.resolve(&dimension, level);
                if routed == UNASSIGNED_REVIEWER {
                    warn!(
                        use_case = %self.name,
                        dimension = %dimension.name(),
                        level = %level,
                        "No routing entry; flag is unassigned"
                    );
                }
                routed
            }
        };

        let flag = RiskFlag::new(dimension, level, description).with_reviewer(reviewer);
        info!(
            use_case = %self.name,
            dimension = %flag.dimension.name(),
            level = %flag.level,
            reviewer = %flag.reviewer,
            "Risk flagged"
        );
        self.push_flag(flag)
    }

    /// Append an already-built flag, bypassing routing.
    pub fn push_flag(&mut self, flag: RiskFlag) -> &mut RiskFlag {
        let index = self.flags.len();
        self.flags.push(flag);
        &mut self.flags[index]
    }

    /// All flags in insertion order.
    pub fn flags(&self) -> &[RiskFlag] {
        &self.flags
    }

    pub fn flag(&self, index: usize) -> Option<&RiskFlag> {
        self.flags.get(index)
    }

    pub fn flag_mut(&mut self, index: usize) -> Option<&mut RiskFlag> {
        self.flags.get_mut(index)
    }

    pub fn flags_mut(&mut self) -> impl Iterator<Item = &mut RiskFlag> {
        self.flags.iter_mut()
    }

    // -- Routing -----------------------------------------------------------

    pub fn get_pending_reviews(&self) -> Vec<&RiskFlag> {
        self.flags.iter().filter(|f| f.needs_review()).collect()
    }

    /// Reviewers with something to act on, deduplicated in first-seen order.
    pub fn get_reviewers_needed(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.flags
            .iter()
            .filter(|f| f.needs_review() || f.is_blocking())
            .filter(|f| seen.insert(f.reviewer.as_str()))
            .map(|f| f.reviewer.clone())
            .collect()
    }

    // -- Blocking ----------------------------------------------------------

    pub fn is_blocked(&self) -> bool {
        self.flags.iter().any(RiskFlag::is_blocking)
    }

    pub fn get_blockers(&self) -> Vec<&RiskFlag> {
        self.flags.iter().filter(|f| f.is_blocking()).collect()
    }

    // -- Scoring -----------------------------------------------------------

    /// Flagged dimensions in first-seen order, then any missing built-ins.
    pub fn dimensions(&self) -> Vec<Dimension> {
        let mut seen = HashSet::new();
        let mut dims = Vec::new();
        let flagged = self.flags.iter().map(|f| f.dimension.clone());
        for dim in flagged.chain(Dimension::builtins()) {
            if seen.insert(dim.name().to_string()) {
                dims.push(dim);
            }
        }
        dims
    }

    /// Max unresolved level ordinal per dimension, keyed by dimension label.
    ///
    /// Resolving or accepting the only flag in a dimension drops its score
    /// back to zero.
    pub fn risk_score(&self) -> BTreeMap<String, u8> {
        self.dimensions()
            .into_iter()
            .map(|dim| {
                let score = self
                    .flags
                    .iter()
                    .filter(|f| f.dimension == dim && !f.is_settled())
                    .map(|f| f.level.ordinal())
                    .max()
                    .unwrap_or(0);
                (dim.label().to_string(), score)
            })
            .collect()
    }

    pub fn max_risk_level(&self) -> RiskLevel {
        self.flags
            .iter()
            .filter(|f| !f.is_settled())
            .map(|f| f.level)
            .max()
            .unwrap_or(RiskLevel::None)
    }

    // -- Querying ----------------------------------------------------------

    pub fn get_flags_by_dimension(&self, dimension: &Dimension) -> Vec<&RiskFlag> {
        self.flags
            .iter()
            .filter(|f| &f.dimension == dimension)
            .collect()
    }

    pub fn get_flags_by_status(&self, status: ReviewStatus) -> Vec<&RiskFlag> {
        self.flags.iter().filter(|f| f.status == status).collect()
    }

    pub fn get_flags_by_level(&self, level: RiskLevel) -> Vec<&RiskFlag> {
        self.flags.iter().filter(|f| f.level == level).collect()
    }

    // -- Summary -----------------------------------------------------------

    /// Human-readable governance status.
    pub fn summary(&self) -> String {
        let phase = if self.workflow_phase.is_empty() {
            "(not set)"
        } else {
            self.workflow_phase.as_str()
        };
        let status = if self.is_blocked() {
            "🚫 BLOCKED"
        } else {
            "✅ CLEAR"
        };

        let mut lines = vec![
            format!("Use Case: {}", self.name),
            format!("Phase:    {}", phase),
            format!("Status:   {}", status),
            format!(
                "Flags:    {} total, {} blocking, {} pending review",
                self.flags.len(),
                self.get_blockers().len(),
                self.get_pending_reviews().len()
            ),
            String::new(),
        ];

        if !self.flags.is_empty() {
            lines.push("Risk Flags:".to_string());
            for flag in &self.flags {
                lines.push(format!("  {}", flag));
                if !flag.reviewer.is_empty() {
                    lines.push(format!("    → Routed to: {}", flag.reviewer));
                }
            }
        }

        let reviewers = self.get_reviewers_needed();
        if !reviewers.is_empty() {
            lines.push(String::new());
            lines.push(format!("Action needed from: {}", reviewers.join(", ")));
        }

        lines.join("\n")
    }
}

impl fmt::Display for UseCaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

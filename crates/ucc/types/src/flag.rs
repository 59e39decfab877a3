use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::dimension::Dimension;
use crate::level::{ReviewStatus, RiskLevel};
use crate::time;

/// A single risk flag attached to a use case.
///
/// Flags are never deleted. `resolve` and `accept_risk` make a flag inert
/// for blocking and scoring while keeping every field readable.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskFlag {
    pub dimension: Dimension,
    pub level: RiskLevel,
    pub description: String,
    /// Empty until routed.
    pub reviewer: String,
    pub status: ReviewStatus,
    pub resolution_notes: String,
    pub created_at: DateTime<Utc>,
    /// Set only by `resolve` and `accept_risk`.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl RiskFlag {
    /// Create an open, unrouted flag stamped with the current time.
    pub fn new(dimension: Dimension, level: RiskLevel, description: impl Into<String>) -> Self {
        Self {
            dimension,
            level,
            description: description.into(),
            reviewer: String::new(),
            status: ReviewStatus::Open,
            resolution_notes: String::new(),
            created_at: time::now(),
            resolved_at: None,
        }
    }

    pub fn with_reviewer(mut self, reviewer: impl Into<String>) -> Self {
        self.reviewer = reviewer.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// HIGH or CRITICAL and not yet resolved or accepted.
    pub fn is_blocking(&self) -> bool {
        self.level >= RiskLevel::High && !self.status.is_terminal()
    }

    /// MEDIUM or above and still open.
    pub fn needs_review(&self) -> bool {
        self.level >= RiskLevel::Medium && self.status == ReviewStatus::Open
    }

    /// Resolved or accepted.
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn begin_review(&mut self) {
        debug!(dimension = %self.dimension.name(), "Flag entered review");
        self.status = ReviewStatus::InReview;
    }

    /// Hard-block this flag for a structural or process issue.
    pub fn mark_blocked(&mut self) {
        debug!(dimension = %self.dimension.name(), "Flag marked blocked");
        self.status = ReviewStatus::Blocked;
    }

    pub fn resolve(&mut self, notes: impl Into<String>) {
        self.status = ReviewStatus::Resolved;
        self.resolution_notes = notes.into();
        self.resolved_at = Some(time::now());
    }

    /// Acknowledge the risk and let the workflow proceed.
    pub fn accept_risk(&mut self, notes: impl Into<String>) {
        self.status = ReviewStatus::Accepted;
        self.resolution_notes = notes.into();
        self.resolved_at = Some(time::now());
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {} ({})",
            self.level.icon(),
            self.dimension.label(),
            self.level.name(),
            self.description,
            self.status.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::custom_dimension;
    use proptest::prelude::*;

    fn flag(level: RiskLevel) -> RiskFlag {
        RiskFlag::new(Dimension::LEGAL_IP, level, "test flag")
    }

    #[test]
    fn high_and_critical_open_block() {
        assert!(flag(RiskLevel::High).is_blocking());
        assert!(flag(RiskLevel::Critical).is_blocking());
        assert!(!flag(RiskLevel::Medium).is_blocking());
        assert!(!flag(RiskLevel::Low).is_blocking());
        assert!(!flag(RiskLevel::None).is_blocking());
    }

    #[test]
    fn resolve_unblocks_and_stamps() {
        let mut f = flag(RiskLevel::High);
        f.resolve("licensed");
        assert!(!f.is_blocking());
        assert_eq!(f.status, ReviewStatus::Resolved);
        assert_eq!(f.resolution_notes, "licensed");
        assert!(f.resolved_at.is_some());
    }

    #[test]
    fn accept_unblocks_and_stamps() {
        let mut f = flag(RiskLevel::Critical);
        f.accept_risk("ok");
        assert!(!f.is_blocking());
        assert_eq!(f.status, ReviewStatus::Accepted);
        assert!(f.resolved_at.is_some());
    }

    #[test]
    fn in_review_and_blocked_still_block() {
        let mut f = flag(RiskLevel::High);
        f.begin_review();
        assert_eq!(f.status, ReviewStatus::InReview);
        assert!(f.is_blocking());
        assert!(!f.needs_review());

        f.mark_blocked();
        assert_eq!(f.status, ReviewStatus::Blocked);
        assert!(f.is_blocking());
        assert!(f.resolved_at.is_none());
    }

    #[test]
    fn needs_review_medium_and_above_open() {
        assert!(flag(RiskLevel::Medium).needs_review());
        assert!(flag(RiskLevel::High).needs_review());
        assert!(!flag(RiskLevel::Low).needs_review());

        let mut f = flag(RiskLevel::Medium);
        f.resolve("");
        assert!(!f.needs_review());
    }

    #[test]
    fn display_shows_label_and_status() {
        let f = RiskFlag::new(
            custom_dimension("FINANCIAL", "Financial Risk"),
            RiskLevel::High,
            "Budget overrun",
        );
        let text = f.to_string();
        assert!(text.contains("[Financial Risk]"));
        assert!(text.contains("HIGH: Budget overrun"));
        assert!(text.contains("(Open)"));
    }

    #[test]
    fn created_at_is_set() {
        let before = time::now();
        let f = flag(RiskLevel::Low);
        assert!(f.created_at >= before);
        assert!(f.reviewer.is_empty());
    }

    fn any_level() -> impl Strategy<Value = RiskLevel> {
        prop::sample::select(RiskLevel::ALL.to_vec())
    }

    fn any_status() -> impl Strategy<Value = ReviewStatus> {
        prop::sample::select(ReviewStatus::ALL.to_vec())
    }

    proptest! {
        /// Blocking implies HIGH+ and a non-terminal status.
        #[test]
        fn blocking_implies_high_and_unsettled(level in any_level(), status in any_status()) {
            let mut f = flag(level);
            f.status = status;
            if f.is_blocking() {
                prop_assert!(f.level >= RiskLevel::High);
                prop_assert!(!f.status.is_terminal());
            }
        }

        /// Settling any flag clears blocking and review.
        #[test]
        fn settling_clears_blocking(level in any_level(), status in any_status(), accept in any::<bool>()) {
            let mut f = flag(level);
            f.status = status;
            if accept { f.accept_risk("accepted") } else { f.resolve("resolved") }
            prop_assert!(!f.is_blocking());
            prop_assert!(!f.needs_review());
        }
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// How severe a risk is. Ordering is by ordinal and drives blocking.
///
/// - `None`: no concerns identified
/// - `Low`: informational, no review needed
/// - `Medium`: requires review before proceeding
/// - `High`: blocks the workflow until resolved
/// - `Critical`: escalates to senior leadership; hard block
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::None,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Wire name, e.g. `"HIGH"`.
    pub fn name(&self) -> &'static str {
        match self {
            RiskLevel::None => "NONE",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RiskLevel::None => "✅",
            RiskLevel::Low => "🔵",
            RiskLevel::Medium => "🟡",
            RiskLevel::High => "🟠",
            RiskLevel::Critical => "🔴",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RiskLevel {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TypesError::UnknownLevel(s.to_string()))
    }
}

/// Where a flagged risk is in the review process.
///
/// Not a strict linear machine: `Open → {InReview, Blocked}`, and any
/// non-terminal state may move to `Resolved` or `Accepted`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    #[default]
    Open,
    InReview,
    Resolved,
    Accepted,
    Blocked,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 5] = [
        ReviewStatus::Open,
        ReviewStatus::InReview,
        ReviewStatus::Resolved,
        ReviewStatus::Accepted,
        ReviewStatus::Blocked,
    ];

    /// Wire name, e.g. `"IN_REVIEW"`.
    pub fn name(&self) -> &'static str {
        match self {
            ReviewStatus::Open => "OPEN",
            ReviewStatus::InReview => "IN_REVIEW",
            ReviewStatus::Resolved => "RESOLVED",
            ReviewStatus::Accepted => "ACCEPTED",
            ReviewStatus::Blocked => "BLOCKED",
        }
    }

    /// Display label, e.g. `"Accepted (Risk Acknowledged)"`.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewStatus::Open => "Open",
            ReviewStatus::InReview => "In Review",
            ReviewStatus::Resolved => "Resolved",
            ReviewStatus::Accepted => "Accepted (Risk Acknowledged)",
            ReviewStatus::Blocked => "Blocked",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Resolved and Accepted flags are inert for blocking and scoring.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReviewStatus::Resolved | ReviewStatus::Accepted)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReviewStatus {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TypesError::UnknownStatus(s.to_string()))
    }
}

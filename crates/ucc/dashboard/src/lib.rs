//! # ucc-dashboard
//!
//! Portfolio-level governance across many [`UseCaseContext`]s.
//!
//! The dashboard keeps no copy of flag data. Every view (blockers, per
//! dimension summaries, reviewer workload, phase grouping) is computed on
//! demand from the registered contexts.
//!
//! Note that [`DimensionSummary::max_level`] is the highest level ever
//! flagged in a dimension and never drops when flags are settled, while
//! [`UseCaseContext::risk_score`] only counts unsettled flags.

#![deny(unsafe_code)]

mod dashboard;

pub use dashboard::{DimensionSummary, GovernanceDashboard, UNASSIGNED_PHASE};

pub use ucc_context::UseCaseContext;

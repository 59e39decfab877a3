//! # ucc-escalation
//!
//! Time-based escalation of stale risk flags.
//!
//! An [`EscalationPolicy`] holds one [`EscalationRule`] per source level.
//! Evaluation is a pure function of a flag and an explicit `now`, so
//! policies can be tested without waiting on the clock.
//!
//! Default rules:
//!
//! | from | open longer than | to | reviewer |
//! |---|---|---|---|
//! | LOW | 7 days | MEDIUM | routed |
//! | MEDIUM | 3 days | HIGH | routed |
//! | HIGH | 1 day | CRITICAL | routed |
//! | CRITICAL | 4 hours | CRITICAL | C-Suite Escalation |
//!
//! The CRITICAL rule keeps the level and re-notifies a different reviewer.

#![deny(unsafe_code)]

mod policy;

pub use policy::{EscalationPolicy, EscalationResult, EscalationRule, CSUITE_REVIEWER};

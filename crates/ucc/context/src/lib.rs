//! # ucc-context
//!
//! A [`UseCaseContext`] is one production AI use case under governance. It
//! owns an ordered list of [`RiskFlag`](ucc_types::RiskFlag)s and shares a
//! [`RoutingTable`](ucc_types::RoutingTable) that assigns reviewers when a
//! risk is flagged without one.
//!
//! ## Core Components
//!
//! - [`UseCaseContext`]: flagging, blocking and scoring views
//! - [`codec`]: record and JSON round-trip for persistence boundaries
//!
//! All queries are total. An empty context is clear, scores zero in every
//! dimension and reports `NONE` as its maximum level.

#![deny(unsafe_code)]

pub mod codec;
pub mod context;
pub mod error;

pub use codec::{FlagRecord, UseCaseRecord};
pub use context::UseCaseContext;
pub use error::{CodecError, Result};

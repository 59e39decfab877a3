//! # ucc-types
//!
//! Domain types for Use Case Context governance.
//!
//! ## Core Types
//!
//! - [`Dimension`]: a named risk axis, either one of the six
//!   [`BuiltinDimension`]s or a user-defined custom dimension. Identity is
//!   the dimension *name*: a custom dimension named `"SECURITY"` is the same
//!   map key as the built-in `SECURITY`.
//! - [`RiskLevel`]: ordered severity, `NONE < LOW < MEDIUM < HIGH < CRITICAL`.
//! - [`ReviewStatus`]: where a flag sits in the review process.
//! - [`RiskFlag`]: one recorded risk with its own review state machine.
//! - [`RoutingTable`]: `(dimension, level) → reviewer role` lookup.
//!
//! ## Blocking and Review
//!
//! Both predicates are derived on every call, never cached:
//!
//! - a flag **blocks** when `level >= HIGH` and it is neither resolved nor accepted
//! - a flag **needs review** when `level >= MEDIUM` and it is still open

#![deny(unsafe_code)]

pub mod dimension;
pub mod error;
pub mod flag;
pub mod level;
pub mod routing;
pub mod time;

pub use dimension::{custom_dimension, BuiltinDimension, Dimension};
pub use error::{Result, TypesError};
pub use flag::RiskFlag;
pub use level::{ReviewStatus, RiskLevel};
pub use routing::{default_routing, RoutingTable, UNASSIGNED_REVIEWER};
pub use time::{format_timestamp, now, parse_timestamp, TIMESTAMP_FORMAT};

//! # ucc-security
//!
//! Security dimension packs and the profile composer.
//!
//! A preset is a named bundle of custom dimensions plus a routing table for
//! them. Three presets ship with the crate:
//!
//! - `tpn`: Trusted Partner Network content security (6 dimensions)
//! - `vfx`: VFX pipeline and facility security (6 dimensions)
//! - `enterprise`: enterprise InfoSec controls (5 dimensions)
//!
//! [`PresetRegistry::security_profile`] folds any number of presets into a
//! [`SecurityProfile`], and [`apply_security_profile`] overlays a profile's
//! routing onto a use case. Applying a profile does not add dimensions to
//! the use case; they appear once a flag is raised against them.
//!
//! ```
//! use ucc_context::UseCaseContext;
//! use ucc_security::{apply_security_profile, PresetRegistry};
//! use ucc_types::{custom_dimension, RiskLevel};
//!
//! let presets = PresetRegistry::with_builtins();
//! let profile = presets.security_profile(&["tpn"]).unwrap();
//!
//! let mut ctx = UseCaseContext::new("AI Dailies Review");
//! apply_security_profile(&mut ctx, &profile);
//!
//! let content = custom_dimension("TPN_CONTENT_SECURITY", "Content Security (TPN)");
//! let flag = ctx.flag_risk(content, RiskLevel::High, "Unwatermarked dailies", None);
//! assert_eq!(flag.reviewer, "VP Security / CISO");
//! ```

#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod profile;
pub mod registry;

pub use catalog::SecurityPreset;
pub use error::{Result, SecurityError};
pub use profile::{apply_security_profile, SecurityProfile};
pub use registry::{global_presets, security_profile, PresetRegistry};

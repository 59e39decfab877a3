use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// The fixed catalog of built-in governance dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuiltinDimension {
    LegalIp,
    Bias,
    Safety,
    Security,
    Feasibility,
    Quality,
}

impl BuiltinDimension {
    /// All built-ins in catalog order.
    pub const ALL: [BuiltinDimension; 6] = [
        BuiltinDimension::LegalIp,
        BuiltinDimension::Bias,
        BuiltinDimension::Safety,
        BuiltinDimension::Security,
        BuiltinDimension::Feasibility,
        BuiltinDimension::Quality,
    ];

    /// Short identifier, e.g. `"LEGAL_IP"`.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinDimension::LegalIp => "LEGAL_IP",
            BuiltinDimension::Bias => "BIAS",
            BuiltinDimension::Safety => "SAFETY",
            BuiltinDimension::Security => "SECURITY",
            BuiltinDimension::Feasibility => "FEASIBILITY",
            BuiltinDimension::Quality => "QUALITY",
        }
    }

    /// Human-readable label, e.g. `"Legal / IP Ownership"`.
    pub fn label(&self) -> &'static str {
        match self {
            BuiltinDimension::LegalIp => "Legal / IP Ownership",
            BuiltinDimension::Bias => "Bias / Fairness",
            BuiltinDimension::Safety => "Safety / Harmful Output",
            BuiltinDimension::Security => "Security / Model Integrity",
            BuiltinDimension::Feasibility => "Technical Feasibility",
            BuiltinDimension::Quality => "Output Quality",
        }
    }

    /// Look up a built-in by its short identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl FromStr for BuiltinDimension {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TypesError::UnknownDimension(s.to_string()))
    }
}

/// A risk dimension: built-in or user-defined.
///
/// Equality and hashing project onto [`Dimension::name`] only, so the two
/// variants interoperate as map keys. The label never takes part in identity.
#[derive(Clone, Debug)]
pub enum Dimension {
    Builtin(BuiltinDimension),
    Custom { name: String, label: String },
}

impl Dimension {
    pub const LEGAL_IP: Dimension = Dimension::Builtin(BuiltinDimension::LegalIp);
    pub const BIAS: Dimension = Dimension::Builtin(BuiltinDimension::Bias);
    pub const SAFETY: Dimension = Dimension::Builtin(BuiltinDimension::Safety);
    pub const SECURITY: Dimension = Dimension::Builtin(BuiltinDimension::Security);
    pub const FEASIBILITY: Dimension = Dimension::Builtin(BuiltinDimension::Feasibility);
    pub const QUALITY: Dimension = Dimension::Builtin(BuiltinDimension::Quality);

    /// Create a user-defined dimension.
    pub fn custom(name: impl Into<String>, label: impl Into<String>) -> Self {
        Dimension::Custom {
            name: name.into(),
            label: label.into(),
        }
    }

    /// The identity key.
    pub fn name(&self) -> &str {
        match self {
            Dimension::Builtin(b) => b.name(),
            Dimension::Custom { name, .. } => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Dimension::Builtin(b) => b.label(),
            Dimension::Custom { label, .. } => label,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Dimension::Custom { .. })
    }

    /// Resolve a built-in by name.
    pub fn builtin(name: &str) -> Option<Self> {
        BuiltinDimension::from_name(name).map(Dimension::Builtin)
    }

    /// All built-in dimensions in catalog order.
    pub fn builtins() -> impl Iterator<Item = Dimension> {
        BuiltinDimension::ALL.into_iter().map(Dimension::Builtin)
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl PartialEq<BuiltinDimension> for Dimension {
    fn eq(&self, other: &BuiltinDimension) -> bool {
        self.name() == other.name()
    }
}

impl From<BuiltinDimension> for Dimension {
    fn from(b: BuiltinDimension) -> Self {
        Dimension::Builtin(b)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Create a custom risk dimension.
///
/// ```
/// use ucc_types::{custom_dimension, Dimension};
///
/// let financial = custom_dimension("FINANCIAL", "Financial Risk");
/// assert_eq!(financial.name(), "FINANCIAL");
/// assert_eq!(financial.to_string(), "Financial Risk");
/// assert_ne!(financial, Dimension::LEGAL_IP);
/// ```
pub fn custom_dimension(name: impl Into<String>, label: impl Into<String>) -> Dimension {
    Dimension::custom(name, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashMap;

    fn hash_of(d: &Dimension) -> u64 {
        let mut h = DefaultHasher::new();
        d.hash(&mut h);
        h.finish()
    }

    #[test]
    fn custom_equal_by_name() {
        let a = custom_dimension("FINANCIAL", "Financial Risk");
        let b = custom_dimension("FINANCIAL", "Money");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn custom_differs_by_name() {
        let a = custom_dimension("FINANCIAL", "Financial Risk");
        let b = custom_dimension("REGULATORY", "Financial Risk");
        assert_ne!(a, b);
    }

    #[test]
    fn custom_equals_builtin_with_same_name() {
        let shadow = custom_dimension("LEGAL_IP", "Shadow Legal");
        assert_eq!(shadow, Dimension::LEGAL_IP);
        assert_eq!(hash_of(&shadow), hash_of(&Dimension::LEGAL_IP));
        assert_ne!(shadow, Dimension::BIAS);
        assert!(shadow == BuiltinDimension::LegalIp);
    }

    #[test]
    fn usable_as_map_key_across_variants() {
        let mut map = HashMap::new();
        map.insert(Dimension::SECURITY, 1);
        let lookup = custom_dimension("SECURITY", "whatever");
        assert_eq!(map.get(&lookup), Some(&1));
    }

    #[test]
    fn display_is_label() {
        assert_eq!(Dimension::LEGAL_IP.to_string(), "Legal / IP Ownership");
        let c = custom_dimension("FINANCIAL", "Financial Risk");
        assert_eq!(c.to_string(), "Financial Risk");
        assert!(c.is_custom());
        assert!(!Dimension::QUALITY.is_custom());
    }

    #[test]
    fn builtin_catalog() {
        let names: Vec<String> = Dimension::builtins().map(|d| d.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["LEGAL_IP", "BIAS", "SAFETY", "SECURITY", "FEASIBILITY", "QUALITY"]
        );
        assert_eq!(Dimension::builtin("SAFETY"), Some(Dimension::SAFETY));
        assert!(Dimension::builtin("FINANCIAL").is_none());
        assert!("QUALITY".parse::<BuiltinDimension>().is_ok());
        assert!("NOPE".parse::<BuiltinDimension>().is_err());
    }
}

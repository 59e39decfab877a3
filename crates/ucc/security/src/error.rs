use thiserror::Error;

/// Security preset errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// A requested preset is not registered
    #[error("unknown security preset {name:?}; available: {}", .available.join(", "))]
    UnknownPreset { name: String, available: Vec<String> },
}

/// Result type for preset composition
pub type Result<T> = std::result::Result<T, SecurityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_alternatives() {
        let err = SecurityError::UnknownPreset {
            name: "nope".into(),
            available: vec!["tpn".into(), "vfx".into()],
        };
        assert_eq!(
            err.to_string(),
            "unknown security preset \"nope\"; available: tpn, vfx"
        );
    }
}

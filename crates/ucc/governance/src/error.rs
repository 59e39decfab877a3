use thiserror::Error;
use ucc_context::CodecError;
use ucc_security::SecurityError;

/// Errors raised while loading or converting a [`GovernanceConfig`].
///
/// [`GovernanceConfig`]: crate::GovernanceConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the governance service
#[derive(Error, Debug)]
pub enum GovernanceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("failed to initialize tracing: {0}")]
    Tracing(String),
}

/// Result type for the governance service
pub type Result<T> = std::result::Result<T, GovernanceError>;

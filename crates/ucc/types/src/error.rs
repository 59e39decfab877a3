use thiserror::Error;

/// Errors from parsing domain identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("unknown risk level: {0}")]
    UnknownLevel(String),

    #[error("unknown review status: {0}")]
    UnknownStatus(String),

    #[error("unknown built-in dimension: {0}")]
    UnknownDimension(String),
}

/// Result type for domain identifier parsing
pub type Result<T> = std::result::Result<T, TypesError>;

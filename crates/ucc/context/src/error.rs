use thiserror::Error;
use ucc_types::TypesError;

/// Errors decoding a persisted use case.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Identifier(#[from] TypesError),
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_errors_pass_through() {
        let err: CodecError = TypesError::UnknownLevel("SEVERE".into()).into();
        assert_eq!(err.to_string(), "unknown risk level: SEVERE");
    }

    #[test]
    fn json_errors_wrap() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CodecError = bad.into();
        assert!(err.to_string().starts_with("malformed record"));
    }
}

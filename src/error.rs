//! Per-item collection errors
//!
//! Anything that goes wrong while normalizing a single listed function is a
//! [`CollectError`]. The collection loop turns these into error responses
//! instead of aborting the pass.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("malformed function name {name:?} for project {project_id:?}")]
    MalformedIdentifier { name: String, project_id: String },

    #[error("unrecognized environment {0:?}")]
    UnrecognizedEnvironment(String),

    #[error("malformed timestamp {0:?}: expected YYYY-MM-DDTHH:MM:SS.ffffff")]
    MalformedTimestamp(String),

    #[error("missing or non-string field {0:?}")]
    MissingField(&'static str),

    #[error("invalid function record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error(transparent)]
    UnexpectedItem(#[from] anyhow::Error),
}

impl CollectError {
    /// Stable code reported in error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            CollectError::MalformedIdentifier { .. } => "ERROR_MALFORMED_IDENTIFIER",
            CollectError::UnrecognizedEnvironment(_) => "ERROR_UNRECOGNIZED_ENVIRONMENT",
            CollectError::MalformedTimestamp(_) => "ERROR_MALFORMED_TIMESTAMP",
            CollectError::MissingField(_) => "ERROR_MISSING_FIELD",
            CollectError::InvalidRecord(_) => "ERROR_INVALID_RECORD",
            CollectError::UnexpectedItem(_) => "ERROR_COLLECTOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = CollectError::MalformedIdentifier {
            name: "functions/f1".to_string(),
            project_id: "p1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"malformed function name "functions/f1" for project "p1""#
        );
        assert_eq!(err.error_code(), "ERROR_MALFORMED_IDENTIFIER");
    }

    #[test]
    fn test_anyhow_errors_are_unexpected() {
        let err: CollectError = anyhow::anyhow!("boom").into();
        assert_eq!(err.error_code(), "ERROR_COLLECTOR");
        assert_eq!(err.to_string(), "boom");
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while composing filters or building rule bodies.
#[derive(Debug, Error)]
pub enum RuleBodyError {
    #[error("filter on {match_field:?} was finalized before an operation was selected")]
    IncompleteFilter { match_field: String },
    #[error("{operation} expects between 1 and 10 values, got {len}")]
    OperandCardinality { operation: &'static str, len: usize },
    #[error("rule body failed schema validation: {reason}")]
    SchemaValidation { reason: String },
    #[error("failed to read rule body description from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rule body description from {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize rule body")]
    Serialize(#[from] serde_json::Error),
}

impl RuleBodyError {
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RuleBodyError::Io {
            path: path.into().display().to_string(),
            source,
        }
    }

    pub fn from_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        RuleBodyError::Parse {
            path: path.into().display().to_string(),
            source,
        }
    }

    pub fn schema_validation(reason: impl Into<String>) -> Self {
        RuleBodyError::SchemaValidation {
            reason: reason.into(),
        }
    }
}

use crate::types::basin::UnknownCode;
use crate::types::storm::InvariantViolation;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to read or write JSON")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object at the top level")]
    NotAnObject,

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' should be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' has {found} values, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Extended field '{0}' is missing while other extended fields are present")]
    IncompleteFieldSet(&'static str),

    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    InvalidCode(#[from] UnknownCode),

    #[error("Frame has no rows to take the storm identity from")]
    EmptyFrame,

    #[error("Frame holds rows of more than one storm: '{expected}' and '{found}'")]
    MixedStormIds { expected: String, found: String },

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error("Decoded storm is inconsistent")]
    Invariant(#[from] InvariantViolation),

    #[error("Identity field '{0}' is required for a storm with observations")]
    MissingIdentity(&'static str),
}

use crate::types::basin::UnknownCode;
use chrono::NaiveDateTime;
use std::num::ParseFloatError;
use thiserror::Error;

/// Failure to turn one storm's raw archive lines into a record. Line numbers
/// are 1-based positions within the storm's block.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Storm block contains no lines")]
    EmptyBlock,

    #[error("Line {line}: missing field {index} ({field})")]
    MissingField {
        line: usize,
        index: usize,
        field: &'static str,
    },

    #[error("Line {line}: invalid {field} value '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp {
        line: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Line {line}: {source}")]
    InvalidCode {
        line: usize,
        #[source]
        source: UnknownCode,
    },

    #[error("Line {line}: storm ID '{found}' does not match block ID '{expected}'")]
    MixedStormIds {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("Storm '{id}' reports observation time {time} more than once")]
    DuplicateTimestamp { id: String, time: NaiveDateTime },
}

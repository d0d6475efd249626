use crate::codec::error::CodecError;
use crate::types::basin::Basin;
use crate::types::schema::FieldSet;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No storm named '{name}' in season {season} of basin {basin}")]
    NotFound {
        name: String,
        season: i32,
        basin: Basin,
    },

    #[error("No rows for storm ID '{0}'")]
    IdNotFound(String),

    #[error("Storm '{id}' has the {found:?} field set, table holds {expected:?}")]
    FieldSetMismatch {
        id: String,
        expected: FieldSet,
        found: FieldSet,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error writing parquet file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing parquet file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("I/O error reading parquet file '{0}'")]
    ParquetReadIo(PathBuf, #[source] std::io::Error),

    #[error("Decoding error reading parquet file '{0}'")]
    ParquetReadPolars(PathBuf, #[source] PolarsError),
}

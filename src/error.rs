use crate::codec::error::CodecError;
use crate::parsing::error::ParseError;
use crate::store::error::StoreError;
use crate::types::basin::Basin;
use crate::types::schema::FieldSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IbtracsError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unknown data source '{0}', expected one of csv, db, json, cache")]
    UnknownSource(String),

    #[error("No storm named '{name}' in season {season} of basin {basin}")]
    NotFound {
        name: String,
        season: i32,
        basin: Basin,
    },

    #[error("Failed to open archive '{0}'")]
    ArchiveOpen(PathBuf, #[source] std::io::Error),

    #[error("Failed to read archive '{0}'")]
    ArchiveRead(PathBuf, #[source] csv::Error),

    #[error("Failed to read archive stream")]
    ArchiveStream(#[source] csv::Error),

    #[error("Storm '{id}' has the {found:?} field set, collection holds {expected:?}")]
    MixedFieldSets {
        id: String,
        expected: FieldSet,
        found: FieldSet,
    },

    #[error("Failed to read JSON directory '{0}'")]
    JsonDirRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write JSON file '{0}'")]
    JsonWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    CacheDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),
}

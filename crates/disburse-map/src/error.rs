//! Error types for mapping storage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by saved-mapping stores.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("mapping store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored mapping could not be encoded or decoded.
    #[error("invalid mapping JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no saved mapping with id '{id}'")]
    NotFound { id: String },

    /// Ids name files, so only ASCII letters, digits, `-` and `_` are allowed.
    #[error("invalid mapping id '{id}'")]
    InvalidId { id: String },
}

pub type Result<T> = std::result::Result<T, MapError>;

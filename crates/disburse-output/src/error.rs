use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while naming or delivering output files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File names must be a single plain path component.
    #[error("invalid output file name '{name}'")]
    InvalidFileName { name: String },

    #[error("invalid upload target: {reason}")]
    InvalidTarget { reason: String },
}

pub type Result<T> = std::result::Result<T, OutputError>;

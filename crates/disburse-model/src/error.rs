use thiserror::Error;

/// Errors raised while parsing a field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("malformed path '{path}': {reason}")]
    Malformed { path: String, reason: &'static str },
}

impl PathError {
    pub(crate) fn malformed(path: &str, reason: &'static str) -> Self {
        Self::Malformed {
            path: path.to_string(),
            reason,
        }
    }
}

/// A write through a path hit a value of the wrong shape.
///
/// Writing a key into an array, descending through a string or number, or
/// indexing far past the end of an array is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot write '{path}': segment '{segment}' meets a {found} value")]
pub struct PathConflict {
    pub path: String,
    pub segment: String,
    pub found: &'static str,
}

pub type Result<T> = std::result::Result<T, PathError>;

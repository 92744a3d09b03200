//! Errors reported by stream sources

use thiserror::Error;

/// Result of a [`crate::api::StreamSource`] call
pub type Result<T> = std::result::Result<T, SourceError>;

/// Why a source call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The requested object does not exist (or is hidden from the user)
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of object ("user", "post", ...)
        kind: &'static str,
        /// Requested ID
        id: String,
    },

    /// The source could not answer
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Shorthand for [`SourceError::NotFound`]
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether the object is missing, as opposed to the source failing
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

use thiserror::Error;

/// Errors surfaced by a [`SolutionRepository`](crate::repository::SolutionRepository).
///
/// Each remote failure keeps its class so callers can tell an unreachable
/// location apart from a save the engine refused.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RepositoryError {
    /// The transport could not reach the location
    #[error("{location} is not reachable: {reason}")]
    Unreachable { location: String, reason: String },

    /// The engine answered but refused the operation
    #[error("{operation} failed with status {status}: {message}")]
    Rejected {
        operation: String,
        status: u16,
        message: String,
    },

    /// No process model exists with that identifier
    #[error("process model not found: {0}")]
    NotFound(String),

    /// The repository cannot perform this operation
    #[error("{operation} is not supported by this repository")]
    Unsupported { operation: &'static str },

    #[error("invalid process model id '{id}': {reason}")]
    InvalidIdentifier { id: String, reason: &'static str },

    #[error("no path has been opened yet")]
    NotOpened,

    #[error("invalid response from {location}: {message}")]
    InvalidResponse { location: String, message: String },
}

impl RepositoryError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, RepositoryError::Unreachable { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, RepositoryError::Unsupported { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, RepositoryError::Rejected { .. })
    }
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;

//! Error types for the forgetting control module.

use lethe_state::{ExecutionStatus, StorageError};

/// Errors produced by the forgetting control system.
#[derive(Debug, thiserror::Error)]
pub enum ForgettingError {
    #[error("audit entry not found: {0}")]
    NotFound(String),

    #[error("audit entry {audit_id} is already {status}")]
    AlreadyFinalized {
        audit_id: String,
        status: ExecutionStatus,
    },

    #[error("no consent request is open for audit entry {0}")]
    ConsentNotRequested(String),

    #[error("collaborator failure: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for forgetting control operations.
pub type ForgettingResult<T> = std::result::Result<T, ForgettingError>;

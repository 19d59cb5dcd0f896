//! Error types for lethe-state

use thiserror::Error;

/// Errors raised by audit, policy, and secure deletion collaborators
#[derive(Error, Debug)]
pub enum StorageError {
    /// Audit entry lookup failed
    #[error("audit entry not found: {audit_id}")]
    AuditEntryNotFound { audit_id: String },

    /// Attempted to move an audit entry out of a terminal status
    #[error("invalid status transition for {audit_id}: {from} -> {to}")]
    InvalidStatusTransition {
        audit_id: String,
        from: String,
        to: String,
    },

    /// Policy evaluation failed
    #[error("policy evaluation failed: {0}")]
    PolicyEvaluation(String),

    /// Secure deletion failed
    #[error("secure deletion failed: {0}")]
    SecureDeletion(String),

    /// Backend unavailable or misbehaving
    #[error("backend error: {0}")]
    Backend(String),

    /// Serialization error
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

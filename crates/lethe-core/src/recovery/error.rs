//! Error types for the recovery engine.

/// Errors produced by recovery operations.
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("recovery requires at least one cue")]
    EmptyCues,

    #[error("strategy {strategy} failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },
}

/// Result type for recovery operations.
pub type RecoveryResult<T> = std::result::Result<T, RecoveryError>;

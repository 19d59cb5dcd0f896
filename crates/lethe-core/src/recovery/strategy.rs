//! The contract every recovery strategy implements.

use async_trait::async_trait;

use super::error::RecoveryResult;
use super::types::{CueType, RecoveryAttempt, RecoveryCue, RecoveryMetadata};

/// A pluggable way of reconstructing a forgotten memory.
///
/// `estimate_probability` must be a pure read: the engine calls it for
/// every registered strategy concurrently before deciding the invocation
/// order. `recover` is only called for strategies the engine selects.
#[async_trait]
pub trait RecoveryStrategy: Send + Sync {
    /// Registry key; must be unique within an engine.
    fn name(&self) -> &str;

    /// Estimated chance of success in [0, 1].
    async fn estimate_probability(
        &self,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
    ) -> f64;

    /// Attempt a reconstruction. Errors are folded into a failed attempt by
    /// the engine.
    async fn recover(
        &self,
        memory_id: &str,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
    ) -> RecoveryResult<RecoveryAttempt>;
}

pub(crate) fn cues_of(cues: &[RecoveryCue], cue_type: CueType) -> Vec<&RecoveryCue> {
    cues.iter().filter(|c| c.cue_type == cue_type).collect()
}

pub(crate) fn summary_or(metadata: Option<&RecoveryMetadata>, fallback: String) -> String {
    match metadata {
        Some(meta) if !meta.content_summary.is_empty() => meta.content_summary.clone(),
        _ => fallback,
    }
}

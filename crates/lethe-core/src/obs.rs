//! Structured observability hooks for forgetting and recovery lifecycles.
//!
//! Emission functions for key lifecycle events: request, consent,
//! override, execution, recovery.
//!
//! Events are emitted at `info!` level (filter via `RUST_LOG`).
//! For JSON output, set `LETHE_LOG_JSON=true`.

use tracing::info;

/// Emit event: forgetting request evaluated by policy.
pub fn emit_forgetting_requested(audit_id: &str, memory_id: &str, verdict: &str) {
    info!(
        event = "forgetting.requested",
        audit_id = %audit_id,
        memory_id = %memory_id,
        verdict = %verdict,
    );
}

/// Emit event: forgetting executed, with secure deletion flag.
pub fn emit_forgetting_executed(audit_id: &str, memory_id: &str, secure_deletion: bool) {
    info!(
        event = "forgetting.executed",
        audit_id = %audit_id,
        memory_id = %memory_id,
        secure_deletion = secure_deletion,
    );
}

/// Emit event: forgetting execution failed (warning level).
pub fn emit_forgetting_failed(audit_id: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "forgetting.failed", audit_id = %audit_id, error = %error);
}

/// Emit event: user answered a consent request.
pub fn emit_consent_recorded(audit_id: &str, granted: bool) {
    info!(event = "consent.recorded", audit_id = %audit_id, granted = granted);
}

/// Emit event: user override recorded.
pub fn emit_override_recorded(audit_id: &str, override_type: &str) {
    info!(
        event = "override.recorded",
        audit_id = %audit_id,
        override_type = %override_type,
    );
}

/// Emit event: recovery request finished.
pub fn emit_recovery_completed(
    memory_id: &str,
    success: bool,
    combined_confidence: f64,
    attempts: usize,
    duration_ms: u64,
) {
    info!(
        event = "recovery.completed",
        memory_id = %memory_id,
        success = success,
        combined_confidence = combined_confidence,
        attempts = attempts,
        duration_ms = duration_ms,
    );
}

/// Emit event: a strategy errored and was folded into a failed attempt.
pub fn emit_strategy_failed(memory_id: &str, strategy: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "recovery.strategy_failed",
        memory_id = %memory_id,
        strategy = %strategy,
        error = %error,
    );
}

/// Emit event: recovery budget exhausted before all strategies ran.
pub fn emit_recovery_timeout(memory_id: &str, budget_ms: u64, attempts: usize) {
    tracing::warn!(
        event = "recovery.timeout",
        memory_id = %memory_id,
        budget_ms = budget_ms,
        attempts = attempts,
    );
}

//! Observability tests for forgetting and recovery lifecycle events.
//!
//! `#[traced_test]` captures every event so the emitted fields can be
//! asserted with `logs_contain`.

use std::sync::Arc;

use lethe_core::obs::{
    emit_consent_recorded, emit_forgetting_executed, emit_forgetting_failed,
    emit_override_recorded, emit_recovery_completed, emit_strategy_failed,
};
use lethe_core::{
    CueType, ExecutionMethod, FixedImpactEstimator, ForgettingAction, ForgettingControlConfig,
    ForgettingControlSystem, ForgettingDecision, ForgettingEvaluation, MemoryType,
    RecoveryConfig, RecoveryCue, RecoveryEngine, METRICS,
};
use lethe_state::fakes::{MemoryAuditLedger, MemorySecureDeleter, RulePolicyEngine};
use lethe_state::ActualImpact;
use serde_json::json;
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_emit_forgetting_executed_logs_audit_id() {
    emit_forgetting_executed("audit-123", "mem-9", true);
    assert!(logs_contain("forgetting.executed"));
    assert!(logs_contain("audit-123"));
}

#[traced_test]
#[test]
fn test_emit_forgetting_failed_logs_warning() {
    let error_msg = "executor unavailable";
    emit_forgetting_failed("audit-err", &error_msg);
    assert!(logs_contain("forgetting.failed"));
    assert!(logs_contain("executor unavailable"));
}

#[traced_test]
#[test]
fn test_consent_and_override_events() {
    emit_consent_recorded("audit-c", false);
    emit_override_recorded("audit-o", "prevent_forgetting");
    assert!(logs_contain("consent.recorded"));
    assert!(logs_contain("prevent_forgetting"));
}

#[traced_test]
#[test]
fn test_recovery_events() {
    emit_recovery_completed("mem-r", true, 0.72, 2, 15);
    emit_strategy_failed("mem-r", "associative", &"index offline");
    assert!(logs_contain("recovery.completed"));
    assert!(logs_contain("recovery.strategy_failed"));
}

#[traced_test]
#[tokio::test]
async fn test_forgetting_request_is_traced_end_to_end() {
    let system = ForgettingControlSystem::new(
        Arc::new(MemoryAuditLedger::new()),
        Arc::new(RulePolicyEngine::standard()),
        Arc::new(MemorySecureDeleter::new()),
        ForgettingControlConfig {
            auto_execute: true,
            ..ForgettingControlConfig::default()
        },
    )
    .with_impact_estimator(Arc::new(FixedImpactEstimator(ActualImpact::default())));

    let before = METRICS.forgetting_executions();
    let result = system
        .process_forgetting_request(
            "mem-trace",
            MemoryType::Working,
            &json!("scratch notes"),
            &ForgettingDecision::new("mem-trace", ForgettingAction::Delete, "stale", 0.9),
            &ForgettingEvaluation::default(),
            ExecutionMethod::Immediate,
        )
        .await
        .unwrap();

    assert!(logs_contain("forgetting.requested"));
    assert!(logs_contain("forgetting.executed"));
    assert!(logs_contain(result.audit_id.as_str()));
    assert!(METRICS.forgetting_executions() > before);
}

#[traced_test]
#[tokio::test]
async fn test_recovery_request_is_traced() {
    let engine = RecoveryEngine::new(RecoveryConfig::default());
    let cues = [RecoveryCue::new(CueType::Associative, "river", 0.8)];
    engine.attempt_recovery("mem-rec", &cues, None).await.unwrap();
    assert!(logs_contain("recovery.completed"));
    assert!(logs_contain("mem-rec"));
}

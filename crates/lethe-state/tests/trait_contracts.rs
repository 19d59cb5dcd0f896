//! Trait contract tests for AuditLedger, PolicyEngine, and SecureDeletionExecutor.
//!
//! These tests verify the behavioral contracts of the collaborator traits
//! using the in-memory implementations. Any conforming implementation must
//! pass these.

use chrono::{Duration, Utc};
use lethe_state::fakes::{MemoryAuditLedger, MemorySecureDeleter, RulePolicyEngine};
use lethe_state::storage_traits::*;
use lethe_state::{
    ForgettingAction, ForgettingDecision, ForgettingEvaluation, MemoryMetadata, MemoryType,
    PrivacyLevel, StorageError,
};

fn sample_entry(memory_id: &str) -> NewAuditEntry {
    NewAuditEntry {
        memory_id: memory_id.to_string(),
        memory_type: MemoryType::Episodic,
        content_summary: "met Alice at the conference".to_string(),
        decision: ForgettingDecision::new(memory_id, ForgettingAction::Delete, "stale", 0.8),
        evaluation: ForgettingEvaluation::default(),
        execution_method: ExecutionMethod::Immediate,
        privacy_level: PrivacyLevel::Internal,
    }
}

fn metadata(privacy_level: PrivacyLevel) -> MemoryMetadata {
    MemoryMetadata {
        content_type: "text".to_string(),
        size_bytes: 42,
        category: "episodic".to_string(),
        privacy_level,
        access_frequency: 0.0,
    }
}

fn impact() -> ActualImpact {
    ActualImpact {
        space_freed_bytes: 1024,
        latency_improvement_ms: 1.5,
        interference_reduction: 0.1,
        focus_improvement: 0.05,
        user_satisfaction: 0.8,
    }
}

// ===========================================================================
// AuditLedger contract tests
// ===========================================================================

#[tokio::test]
async fn ledger_log_returns_unique_ids() {
    let ledger = MemoryAuditLedger::new();
    let a = ledger.log_forgetting_decision(sample_entry("m1")).await.unwrap();
    let b = ledger.log_forgetting_decision(sample_entry("m1")).await.unwrap();

    assert_ne!(a, b);
}

#[tokio::test]
async fn ledger_new_entry_is_pending() {
    let ledger = MemoryAuditLedger::new();
    let id = ledger.log_forgetting_decision(sample_entry("m1")).await.unwrap();

    let entry = ledger.get_audit_entry(&id).await.unwrap().unwrap();
    assert_eq!(entry.execution_status, ExecutionStatus::Pending);
    assert_eq!(entry.memory_id, "m1");
    assert!(!entry.consent.requested);
    assert!(entry.actual_impact.is_none());
}

#[tokio::test]
async fn ledger_get_missing_entry_is_none() {
    let ledger = MemoryAuditLedger::new();
    let entry = ledger
        .get_audit_entry(&AuditId::from("nonexistent"))
        .await
        .unwrap();

    assert!(entry.is_none());
}

#[tokio::test]
async fn ledger_consent_on_missing_entry_fails() {
    let ledger = MemoryAuditLedger::new();
    let err = ledger
        .record_user_consent(&AuditId::from("nonexistent"), true, None)
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::AuditEntryNotFound { .. }));
}

#[tokio::test]
async fn ledger_execute_attaches_impact() {
    let ledger = MemoryAuditLedger::new();
    let id = ledger.log_forgetting_decision(sample_entry("m1")).await.unwrap();

    ledger
        .update_execution_status(&id, ExecutionStatus::Executed, Some(impact()))
        .await
        .unwrap();

    let entry = ledger.get_audit_entry(&id).await.unwrap().unwrap();
    assert_eq!(entry.execution_status, ExecutionStatus::Executed);
    assert_eq!(entry.actual_impact, Some(impact()));
    assert!(entry.executed_at.is_some());
}

#[tokio::test]
async fn ledger_terminal_status_is_final() {
    let ledger = MemoryAuditLedger::new();
    let id = ledger.log_forgetting_decision(sample_entry("m1")).await.unwrap();
    ledger
        .update_execution_status(&id, ExecutionStatus::Cancelled, None)
        .await
        .unwrap();

    let err = ledger
        .update_execution_status(&id, ExecutionStatus::Executed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidStatusTransition { .. }));

    let entry = ledger.get_audit_entry(&id).await.unwrap().unwrap();
    assert_eq!(entry.execution_status, ExecutionStatus::Cancelled);
}

#[tokio::test]
async fn ledger_consent_pending_filter() {
    let ledger = MemoryAuditLedger::new();
    let asked = ledger.log_forgetting_decision(sample_entry("m1")).await.unwrap();
    let answered = ledger.log_forgetting_decision(sample_entry("m2")).await.unwrap();
    ledger.log_forgetting_decision(sample_entry("m3")).await.unwrap();

    ledger.mark_consent_requested(&asked).await.unwrap();
    ledger.mark_consent_requested(&answered).await.unwrap();
    ledger
        .record_user_consent(&answered, false, Some("keep it".into()))
        .await
        .unwrap();

    let pending = ledger
        .query_audit_entries(&AuditFilter::all().consent_pending())
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].audit_id, asked);

    let summary = ledger.get_audit_summary().await.unwrap();
    assert_eq!(summary.total_entries, 3);
    assert_eq!(summary.consent_pending, 1);
}

#[tokio::test]
async fn ledger_keeps_secure_deletion_flag() {
    let ledger = MemoryAuditLedger::new();
    let id = ledger.log_forgetting_decision(sample_entry("m1")).await.unwrap();
    let entry = ledger.get_audit_entry(&id).await.unwrap().unwrap();
    assert!(!entry.secure_deletion_required);

    ledger.mark_secure_deletion_required(&id).await.unwrap();
    let entry = ledger.get_audit_entry(&id).await.unwrap().unwrap();
    assert!(entry.secure_deletion_required);

    let err = ledger
        .mark_secure_deletion_required(&AuditId::from("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::AuditEntryNotFound { .. }));
}

#[tokio::test]
async fn ledger_query_since_excludes_old_entries() {
    let ledger = MemoryAuditLedger::new();
    let mut old = AuditEntry::open(
        AuditId::new(),
        sample_entry("old"),
        Utc::now() - Duration::days(3),
    );
    old.updated_at = old.created_at;
    ledger.import_entry(old);
    ledger.log_forgetting_decision(sample_entry("new")).await.unwrap();

    let recent = ledger
        .query_audit_entries(&AuditFilter::all().since(Utc::now() - Duration::hours(24)))
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].memory_id, "new");

    let health = ledger.get_system_health().await.unwrap();
    assert_eq!(health.total_entries, 2);
    assert_eq!(health.entries_24h, 1);
}

#[tokio::test]
async fn ledger_health_counts_recent_failures() {
    let ledger = MemoryAuditLedger::new();
    for i in 0..3 {
        let id = ledger
            .log_forgetting_decision(sample_entry(&format!("m{i}")))
            .await
            .unwrap();
        ledger
            .update_execution_status(&id, ExecutionStatus::Failed, None)
            .await
            .unwrap();
    }

    let health = ledger.get_system_health().await.unwrap();
    assert_eq!(health.failed_executions_24h, 3);
}

#[tokio::test]
async fn ledger_unavailable_fails_every_call() {
    let ledger = MemoryAuditLedger::new();
    ledger.set_unavailable(true);

    let err = ledger
        .log_forgetting_decision(sample_entry("m1"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Backend(_)));
    assert!(ledger.get_system_health().await.is_err());
}

// ===========================================================================
// PolicyEngine contract tests
// ===========================================================================

#[tokio::test]
async fn policy_no_rules_allows() {
    let engine = RulePolicyEngine::new(Vec::new());
    let decision = ForgettingDecision::new("m1", ForgettingAction::Delete, "stale", 0.9);
    let results = engine
        .evaluate_policies(
            &decision,
            &ForgettingEvaluation::default(),
            &metadata(PrivacyLevel::Public),
        )
        .await
        .unwrap();
    let ruling = engine.get_effective_policy_decision(&results).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(ruling.final_decision, PolicyVerdict::Allow);
}

#[tokio::test]
async fn policy_standard_erases_sensitive() {
    let engine = RulePolicyEngine::standard();
    let decision = ForgettingDecision::new("m1", ForgettingAction::Delete, "stale", 0.9);
    let results = engine
        .evaluate_policies(
            &decision,
            &ForgettingEvaluation::default(),
            &metadata(PrivacyLevel::Restricted),
        )
        .await
        .unwrap();
    let ruling = engine.get_effective_policy_decision(&results).await.unwrap();

    assert_eq!(ruling.final_decision, PolicyVerdict::Allow);
    assert!(ruling.secure_deletion_required);
    assert!(!ruling.consent_required);
}

#[tokio::test]
async fn policy_standard_protects_important() {
    let engine = RulePolicyEngine::standard();
    let decision = ForgettingDecision::new("m1", ForgettingAction::Delete, "stale", 0.9);
    let evaluation = ForgettingEvaluation {
        importance_score: 0.95,
        ..ForgettingEvaluation::default()
    };
    let results = engine
        .evaluate_policies(&decision, &evaluation, &metadata(PrivacyLevel::Internal))
        .await
        .unwrap();
    let ruling = engine.get_effective_policy_decision(&results).await.unwrap();

    assert_eq!(ruling.final_decision, PolicyVerdict::RequireConsent);
    assert!(ruling.consent_required);
}

#[tokio::test]
async fn policy_inactive_rules_are_skipped() {
    let engine = RulePolicyEngine::new(vec![ForgettingPolicy::new(
        "freeze",
        "Freeze all forgetting",
        PolicyCondition::Always,
        PolicyVerdict::Deny,
    )
    .inactive()]);
    let decision = ForgettingDecision::new("m1", ForgettingAction::Degrade, "noise", 0.6);
    let results = engine
        .evaluate_policies(
            &decision,
            &ForgettingEvaluation::default(),
            &metadata(PrivacyLevel::Public),
        )
        .await
        .unwrap();

    assert!(results.is_empty());
    assert!(engine.list_policies(true).await.unwrap().is_empty());
    assert_eq!(engine.list_policies(false).await.unwrap().len(), 1);
}

// ===========================================================================
// SecureDeletionExecutor contract tests
// ===========================================================================

fn crypto_erase() -> SecureDeletionOptions {
    SecureDeletionOptions {
        method: DeletionMethod::CryptoErase,
        verification_required: true,
        certificate_generation: true,
        compliance_standards: vec![ComplianceStandard::Gdpr, ComplianceStandard::Ccpa],
    }
}

#[tokio::test]
async fn deleter_statistics_start_empty() {
    let deleter = MemorySecureDeleter::new();
    let stats = deleter.get_deletion_statistics().await.unwrap();

    assert_eq!(stats.total_deletions, 0);
    assert!((stats.verification_success_rate - 0.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn deleter_issues_certificate() {
    let deleter = MemorySecureDeleter::new();
    let outcome = deleter
        .secure_delete("m1", "summary", &crypto_erase())
        .await
        .unwrap();

    assert!(outcome.verification_passed);
    let cert = outcome.certificate.unwrap();
    assert_eq!(cert.deletion_id, outcome.deletion_id);
    assert_eq!(cert.memory_id, "m1");
    assert_eq!(cert.digest.len(), 64);
}

#[tokio::test]
async fn deleter_tracks_verification_rate() {
    let deleter = MemorySecureDeleter::new();
    deleter.secure_delete("m1", "", &crypto_erase()).await.unwrap();
    deleter.set_verification_passes(false);
    deleter.secure_delete("m2", "", &crypto_erase()).await.unwrap();

    let stats = deleter.get_deletion_statistics().await.unwrap();
    assert_eq!(stats.total_deletions, 2);
    assert_eq!(stats.verified_deletions, 1);
    assert!((stats.verification_success_rate - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn deleter_unavailable_fails() {
    let deleter = MemorySecureDeleter::new();
    deleter.set_unavailable(true);
    let err = deleter
        .secure_delete("m1", "", &crypto_erase())
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::SecureDeletion(_)));
    assert!(deleter.requests().is_empty());
}

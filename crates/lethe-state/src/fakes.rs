//! In-memory implementations of the collaborator traits
//!
//! Provides `MemoryAuditLedger`, `RulePolicyEngine`, and
//! `MemorySecureDeleter` that satisfy the trait contracts without any
//! external dependencies. Each can be switched to an unavailable mode to
//! exercise failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::StorageError;
use crate::schema::{ForgettingDecision, ForgettingEvaluation, MemoryMetadata};
use crate::storage_traits::*;

fn unavailable(what: &str) -> StorageError {
    StorageError::Backend(format!("{what} unavailable"))
}

// ---------------------------------------------------------------------------
// MemoryAuditLedger
// ---------------------------------------------------------------------------

/// In-memory audit ledger backed by an append-only `Vec<AuditEntry>`.
#[derive(Debug, Default)]
pub struct MemoryAuditLedger {
    entries: Mutex<Vec<AuditEntry>>,
    unavailable: AtomicBool,
}

impl MemoryAuditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StorageError::Backend`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a fully-formed entry, e.g. when restoring from an export.
    pub fn import_entry(&self, entry: AuditEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    fn check(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable("audit ledger"));
        }
        Ok(())
    }

    fn with_entry<T>(
        &self,
        audit_id: &AuditId,
        f: impl FnOnce(&mut AuditEntry) -> StorageResult<T>,
    ) -> StorageResult<T> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.audit_id == *audit_id)
            .ok_or_else(|| StorageError::AuditEntryNotFound {
                audit_id: audit_id.0.clone(),
            })?;
        let out = f(entry)?;
        entry.updated_at = Utc::now();
        Ok(out)
    }
}

#[async_trait]
impl AuditLedger for MemoryAuditLedger {
    async fn log_forgetting_decision(&self, entry: NewAuditEntry) -> StorageResult<AuditId> {
        self.check()?;
        let audit_id = AuditId::new();
        let record = AuditEntry::open(audit_id.clone(), entry, Utc::now());
        debug!(audit_id = %audit_id, memory_id = %record.memory_id, "audit entry opened");
        self.entries.lock().unwrap().push(record);
        Ok(audit_id)
    }

    async fn mark_consent_requested(&self, audit_id: &AuditId) -> StorageResult<()> {
        self.with_entry(audit_id, |entry| {
            if !entry.consent.requested {
                entry.consent.requested = true;
                entry.consent.requested_at = Some(Utc::now());
            }
            Ok(())
        })
    }

    async fn mark_secure_deletion_required(&self, audit_id: &AuditId) -> StorageResult<()> {
        self.with_entry(audit_id, |entry| {
            entry.secure_deletion_required = true;
            Ok(())
        })
    }

    async fn record_user_consent(
        &self,
        audit_id: &AuditId,
        granted: bool,
        feedback: Option<String>,
    ) -> StorageResult<()> {
        self.with_entry(audit_id, |entry| {
            entry.consent.granted = Some(granted);
            entry.consent.feedback = feedback;
            entry.consent.responded_at = Some(Utc::now());
            Ok(())
        })
    }

    async fn record_user_override(
        &self,
        audit_id: &AuditId,
        user_override: ForgettingUserOverride,
    ) -> StorageResult<()> {
        self.with_entry(audit_id, |entry| {
            entry.overrides.push(user_override);
            Ok(())
        })
    }

    async fn record_secure_deletion(
        &self,
        audit_id: &AuditId,
        record: SecureDeletionRecord,
    ) -> StorageResult<()> {
        self.with_entry(audit_id, |entry| {
            entry.secure_deletion = Some(record);
            Ok(())
        })
    }

    async fn update_execution_status(
        &self,
        audit_id: &AuditId,
        status: ExecutionStatus,
        impact: Option<ActualImpact>,
    ) -> StorageResult<()> {
        self.with_entry(audit_id, |entry| {
            if !entry.execution_status.can_transition_to(status) {
                debug!(
                    audit_id = %audit_id,
                    from = %entry.execution_status,
                    to = %status,
                    "rejected status transition"
                );
                return Err(StorageError::InvalidStatusTransition {
                    audit_id: audit_id.0.clone(),
                    from: entry.execution_status.to_string(),
                    to: status.to_string(),
                });
            }
            entry.execution_status = status;
            if impact.is_some() {
                entry.actual_impact = impact;
            }
            if status == ExecutionStatus::Executed {
                entry.executed_at = Some(Utc::now());
            }
            Ok(())
        })
    }

    async fn get_audit_entry(&self, audit_id: &AuditId) -> StorageResult<Option<AuditEntry>> {
        self.check()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().find(|e| e.audit_id == *audit_id).cloned())
    }

    async fn query_audit_entries(&self, filter: &AuditFilter) -> StorageResult<Vec<AuditEntry>> {
        self.check()?;
        let entries = self.entries.lock().unwrap();
        let mut matched: Vec<AuditEntry> =
            entries.iter().filter(|e| filter.matches(e)).cloned().collect();
        matched.sort_by_key(|e| e.created_at);
        Ok(matched)
    }

    async fn get_audit_summary(&self) -> StorageResult<AuditSummary> {
        self.check()?;
        let entries = self.entries.lock().unwrap();
        let mut summary = AuditSummary {
            total_entries: entries.len(),
            ..AuditSummary::default()
        };
        for entry in entries.iter() {
            match entry.execution_status {
                ExecutionStatus::Pending => summary.pending += 1,
                ExecutionStatus::Executed => summary.executed += 1,
                ExecutionStatus::Cancelled => summary.cancelled += 1,
                ExecutionStatus::Failed => summary.failed += 1,
            }
            if entry.consent.is_pending() && !entry.execution_status.is_terminal() {
                summary.consent_pending += 1;
            }
        }
        Ok(summary)
    }

    async fn get_system_health(&self) -> StorageResult<AuditHealth> {
        self.check()?;
        let cutoff = Utc::now() - Duration::hours(24);
        let entries = self.entries.lock().unwrap();
        let recent = entries.iter().filter(|e| e.updated_at >= cutoff);
        let mut health = AuditHealth {
            total_entries: entries.len(),
            ..AuditHealth::default()
        };
        for entry in recent {
            if entry.created_at >= cutoff {
                health.entries_24h += 1;
            }
            if entry.execution_status == ExecutionStatus::Failed {
                health.failed_executions_24h += 1;
            }
        }
        Ok(health)
    }
}

// ---------------------------------------------------------------------------
// RulePolicyEngine
// ---------------------------------------------------------------------------

/// In-memory policy engine evaluating an ordered list of `ForgettingPolicy`.
///
/// Every active policy whose condition matches contributes a ruling; the
/// rulings are combined with `PolicyDecision::from_results`.
#[derive(Debug, Default)]
pub struct RulePolicyEngine {
    policies: Mutex<Vec<ForgettingPolicy>>,
    unavailable: AtomicBool,
}

impl RulePolicyEngine {
    pub fn new(policies: Vec<ForgettingPolicy>) -> Self {
        Self {
            policies: Mutex::new(policies),
            unavailable: AtomicBool::new(false),
        }
    }

    /// A baseline rule set.
    ///
    /// | Policy                 | Condition                  | Verdict          |
    /// |------------------------|----------------------------|------------------|
    /// | baseline-allow         | always                     | allow            |
    /// | protect-important      | importance > 0.8           | require_consent  |
    /// | erase-sensitive        | privacy >= confidential    | allow + secure   |
    pub fn standard() -> Self {
        Self::new(vec![
            ForgettingPolicy::new(
                "baseline-allow",
                "Allow forgetting by default",
                PolicyCondition::Always,
                PolicyVerdict::Allow,
            ),
            ForgettingPolicy::new(
                "protect-important",
                "Ask before forgetting important memories",
                PolicyCondition::ImportanceAbove { threshold: 0.8 },
                PolicyVerdict::RequireConsent,
            )
            .requiring_consent(),
            ForgettingPolicy::new(
                "erase-sensitive",
                "Sensitive memories are cryptographically erased",
                PolicyCondition::PrivacyAtLeast {
                    level: crate::schema::PrivacyLevel::Confidential,
                },
                PolicyVerdict::Allow,
            )
            .requiring_secure_deletion(),
        ])
    }

    pub fn add_policy(&self, policy: ForgettingPolicy) {
        self.policies.lock().unwrap().push(policy);
    }

    /// Make every subsequent call fail with `StorageError::Backend`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable("policy engine"));
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyEngine for RulePolicyEngine {
    async fn evaluate_policies(
        &self,
        decision: &ForgettingDecision,
        evaluation: &ForgettingEvaluation,
        metadata: &MemoryMetadata,
    ) -> StorageResult<Vec<PolicyEvaluationResult>> {
        self.check()?;
        let policies = self.policies.lock().unwrap();
        Ok(policies
            .iter()
            .filter(|p| p.active && p.condition.matches(decision, evaluation, metadata))
            .map(|p| PolicyEvaluationResult {
                policy_id: p.id.clone(),
                policy_name: p.name.clone(),
                verdict: p.verdict,
                reason: format!("{} matched {}", p.name, decision.action),
                consent_required: p.consent_required,
                secure_deletion_required: p.secure_deletion_required,
                modifications: p.modifications.clone(),
            })
            .collect())
    }

    async fn get_effective_policy_decision(
        &self,
        results: &[PolicyEvaluationResult],
    ) -> StorageResult<PolicyDecision> {
        self.check()?;
        Ok(PolicyDecision::from_results(results))
    }

    async fn list_policies(&self, active_only: bool) -> StorageResult<Vec<ForgettingPolicy>> {
        self.check()?;
        let policies = self.policies.lock().unwrap();
        Ok(policies
            .iter()
            .filter(|p| !active_only || p.active)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MemorySecureDeleter
// ---------------------------------------------------------------------------

/// In-memory secure deletion executor.
///
/// Records every request and issues a SHA-256 certificate when asked.
/// Verification outcome is configurable so health thresholds can be tested.
#[derive(Debug)]
pub struct MemorySecureDeleter {
    deletions: Mutex<HashMap<String, SecureDeletionOutcome>>,
    requests: Mutex<Vec<(String, SecureDeletionOptions)>>,
    verification_passes: AtomicBool,
    unavailable: AtomicBool,
}

impl Default for MemorySecureDeleter {
    fn default() -> Self {
        Self {
            deletions: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            verification_passes: AtomicBool::new(true),
            unavailable: AtomicBool::new(false),
        }
    }
}

impl MemorySecureDeleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Control whether subsequent deletions pass verification.
    pub fn set_verification_passes(&self, passes: bool) {
        self.verification_passes.store(passes, Ordering::SeqCst);
    }

    /// Make every subsequent call fail with `StorageError::Backend`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Memory ids and options of every accepted deletion request, in order.
    pub fn requests(&self) -> Vec<(String, SecureDeletionOptions)> {
        self.requests.lock().unwrap().clone()
    }

    fn certificate_digest(
        deletion_id: &str,
        memory_id: &str,
        standards: &[ComplianceStandard],
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(deletion_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(memory_id.as_bytes());
        for standard in standards {
            hasher.update(b"\0");
            hasher.update(standard.as_str().as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl SecureDeletionExecutor for MemorySecureDeleter {
    async fn secure_delete(
        &self,
        memory_id: &str,
        _content_summary: &str,
        options: &SecureDeletionOptions,
    ) -> StorageResult<SecureDeletionOutcome> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::SecureDeletion(format!(
                "executor unavailable for {memory_id}"
            )));
        }

        let deletion_id = uuid::Uuid::new_v4().to_string();
        let verification_passed =
            !options.verification_required || self.verification_passes.load(Ordering::SeqCst);
        debug!(
            memory_id,
            deletion_id = %deletion_id,
            verification_passed,
            "secure deletion recorded"
        );
        let certificate = options.certificate_generation.then(|| DeletionCertificate {
            certificate_id: uuid::Uuid::new_v4().to_string(),
            deletion_id: deletion_id.clone(),
            memory_id: memory_id.to_string(),
            compliance_standards: options.compliance_standards.clone(),
            digest: Self::certificate_digest(
                &deletion_id,
                memory_id,
                &options.compliance_standards,
            ),
            issued_at: Utc::now(),
        });

        let outcome = SecureDeletionOutcome {
            deletion_id: deletion_id.clone(),
            verification_passed,
            certificate,
        };
        self.deletions
            .lock()
            .unwrap()
            .insert(deletion_id, outcome.clone());
        self.requests
            .lock()
            .unwrap()
            .push((memory_id.to_string(), options.clone()));
        Ok(outcome)
    }

    async fn get_deletion_statistics(&self) -> StorageResult<DeletionStatistics> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable("secure deletion executor"));
        }
        let deletions = self.deletions.lock().unwrap();
        let total = deletions.len() as u64;
        let verified = deletions.values().filter(|d| d.verification_passed).count() as u64;
        let rate = if total > 0 {
            verified as f64 / total as f64
        } else {
            0.0
        };
        Ok(DeletionStatistics {
            total_deletions: total,
            verified_deletions: verified,
            verification_success_rate: rate,
        })
    }
}

//! Collaborator trait definitions for Lethe
//!
//! These traits define the services the governance core orchestrates:
//! - `AuditLedger`: Durable forgetting lifecycle records
//! - `PolicyEngine`: Rule evaluation and aggregate rulings
//! - `SecureDeletionExecutor`: Cryptographic erasure and certificates
//!
//! All traits are async and backend-agnostic. In-memory implementations are
//! provided via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::schema::{
    ForgettingAction, ForgettingDecision, ForgettingEvaluation, MemoryMetadata, MemoryType,
    PrivacyLevel,
};

/// Result type for collaborator operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// AuditLedger: Forgetting Lifecycle Records
// ---------------------------------------------------------------------------

/// Unique identifier for an audit entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditId(pub String);

impl AuditId {
    /// Generate a new random AuditId
    pub fn new() -> Self {
        AuditId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AuditId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuditId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AuditId {
    fn from(s: &str) -> Self {
        AuditId(s.to_string())
    }
}

/// How an approved forgetting decision is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMethod {
    Immediate,
    Scheduled,
    Gradual,
}

/// Execution status of an audit entry.
///
/// Monotone: `Pending` → `Executed` | `Cancelled` | `Failed` (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Executed,
    Cancelled,
    Failed,
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Pending)
    }

    /// Whether moving from `self` to `next` respects monotonicity.
    pub fn can_transition_to(&self, next: ExecutionStatus) -> bool {
        !self.is_terminal() && next != ExecutionStatus::Pending
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Executed => "executed",
            ExecutionStatus::Cancelled => "cancelled",
            ExecutionStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consent state captured on an audit entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub requested: bool,
    /// `None` until the user answers
    pub granted: Option<bool>,
    pub feedback: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl ConsentRecord {
    /// Consent was asked for and nobody has answered yet.
    pub fn is_pending(&self) -> bool {
        self.requested && self.granted.is_none()
    }
}

/// Kind of user correction to a pending decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideType {
    PreventForgetting,
    ForceForgetting,
    ModifyDecision,
    DelayExecution,
}

/// User-initiated correction to a pending forgetting decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgettingUserOverride {
    pub override_type: OverrideType,
    pub reason: String,
    pub modified_decision: Option<ForgettingDecision>,
}

impl ForgettingUserOverride {
    pub fn new(override_type: OverrideType, reason: impl Into<String>) -> Self {
        Self {
            override_type,
            reason: reason.into(),
            modified_decision: None,
        }
    }

    pub fn with_modified_decision(mut self, decision: ForgettingDecision) -> Self {
        self.modified_decision = Some(decision);
        self
    }
}

/// Measured (or estimated) effect of executing a forgetting decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualImpact {
    pub space_freed_bytes: u64,
    pub latency_improvement_ms: f64,
    pub interference_reduction: f64,
    pub focus_improvement: f64,
    pub user_satisfaction: f64,
}

/// Outcome of secure deletion as recorded on the audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecureDeletionRecord {
    pub deletion_id: String,
    pub verification_passed: bool,
    pub certificate_id: Option<String>,
}

/// Everything needed to open a new audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub memory_id: String,
    pub memory_type: MemoryType,
    pub content_summary: String,
    pub decision: ForgettingDecision,
    pub evaluation: ForgettingEvaluation,
    pub execution_method: ExecutionMethod,
    pub privacy_level: PrivacyLevel,
}

/// Durable record of one forgetting lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub audit_id: AuditId,
    pub memory_id: String,
    pub memory_type: MemoryType,
    pub content_summary: String,
    pub decision: ForgettingDecision,
    pub evaluation: ForgettingEvaluation,
    pub execution_method: ExecutionMethod,
    pub execution_status: ExecutionStatus,
    pub privacy_level: PrivacyLevel,
    pub consent: ConsentRecord,
    /// Policy demanded secure deletion on top of what privacy requires
    #[serde(default)]
    pub secure_deletion_required: bool,
    pub overrides: Vec<ForgettingUserOverride>,
    pub secure_deletion: Option<SecureDeletionRecord>,
    pub actual_impact: Option<ActualImpact>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

impl AuditEntry {
    /// Open a fresh `Pending` entry.
    pub fn open(audit_id: AuditId, new: NewAuditEntry, now: DateTime<Utc>) -> Self {
        Self {
            audit_id,
            memory_id: new.memory_id,
            memory_type: new.memory_type,
            content_summary: new.content_summary,
            decision: new.decision,
            evaluation: new.evaluation,
            execution_method: new.execution_method,
            execution_status: ExecutionStatus::Pending,
            privacy_level: new.privacy_level,
            consent: ConsentRecord::default(),
            secure_deletion_required: false,
            overrides: Vec::new(),
            secure_deletion: None,
            actual_impact: None,
            created_at: now,
            updated_at: now,
            executed_at: None,
        }
    }
}

/// Filter for audit queries. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditFilter {
    pub memory_id: Option<String>,
    pub status: Option<ExecutionStatus>,
    /// Only entries still waiting on a consent answer
    pub consent_pending: bool,
    pub since: Option<DateTime<Utc>>,
}

impl AuditFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_memory_id(mut self, memory_id: impl Into<String>) -> Self {
        self.memory_id = Some(memory_id.into());
        self
    }

    pub fn with_status(mut self, status: ExecutionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn consent_pending(mut self) -> Self {
        self.consent_pending = true;
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(memory_id) = &self.memory_id {
            if &entry.memory_id != memory_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.execution_status != status {
                return false;
            }
        }
        if self.consent_pending
            && !(entry.consent.is_pending() && !entry.execution_status.is_terminal())
        {
            return false;
        }
        if let Some(since) = self.since {
            if entry.created_at < since {
                return false;
            }
        }
        true
    }
}

/// Aggregate counts over the whole ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_entries: usize,
    pub pending: usize,
    pub executed: usize,
    pub cancelled: usize,
    pub failed: usize,
    pub consent_pending: usize,
}

/// Ledger health signals over the trailing 24 hours
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditHealth {
    pub failed_executions_24h: usize,
    pub entries_24h: usize,
    pub total_entries: usize,
}

/// Durable audit ledger for forgetting decisions.
///
/// Guarantees:
/// - Entries are never deleted.
/// - Status transitions: Pending → Executed | Cancelled | Failed (terminal).
/// - Transitions out of a terminal status fail with
///   `StorageError::InvalidStatusTransition`.
#[async_trait]
pub trait AuditLedger: Send + Sync {
    /// Open a new `Pending` entry, returning its id.
    async fn log_forgetting_decision(&self, entry: NewAuditEntry) -> StorageResult<AuditId>;

    /// Flag that the user has been asked for consent.
    async fn mark_consent_requested(&self, audit_id: &AuditId) -> StorageResult<()>;

    /// Flag that execution must go through secure deletion whatever the
    /// entry's privacy level.
    async fn mark_secure_deletion_required(&self, audit_id: &AuditId) -> StorageResult<()>;

    /// Record the user's consent answer.
    async fn record_user_consent(
        &self,
        audit_id: &AuditId,
        granted: bool,
        feedback: Option<String>,
    ) -> StorageResult<()>;

    /// Append a user override.
    async fn record_user_override(
        &self,
        audit_id: &AuditId,
        user_override: ForgettingUserOverride,
    ) -> StorageResult<()>;

    /// Attach the secure deletion outcome.
    async fn record_secure_deletion(
        &self,
        audit_id: &AuditId,
        record: SecureDeletionRecord,
    ) -> StorageResult<()>;

    /// Move the entry to `status`, optionally attaching the measured impact.
    async fn update_execution_status(
        &self,
        audit_id: &AuditId,
        status: ExecutionStatus,
        impact: Option<ActualImpact>,
    ) -> StorageResult<()>;

    /// Fetch an entry, `None` if absent.
    async fn get_audit_entry(&self, audit_id: &AuditId) -> StorageResult<Option<AuditEntry>>;

    /// Entries matching `filter`, oldest first.
    async fn query_audit_entries(&self, filter: &AuditFilter) -> StorageResult<Vec<AuditEntry>>;

    async fn get_audit_summary(&self) -> StorageResult<AuditSummary>;

    async fn get_system_health(&self) -> StorageResult<AuditHealth>;
}

// ---------------------------------------------------------------------------
// PolicyEngine: Rule Evaluation
// ---------------------------------------------------------------------------

/// Ruling on a forgetting decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyVerdict {
    Allow,
    Deny,
    Delay,
    RequireConsent,
    Modify,
}

impl PolicyVerdict {
    /// Precedence when several rulings combine; higher wins.
    pub fn precedence(&self) -> u8 {
        match self {
            PolicyVerdict::Deny => 4,
            PolicyVerdict::RequireConsent => 3,
            PolicyVerdict::Delay => 2,
            PolicyVerdict::Modify => 1,
            PolicyVerdict::Allow => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyVerdict::Allow => "allow",
            PolicyVerdict::Deny => "deny",
            PolicyVerdict::Delay => "delay",
            PolicyVerdict::RequireConsent => "require_consent",
            PolicyVerdict::Modify => "modify",
        }
    }
}

impl std::fmt::Display for PolicyVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a forgetting policy applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyCondition {
    Always,
    /// Memory privacy level at or above the given level
    PrivacyAtLeast { level: PrivacyLevel },
    ActionIs { action: ForgettingAction },
    /// Matches against the metadata category (memory type name)
    CategoryIs { category: String },
    /// Evaluation importance strictly above the threshold
    ImportanceAbove { threshold: f64 },
}

impl PolicyCondition {
    pub fn matches(
        &self,
        decision: &ForgettingDecision,
        evaluation: &ForgettingEvaluation,
        metadata: &MemoryMetadata,
    ) -> bool {
        match self {
            PolicyCondition::Always => true,
            PolicyCondition::PrivacyAtLeast { level } => metadata.privacy_level >= *level,
            PolicyCondition::ActionIs { action } => decision.action == *action,
            PolicyCondition::CategoryIs { category } => &metadata.category == category,
            PolicyCondition::ImportanceAbove { threshold } => {
                evaluation.importance_score > *threshold
            }
        }
    }
}

/// A configured forgetting rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgettingPolicy {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub condition: PolicyCondition,
    pub verdict: PolicyVerdict,
    pub consent_required: bool,
    pub secure_deletion_required: bool,
    pub modifications: Vec<String>,
}

impl ForgettingPolicy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        condition: PolicyCondition,
        verdict: PolicyVerdict,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            condition,
            verdict,
            consent_required: false,
            secure_deletion_required: false,
            modifications: Vec::new(),
        }
    }

    pub fn requiring_consent(mut self) -> Self {
        self.consent_required = true;
        self
    }

    pub fn requiring_secure_deletion(mut self) -> Self {
        self.secure_deletion_required = true;
        self
    }

    pub fn with_modification(mut self, modification: impl Into<String>) -> Self {
        self.modifications.push(modification.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Result of evaluating one policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEvaluationResult {
    pub policy_id: String,
    pub policy_name: String,
    pub verdict: PolicyVerdict,
    pub reason: String,
    pub consent_required: bool,
    pub secure_deletion_required: bool,
    pub modifications: Vec<String>,
}

/// Aggregate ruling from the policy engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub final_decision: PolicyVerdict,
    pub consent_required: bool,
    pub secure_deletion_required: bool,
    pub applied_modifications: Vec<String>,
    /// Ids of the policies that produced a ruling
    pub contributing_policies: Vec<String>,
}

impl PolicyDecision {
    /// Ruling when no policy has anything to say.
    pub fn allow() -> Self {
        Self {
            final_decision: PolicyVerdict::Allow,
            consent_required: false,
            secure_deletion_required: false,
            applied_modifications: Vec::new(),
            contributing_policies: Vec::new(),
        }
    }

    /// Combine individual rulings.
    ///
    /// The verdict with the highest precedence wins (first one on ties);
    /// consent and secure deletion flags are OR-ed; modifications are
    /// collected from `modify` rulings in order, without duplicates.
    pub fn from_results(results: &[PolicyEvaluationResult]) -> Self {
        let mut decision = Self::allow();
        let mut best: Option<PolicyVerdict> = None;
        for result in results {
            if best.map_or(true, |b| result.verdict.precedence() > b.precedence()) {
                best = Some(result.verdict);
            }
            decision.consent_required |= result.consent_required;
            decision.secure_deletion_required |= result.secure_deletion_required;
            if result.verdict == PolicyVerdict::Modify {
                for m in &result.modifications {
                    if !decision.applied_modifications.contains(m) {
                        decision.applied_modifications.push(m.clone());
                    }
                }
            }
            decision.contributing_policies.push(result.policy_id.clone());
        }
        if let Some(verdict) = best {
            decision.final_decision = verdict;
        }
        decision
    }
}

/// Policy engine evaluating forgetting rules.
#[async_trait]
pub trait PolicyEngine: Send + Sync {
    /// Evaluate every active policy that applies to the decision.
    async fn evaluate_policies(
        &self,
        decision: &ForgettingDecision,
        evaluation: &ForgettingEvaluation,
        metadata: &MemoryMetadata,
    ) -> StorageResult<Vec<PolicyEvaluationResult>>;

    /// Fold individual rulings into one decision.
    async fn get_effective_policy_decision(
        &self,
        results: &[PolicyEvaluationResult],
    ) -> StorageResult<PolicyDecision>;

    async fn list_policies(&self, active_only: bool) -> StorageResult<Vec<ForgettingPolicy>>;
}

// ---------------------------------------------------------------------------
// SecureDeletionExecutor: Cryptographic Erasure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionMethod {
    CryptoErase,
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStandard {
    Gdpr,
    Ccpa,
    Hipaa,
}

impl ComplianceStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStandard::Gdpr => "gdpr",
            ComplianceStandard::Ccpa => "ccpa",
            ComplianceStandard::Hipaa => "hipaa",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecureDeletionOptions {
    pub method: DeletionMethod,
    pub verification_required: bool,
    pub certificate_generation: bool,
    pub compliance_standards: Vec<ComplianceStandard>,
}

/// Proof of erasure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionCertificate {
    pub certificate_id: String,
    pub deletion_id: String,
    pub memory_id: String,
    pub compliance_standards: Vec<ComplianceStandard>,
    /// SHA-256 hex over deletion id, memory id and standards
    pub digest: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecureDeletionOutcome {
    pub deletion_id: String,
    pub verification_passed: bool,
    pub certificate: Option<DeletionCertificate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeletionStatistics {
    pub total_deletions: u64,
    pub verified_deletions: u64,
    /// Fraction of deletions whose verification passed (0.0 when none)
    pub verification_success_rate: f64,
}

/// Executor for cryptographic erasure.
#[async_trait]
pub trait SecureDeletionExecutor: Send + Sync {
    async fn secure_delete(
        &self,
        memory_id: &str,
        content_summary: &str,
        options: &SecureDeletionOptions,
    ) -> StorageResult<SecureDeletionOutcome>;

    async fn get_deletion_statistics(&self) -> StorageResult<DeletionStatistics>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruling(id: &str, verdict: PolicyVerdict) -> PolicyEvaluationResult {
        PolicyEvaluationResult {
            policy_id: id.into(),
            policy_name: id.into(),
            verdict,
            reason: "test".into(),
            consent_required: false,
            secure_deletion_required: false,
            modifications: Vec::new(),
        }
    }

    #[test]
    fn empty_results_allow() {
        let d = PolicyDecision::from_results(&[]);
        assert_eq!(d.final_decision, PolicyVerdict::Allow);
        assert!(!d.consent_required);
        assert!(d.contributing_policies.is_empty());
    }

    #[test]
    fn deny_beats_everything() {
        let d = PolicyDecision::from_results(&[
            ruling("a", PolicyVerdict::Allow),
            ruling("c", PolicyVerdict::RequireConsent),
            ruling("d", PolicyVerdict::Deny),
            ruling("m", PolicyVerdict::Modify),
        ]);
        assert_eq!(d.final_decision, PolicyVerdict::Deny);
        assert_eq!(d.contributing_policies, vec!["a", "c", "d", "m"]);
    }

    #[test]
    fn flags_are_or_combined() {
        let mut a = ruling("a", PolicyVerdict::Allow);
        a.secure_deletion_required = true;
        let mut b = ruling("b", PolicyVerdict::Allow);
        b.consent_required = true;
        let d = PolicyDecision::from_results(&[a, b]);
        assert!(d.consent_required);
        assert!(d.secure_deletion_required);
    }

    #[test]
    fn modifications_deduplicated() {
        let mut a = ruling("a", PolicyVerdict::Modify);
        a.modifications = vec!["degrade_only".into()];
        let mut b = ruling("b", PolicyVerdict::Modify);
        b.modifications = vec!["degrade_only".into(), "keep_summary".into()];
        let d = PolicyDecision::from_results(&[a, b]);
        assert_eq!(d.final_decision, PolicyVerdict::Modify);
        assert_eq!(d.applied_modifications, vec!["degrade_only", "keep_summary"]);
    }

    #[test]
    fn terminal_statuses_reject_transitions() {
        assert!(ExecutionStatus::Pending.can_transition_to(ExecutionStatus::Executed));
        assert!(!ExecutionStatus::Pending.can_transition_to(ExecutionStatus::Pending));
        for terminal in [
            ExecutionStatus::Executed,
            ExecutionStatus::Cancelled,
            ExecutionStatus::Failed,
        ] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(ExecutionStatus::Failed));
        }
    }

    #[test]
    fn condition_privacy_at_least() {
        let decision = ForgettingDecision::new("m", ForgettingAction::Delete, "r", 0.9);
        let evaluation = ForgettingEvaluation::default();
        let metadata = MemoryMetadata {
            content_type: "text".into(),
            size_bytes: 10,
            category: "episodic".into(),
            privacy_level: PrivacyLevel::Confidential,
            access_frequency: 0.0,
        };
        let cond = PolicyCondition::PrivacyAtLeast {
            level: PrivacyLevel::Confidential,
        };
        assert!(cond.matches(&decision, &evaluation, &metadata));
        let cond = PolicyCondition::PrivacyAtLeast {
            level: PrivacyLevel::Restricted,
        };
        assert!(!cond.matches(&decision, &evaluation, &metadata));
    }
}

//! Forgetting control system: audit, policy, consent and secure erasure
//! orchestrated around one forgetting request.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use lethe_state::{
    AuditEntry, AuditFilter, AuditId, AuditLedger, ComplianceStandard, DeletionMethod,
    ExecutionMethod, ExecutionStatus, ForgettingDecision, ForgettingEvaluation,
    ForgettingUserOverride, MemoryType, NewAuditEntry, OverrideType, PolicyDecision,
    PolicyEngine, PolicyVerdict, SecureDeletionExecutor, SecureDeletionOptions,
    SecureDeletionRecord,
};

use super::error::{ForgettingError, ForgettingResult};
use super::impact::{ImpactEstimator, SimulatedImpactEstimator};
use super::metadata::{summarize_content, DefaultMetadataExtractor, MetadataExtractor};
use super::planning::{estimate_execution_time, next_steps, ExecutionRequirements};
use crate::metrics::METRICS;
use crate::obs;

/// Tunables for the forgetting control system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgettingControlConfig {
    /// Ledger is unhealthy once this many executions failed in 24h.
    pub audit_failure_threshold: usize,
    /// Audit entries per 24h that count as full load.
    pub load_capacity: usize,
    /// Minimum verification success rate for a healthy executor.
    pub secure_deletion_health_threshold: f64,
    /// Standards declared on every secure deletion.
    pub compliance_standards: Vec<ComplianceStandard>,
    /// Execute allow/modify rulings that need no consent straight away.
    pub auto_execute: bool,
    /// Maximum characters kept in an audit content summary.
    pub content_summary_limit: usize,
}

impl Default for ForgettingControlConfig {
    fn default() -> Self {
        Self {
            audit_failure_threshold: 5,
            load_capacity: 1_000,
            secure_deletion_health_threshold: 0.9,
            compliance_standards: vec![ComplianceStandard::Gdpr, ComplianceStandard::Ccpa],
            auto_execute: false,
            content_summary_limit: 100,
        }
    }
}

/// Outcome returned to the caller of a forgetting request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgettingControlResult {
    pub audit_id: AuditId,
    pub policy_decision: PolicyDecision,
    pub execution_allowed: bool,
    pub consent_required: bool,
    pub secure_deletion_required: bool,
    pub estimated_execution_time_ms: u64,
    pub next_steps: Vec<String>,
}

/// Health of each collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub audit_ledger: bool,
    pub policy_engine: bool,
    pub secure_deletion: bool,
}

impl ComponentHealth {
    pub fn all_healthy(&self) -> bool {
        self.audit_ledger && self.policy_engine && self.secure_deletion
    }
}

/// Snapshot returned by [`ForgettingControlSystem::get_system_status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgettingControlSystemStatus {
    pub health: ComponentHealth,
    pub pending_consent_requests: usize,
    /// Recent audit volume over capacity, capped at 1.0
    pub system_load: f64,
    pub timestamp: DateTime<Utc>,
}

impl ForgettingControlSystemStatus {
    fn unavailable(timestamp: DateTime<Utc>) -> Self {
        Self {
            health: ComponentHealth {
                audit_ledger: false,
                policy_engine: false,
                secure_deletion: false,
            },
            pending_consent_requests: 0,
            system_load: 1.0,
            timestamp,
        }
    }
}

/// Orchestrates forgetting requests across the audit ledger, the policy
/// engine, and the secure deletion executor.
pub struct ForgettingControlSystem {
    audit: Arc<dyn AuditLedger>,
    policy: Arc<dyn PolicyEngine>,
    deleter: Arc<dyn SecureDeletionExecutor>,
    extractor: Arc<dyn MetadataExtractor>,
    impact: Arc<dyn ImpactEstimator>,
    config: ForgettingControlConfig,
}

impl ForgettingControlSystem {
    /// Create a control system with the default extractor and the simulated
    /// impact estimator.
    pub fn new(
        audit: Arc<dyn AuditLedger>,
        policy: Arc<dyn PolicyEngine>,
        deleter: Arc<dyn SecureDeletionExecutor>,
        config: ForgettingControlConfig,
    ) -> Self {
        Self {
            audit,
            policy,
            deleter,
            extractor: Arc::new(DefaultMetadataExtractor),
            impact: Arc::new(SimulatedImpactEstimator),
            config,
        }
    }

    pub fn with_metadata_extractor(mut self, extractor: Arc<dyn MetadataExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_impact_estimator(mut self, impact: Arc<dyn ImpactEstimator>) -> Self {
        self.impact = impact;
        self
    }

    pub fn config(&self) -> &ForgettingControlConfig {
        &self.config
    }

    /// Log, evaluate, and plan a forgetting request.
    ///
    /// A collaborator failure after the audit entry is created leaves that
    /// entry `Pending` for out-of-band reconciliation.
    #[instrument(
        skip_all,
        fields(memory_id = %memory_id, action = %decision.action, audit_id = tracing::field::Empty)
    )]
    pub async fn process_forgetting_request(
        &self,
        memory_id: &str,
        memory_type: MemoryType,
        memory_content: &Value,
        decision: &ForgettingDecision,
        evaluation: &ForgettingEvaluation,
        execution_method: ExecutionMethod,
    ) -> ForgettingResult<ForgettingControlResult> {
        METRICS.inc_forgetting_requests();

        let content_summary = summarize_content(memory_content, self.config.content_summary_limit);
        let metadata = self.extractor.extract(memory_type, memory_content);

        let audit_id = self
            .audit
            .log_forgetting_decision(NewAuditEntry {
                memory_id: memory_id.to_string(),
                memory_type,
                content_summary,
                decision: decision.clone(),
                evaluation: evaluation.clone(),
                execution_method,
                privacy_level: metadata.privacy_level,
            })
            .await?;
        tracing::Span::current().record("audit_id", audit_id.as_str());

        let results = self
            .policy
            .evaluate_policies(decision, evaluation, &metadata)
            .await?;
        let policy_decision = self.policy.get_effective_policy_decision(&results).await?;
        let verdict = policy_decision.final_decision;

        let requirements = ExecutionRequirements::derive(&policy_decision, metadata.privacy_level);
        // Delayed requests are left to the scheduler.
        if requirements.execution_allowed
            && requirements.consent_required
            && verdict != PolicyVerdict::Delay
        {
            self.audit.mark_consent_requested(&audit_id).await?;
        }
        if requirements.secure_deletion_required {
            self.audit.mark_secure_deletion_required(&audit_id).await?;
        }

        let estimated_execution_time_ms = estimate_execution_time(&requirements, decision.action);
        let steps = next_steps(verdict, &requirements);
        obs::emit_forgetting_requested(audit_id.as_str(), memory_id, verdict.as_str());

        let runnable = matches!(verdict, PolicyVerdict::Allow | PolicyVerdict::Modify)
            && requirements.execution_allowed
            && !requirements.consent_required;
        if self.config.auto_execute && runnable {
            debug!("auto-executing approved request");
            self.execute_approved_forgetting(&audit_id).await?;
        }

        Ok(ForgettingControlResult {
            audit_id,
            policy_decision,
            execution_allowed: requirements.execution_allowed,
            consent_required: requirements.consent_required,
            secure_deletion_required: requirements.secure_deletion_required,
            estimated_execution_time_ms,
            next_steps: steps,
        })
    }

    /// Record a consent answer; granted consent executes, refusal cancels.
    ///
    /// Only entries with an open consent request accept an answer. Denied
    /// and delayed requests never get one, so consent cannot bypass policy.
    #[instrument(skip(self, feedback), fields(audit_id = %audit_id))]
    pub async fn handle_user_consent(
        &self,
        audit_id: &AuditId,
        consent_granted: bool,
        feedback: Option<String>,
    ) -> ForgettingResult<()> {
        let entry = self.require_open_entry(audit_id).await?;
        if !entry.consent.is_pending() {
            return Err(ForgettingError::ConsentNotRequested(audit_id.0.clone()));
        }
        self.audit
            .record_user_consent(audit_id, consent_granted, feedback)
            .await?;
        obs::emit_consent_recorded(audit_id.as_str(), consent_granted);

        if consent_granted {
            self.execute_approved_forgetting(audit_id).await
        } else {
            self.audit
                .update_execution_status(audit_id, ExecutionStatus::Cancelled, None)
                .await?;
            Ok(())
        }
    }

    /// Record a user override and apply its immediate effect, if any.
    ///
    /// `ForceForgetting` executes regardless of the policy verdict.
    /// `ModifyDecision` and `DelayExecution` are recorded only; carrying them
    /// out belongs to an external scheduler. Finalized entries reject
    /// overrides.
    #[instrument(skip(self, user_override), fields(audit_id = %audit_id))]
    pub async fn process_user_override(
        &self,
        audit_id: &AuditId,
        user_override: ForgettingUserOverride,
    ) -> ForgettingResult<()> {
        self.require_open_entry(audit_id).await?;
        let override_type = user_override.override_type;
        self.audit
            .record_user_override(audit_id, user_override)
            .await?;
        obs::emit_override_recorded(audit_id.as_str(), override_label(override_type));

        match override_type {
            OverrideType::PreventForgetting => {
                self.audit
                    .update_execution_status(audit_id, ExecutionStatus::Cancelled, None)
                    .await?;
                Ok(())
            }
            OverrideType::ForceForgetting => self.execute_approved_forgetting(audit_id).await,
            OverrideType::ModifyDecision | OverrideType::DelayExecution => Ok(()),
        }
    }

    /// Carry out an approved decision.
    ///
    /// Memories whose privacy level or policy demands it go through
    /// `crypto_erase` with verification and a certificate. Any failure marks the entry `Failed` before returning
    /// the error.
    #[instrument(skip(self), fields(audit_id = %audit_id))]
    pub async fn execute_approved_forgetting(&self, audit_id: &AuditId) -> ForgettingResult<()> {
        let entry = self.require_entry(audit_id).await?;
        if entry.execution_status.is_terminal() {
            return Err(lethe_state::StorageError::InvalidStatusTransition {
                audit_id: audit_id.0.clone(),
                from: entry.execution_status.to_string(),
                to: ExecutionStatus::Executed.to_string(),
            }
            .into());
        }

        match self.execute_entry(&entry).await {
            Ok(secure) => {
                METRICS.inc_forgetting_executions();
                obs::emit_forgetting_executed(audit_id.as_str(), &entry.memory_id, secure);
                Ok(())
            }
            Err(err) => {
                METRICS.inc_forgetting_failures();
                obs::emit_forgetting_failed(audit_id.as_str(), &err);
                if let Err(mark_err) = self
                    .audit
                    .update_execution_status(audit_id, ExecutionStatus::Failed, None)
                    .await
                {
                    warn!(error = %mark_err, "could not mark audit entry failed");
                }
                Err(err)
            }
        }
    }

    /// Returns whether secure deletion ran.
    async fn execute_entry(&self, entry: &AuditEntry) -> ForgettingResult<bool> {
        let secure =
            entry.privacy_level.requires_secure_deletion() || entry.secure_deletion_required;
        if secure {
            let options = SecureDeletionOptions {
                method: DeletionMethod::CryptoErase,
                verification_required: true,
                certificate_generation: true,
                compliance_standards: self.config.compliance_standards.clone(),
            };
            let outcome = self
                .deleter
                .secure_delete(&entry.memory_id, &entry.content_summary, &options)
                .await?;
            if !outcome.verification_passed {
                warn!(deletion_id = %outcome.deletion_id, "secure deletion verification failed");
            }
            self.audit
                .record_secure_deletion(
                    &entry.audit_id,
                    SecureDeletionRecord {
                        deletion_id: outcome.deletion_id,
                        verification_passed: outcome.verification_passed,
                        certificate_id: outcome.certificate.map(|c| c.certificate_id),
                    },
                )
                .await?;
        }

        let impact = self.impact.estimate(entry);
        self.audit
            .update_execution_status(&entry.audit_id, ExecutionStatus::Executed, Some(impact))
            .await?;
        Ok(secure)
    }

    /// Collaborator health, pending consents, and load. Never fails.
    pub async fn get_system_status(&self) -> ForgettingControlSystemStatus {
        let now = Utc::now();
        match self.collect_status(now).await {
            Ok(status) => status,
            Err(err) => {
                warn!(error = %err, "system status unavailable");
                ForgettingControlSystemStatus::unavailable(now)
            }
        }
    }

    async fn collect_status(
        &self,
        now: DateTime<Utc>,
    ) -> ForgettingResult<ForgettingControlSystemStatus> {
        let audit_health = self.audit.get_system_health().await?;
        let active_policies = self.policy.list_policies(true).await?;
        let deletions = self.deleter.get_deletion_statistics().await?;

        let health = ComponentHealth {
            audit_ledger: audit_health.failed_executions_24h < self.config.audit_failure_threshold,
            policy_engine: !active_policies.is_empty(),
            secure_deletion: deletions.total_deletions == 0
                || deletions.verification_success_rate
                    > self.config.secure_deletion_health_threshold,
        };

        let pending_consent_requests = self
            .audit
            .query_audit_entries(&AuditFilter::all().consent_pending())
            .await?
            .len();

        let recent = self
            .audit
            .query_audit_entries(&AuditFilter::all().since(now - Duration::hours(24)))
            .await?
            .len();
        let system_load = if self.config.load_capacity == 0 {
            1.0
        } else {
            (recent as f64 / self.config.load_capacity as f64).min(1.0)
        };

        Ok(ForgettingControlSystemStatus {
            health,
            pending_consent_requests,
            system_load,
            timestamp: now,
        })
    }

    async fn require_entry(&self, audit_id: &AuditId) -> ForgettingResult<AuditEntry> {
        self.audit
            .get_audit_entry(audit_id)
            .await?
            .ok_or_else(|| ForgettingError::NotFound(audit_id.0.clone()))
    }

    async fn require_open_entry(&self, audit_id: &AuditId) -> ForgettingResult<AuditEntry> {
        let entry = self.require_entry(audit_id).await?;
        if entry.execution_status.is_terminal() {
            return Err(ForgettingError::AlreadyFinalized {
                audit_id: audit_id.0.clone(),
                status: entry.execution_status,
            });
        }
        Ok(entry)
    }
}

fn override_label(override_type: OverrideType) -> &'static str {
    match override_type {
        OverrideType::PreventForgetting => "prevent_forgetting",
        OverrideType::ForceForgetting => "force_forgetting",
        OverrideType::ModifyDecision => "modify_decision",
        OverrideType::DelayExecution => "delay_execution",
    }
}

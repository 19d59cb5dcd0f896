//! Lethe Core Library
//!
//! Governance for forgetting and recovering agent memories.
//!
//! - [`forgetting`]: audited, policy-checked, consent-aware forgetting with
//!   secure erasure of sensitive memories.
//! - [`recovery`]: ranked multi-strategy reconstruction of degraded memories
//!   with confidence and quality scoring.
//!
//! Collaborator contracts (audit ledger, policy engine, secure deletion
//! executor) live in `lethe-state` and are re-exported here.

pub mod config;
pub mod forgetting;
pub mod metrics;
pub mod obs;
pub mod recovery;
pub mod telemetry;

pub use config::{LetheConfig, TelemetryConfig};

pub use forgetting::{
    ComponentHealth, DefaultMetadataExtractor, FixedImpactEstimator, ForgettingControlConfig,
    ForgettingControlResult, ForgettingControlSystem, ForgettingControlSystemStatus,
    ForgettingError, ForgettingResult, ImpactEstimator, MetadataExtractor,
    SimulatedImpactEstimator,
};

pub use recovery::{
    AssociativeStrategy, CueType, EnhancedRecoveryResult, PartialCueStrategy, RecoveredContent,
    RecoveryAttempt, RecoveryConfidenceAssessment, RecoveryConfig, RecoveryCue, RecoveryEngine,
    RecoveryError, RecoveryMetadata, RecoveryResult, RecoveryStatistics, RecoveryStrategy,
    SchemaBasedStrategy, UserValidation,
};

pub use lethe_state::{
    AuditEntry, AuditFilter, AuditId, AuditLedger, ExecutionMethod, ExecutionStatus,
    ForgettingAction, ForgettingDecision, ForgettingEvaluation, ForgettingUserOverride,
    MemoryMetadata, MemoryType, OverrideType, PolicyDecision, PolicyEngine, PolicyVerdict,
    PrivacyLevel, SecureDeletionExecutor, StorageError,
};

pub use metrics::METRICS;
pub use telemetry::init_tracing;

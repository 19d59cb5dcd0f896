//! Lethe-State: collaborator contracts for memory forgetting governance
//!
//! This crate defines the boundaries the governance core talks through.
//! It owns no decision logic; it describes the records that cross the
//! seams and the services that persist or act on them.
//!
//! ## Layer 0 - Contracts/Persistence
//!
//! Focus: Audit integrity, monotone status transitions, and policy rulings.
//!
//! ## Key Components
//!
//! - `AuditLedger`: Durable record of forgetting decisions and outcomes
//! - `PolicyEngine`: Evaluates forgetting rules into an aggregate ruling
//! - `SecureDeletionExecutor`: Cryptographic erasure with certificates
//! - `fakes`: In-memory implementations of all three

mod error;
pub mod fakes;
mod schema;
pub mod storage_traits;

pub use error::StorageError;
pub use schema::{
    ForgettingAction, ForgettingDecision, ForgettingEvaluation, MemoryMetadata, MemoryType,
    PrivacyLevel,
};
pub use storage_traits::{
    ActualImpact, AuditEntry, AuditFilter, AuditHealth, AuditId, AuditLedger, AuditSummary,
    ComplianceStandard, ConsentRecord, DeletionCertificate, DeletionMethod, DeletionStatistics,
    ExecutionMethod, ExecutionStatus, ForgettingPolicy, ForgettingUserOverride, NewAuditEntry,
    OverrideType, PolicyCondition, PolicyDecision, PolicyEngine, PolicyEvaluationResult,
    PolicyVerdict, SecureDeletionExecutor, SecureDeletionOptions, SecureDeletionOutcome,
    SecureDeletionRecord, StorageResult,
};

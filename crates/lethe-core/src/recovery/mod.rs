//! Memory recovery.
//!
//! A [`RecoveryEngine`] holds a registry of [`RecoveryStrategy`]
//! implementations, ranks them against the supplied cues, and invokes them
//! one by one until an attempt is confident enough. None of the built-in
//! strategies read a real memory store: the "recovered content" they return
//! is evidence synthesised from the cues and the preserved
//! [`RecoveryMetadata`], so its quality is bounded by what was preserved.

mod assessment;
mod associative;
mod engine;
mod error;
mod partial_cue;
mod schema_based;
mod strategy;
mod types;

pub use assessment::{assess_quality, assess_recovery_confidence};
pub use associative::AssociativeStrategy;
pub use engine::{RecoveryConfig, RecoveryEngine, DEFAULT_PROBABILITY};
pub use error::{RecoveryError, RecoveryResult};
pub use partial_cue::{temporal_decay_factor, CombinationPolicy, PartialCueConfig, PartialCueStrategy};
pub use schema_based::SchemaBasedStrategy;
pub use strategy::RecoveryStrategy;
pub use types::{
    content_hash, AssociationFingerprint, CueType, DegradationEvent, EnhancedRecoveryResult,
    FailurePattern, ImprovementTrend, QualityAssessment, RecoveredContent, RecoveryAttempt,
    RecoveryConfidenceAssessment, RecoveryCue, RecoveryEvidence, RecoveryMetadata,
    RecoveryStatistics, ReliabilityFactor, StrategyStats, TrendDirection, UncertaintySource,
    UserValidation,
};

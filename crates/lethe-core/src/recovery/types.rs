//! Data carried into and out of a recovery request.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Kind of hint a cue provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueType {
    Associative,
    Semantic,
    Contextual,
    Temporal,
    Emotional,
    Sensory,
}

/// A typed hint used to reconstruct a memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryCue {
    pub cue_type: CueType,
    pub value: String,
    /// Always within [0, 1]
    pub strength: f64,
}

impl RecoveryCue {
    pub fn new(cue_type: CueType, value: impl Into<String>, strength: f64) -> Self {
        Self {
            cue_type,
            value: value.into(),
            strength: clamp_unit(strength),
        }
    }
}

/// One degradation step applied to a memory before it was forgotten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub at: DateTime<Utc>,
    /// Fraction of fidelity lost by this step, in [0, 1]
    pub severity: f64,
    pub reason: String,
}

/// Associative structure preserved at degradation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationFingerprint {
    pub strong_associations: Vec<String>,
    pub weak_associations: Vec<String>,
    pub semantic_clusters: Vec<String>,
    pub temporal_neighbors: Vec<String>,
    pub contextual_tags: Vec<String>,
}

impl AssociationFingerprint {
    /// Total number of preserved elements.
    pub fn len(&self) -> usize {
        self.strong_associations.len()
            + self.weak_associations.len()
            + self.semantic_clusters.len()
            + self.temporal_neighbors.len()
            + self.contextual_tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fingerprint captured when a memory was degraded; read-only during recovery.
///
/// Reconstruction quality depends entirely on how much of this was
/// preserved: strategies only echo what is recorded here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryMetadata {
    /// Hex SHA-256 of the original content summary
    pub original_content_hash: Option<String>,
    pub original_importance: f64,
    pub degradation_history: Vec<DegradationEvent>,
    pub association_fingerprint: AssociationFingerprint,
    pub content_summary: String,
    /// 0 = trivial, 1 = practically unrecoverable
    pub difficulty_estimate: f64,
    pub original_created_at: Option<DateTime<Utc>>,
}

impl RecoveryMetadata {
    /// Summed severity of all degradation steps, capped at 1.0.
    pub fn cumulative_degradation(&self) -> f64 {
        self.degradation_history
            .iter()
            .map(|e| e.severity.max(0.0))
            .sum::<f64>()
            .min(1.0)
    }

    /// Age of the original memory in days, if its creation time is known.
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<f64> {
        self.original_created_at
            .map(|created| ((now - created).num_seconds().max(0) as f64) / 86_400.0)
    }
}

/// Strategy-specific evidence backing a reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecoveryEvidence {
    Associative {
        associations_used: Vec<String>,
    },
    Schema {
        schema_elements: Vec<String>,
        context_elements: Vec<String>,
    },
    PartialCue {
        cue_values: Vec<String>,
        combined_strength: f64,
    },
}

impl RecoveryEvidence {
    /// Every named element the evidence refers to.
    pub fn elements(&self) -> Vec<&str> {
        match self {
            RecoveryEvidence::Associative { associations_used } => {
                associations_used.iter().map(String::as_str).collect()
            }
            RecoveryEvidence::Schema {
                schema_elements,
                context_elements,
            } => schema_elements
                .iter()
                .chain(context_elements)
                .map(String::as_str)
                .collect(),
            RecoveryEvidence::PartialCue { cue_values, .. } => {
                cue_values.iter().map(String::as_str).collect()
            }
        }
    }
}

/// Reconstructed payload. This is evidence, not ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveredContent {
    pub summary: String,
    pub evidence: RecoveryEvidence,
}

impl RecoveredContent {
    /// Hex SHA-256 of the summary, comparable with
    /// [`RecoveryMetadata::original_content_hash`].
    pub fn content_hash(&self) -> String {
        content_hash(&self.summary)
    }
}

/// Hex SHA-256 of a content summary.
pub fn content_hash(summary: &str) -> String {
    hex::encode(Sha256::digest(summary.as_bytes()))
}

/// Outcome of a single strategy invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryAttempt {
    pub strategy: String,
    pub success: bool,
    pub confidence: f64,
    pub partial: bool,
    pub recovered_elements: Vec<String>,
    pub missing_elements: Vec<String>,
    pub recovered_content: Option<RecoveredContent>,
    pub method_detail: String,
    pub elapsed_ms: u64,
}

impl RecoveryAttempt {
    /// A zero-confidence attempt that recovered nothing.
    pub fn failed(strategy: impl Into<String>, method_detail: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            success: false,
            confidence: 0.0,
            partial: false,
            recovered_elements: Vec::new(),
            missing_elements: vec!["all".to_string()],
            recovered_content: None,
            method_detail: method_detail.into(),
            elapsed_ms: 0,
        }
    }

    /// Clamp confidence into [0, 1]; NaN becomes 0.
    pub fn normalized(mut self) -> Self {
        self.confidence = clamp_unit(self.confidence);
        self
    }
}

/// Four independent quality dimensions and their mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub content_coherence: f64,
    pub contextual_consistency: f64,
    pub temporal_accuracy: f64,
    pub associative_integrity: f64,
    pub overall: f64,
}

impl QualityAssessment {
    pub fn from_dimensions(
        content_coherence: f64,
        contextual_consistency: f64,
        temporal_accuracy: f64,
        associative_integrity: f64,
    ) -> Self {
        let dims = [
            clamp_unit(content_coherence),
            clamp_unit(contextual_consistency),
            clamp_unit(temporal_accuracy),
            clamp_unit(associative_integrity),
        ];
        Self {
            content_coherence: dims[0],
            contextual_consistency: dims[1],
            temporal_accuracy: dims[2],
            associative_integrity: dims[3],
            overall: dims.iter().sum::<f64>() / 4.0,
        }
    }

    /// Used when assessment is disabled or nothing was recovered.
    pub fn neutral() -> Self {
        Self::from_dimensions(0.5, 0.5, 0.5, 0.5)
    }
}

/// Combined outcome of one recovery request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedRecoveryResult {
    pub memory_id: String,
    pub success: bool,
    pub recovered_content: Option<RecoveredContent>,
    /// Mean confidence of successful attempts; 0 when none succeeded
    pub combined_confidence: f64,
    /// Whether `combined_confidence` reaches the configured threshold
    pub meets_confidence_threshold: bool,
    /// Name of the best strategy, or `"none"`
    pub recovery_method: String,
    pub partial_recovery: bool,
    pub attempts: Vec<RecoveryAttempt>,
    pub quality: QualityAssessment,
    pub timed_out: bool,
    pub duration_ms: u64,
}

/// User feedback on a recovery result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserValidation {
    pub accurate: bool,
    /// How accurate the user judged the result, in [0, 1]
    pub accuracy_rating: f64,
    pub feedback: Option<String>,
    pub validated_at: DateTime<Utc>,
}

impl UserValidation {
    pub fn new(accurate: bool, accuracy_rating: f64) -> Self {
        Self {
            accurate,
            accuracy_rating: clamp_unit(accuracy_rating),
            feedback: None,
            validated_at: Utc::now(),
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// Tracked performance of one registered strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyStats {
    pub invocations: u64,
    pub successes: u64,
    /// Exponential moving average of outcomes, nudged by user validation
    pub success_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementTrend {
    pub metric: String,
    pub direction: TrendDirection,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePattern {
    pub description: String,
    pub frequency: f64,
    pub suggested_causes: Vec<String>,
    pub suggested_improvements: Vec<String>,
}

/// Rolling aggregate over all recovery requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryStatistics {
    /// Requests handled by `attempt_recovery`
    pub total_recoveries: u64,
    pub successful_recoveries: u64,
    pub partial_recoveries: u64,
    pub failed_recoveries: u64,
    pub average_confidence: f64,
    pub average_latency_ms: f64,
    pub strategy_success_rates: BTreeMap<String, f64>,
    pub improvement_trends: Vec<ImprovementTrend>,
    pub failure_patterns: Vec<FailurePattern>,
}

impl RecoveryStatistics {
    /// Results reported through `track_recovery_success`.
    pub fn tracked(&self) -> u64 {
        self.successful_recoveries + self.partial_recoveries + self.failed_recoveries
    }
}

/// A named signal that raises or lowers confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityFactor {
    pub name: String,
    /// Signed contribution folded onto the base confidence
    pub impact: f64,
    pub evidence: String,
}

/// A known gap in the evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintySource {
    pub name: String,
    pub severity: f64,
    pub mitigations: Vec<String>,
}

/// Result of [`assess_recovery_confidence`](super::assess_recovery_confidence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfidenceAssessment {
    /// Always within [0.1, 1.0]
    pub overall_confidence: f64,
    pub content_accuracy: f64,
    pub completeness: f64,
    pub reliability_factors: Vec<ReliabilityFactor>,
    pub uncertainty_sources: Vec<UncertaintySource>,
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

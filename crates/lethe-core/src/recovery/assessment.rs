//! Quality and confidence scoring for recovered content.

use super::types::{
    clamp_unit, CueType, QualityAssessment, RecoveredContent, RecoveryAttempt,
    RecoveryConfidenceAssessment, RecoveryCue, RecoveryMetadata, ReliabilityFactor,
    UncertaintySource,
};

const HASH_MATCH_ACCURACY: f64 = 0.95;
const HASH_MISMATCH_ACCURACY: f64 = 0.3;
const UNKNOWN_ACCURACY: f64 = 0.5;
const NEUTRAL: f64 = 0.5;

/// Score the best attempt on four independent dimensions.
pub fn assess_quality(
    best: &RecoveryAttempt,
    cues: &[RecoveryCue],
    metadata: Option<&RecoveryMetadata>,
) -> QualityAssessment {
    let total_elements = best.recovered_elements.len() + best.missing_elements.len();
    let coverage = if total_elements == 0 {
        NEUTRAL
    } else {
        best.recovered_elements.len() as f64 / total_elements as f64
    };
    let content_coherence = 0.5 * best.confidence + 0.5 * coverage;

    let Some(meta) = metadata else {
        return QualityAssessment::from_dimensions(content_coherence, NEUTRAL, NEUTRAL, NEUTRAL);
    };
    let fingerprint = &meta.association_fingerprint;

    let contextual: Vec<&RecoveryCue> = cues
        .iter()
        .filter(|c| c.cue_type == CueType::Contextual)
        .collect();
    let contextual_consistency = if contextual.is_empty() || fingerprint.contextual_tags.is_empty()
    {
        NEUTRAL
    } else {
        let matched = contextual
            .iter()
            .filter(|c| fingerprint.contextual_tags.contains(&c.value))
            .count();
        matched as f64 / contextual.len() as f64
    };

    let temporal_accuracy = 1.0 - 0.5 * meta.cumulative_degradation();

    let associative: Vec<&RecoveryCue> = cues
        .iter()
        .filter(|c| c.cue_type == CueType::Associative)
        .collect();
    let associative_integrity = if associative.is_empty() {
        NEUTRAL
    } else {
        let score: f64 = associative
            .iter()
            .map(|c| {
                if fingerprint.strong_associations.contains(&c.value) {
                    1.0
                } else if fingerprint.weak_associations.contains(&c.value) {
                    0.5
                } else {
                    0.0
                }
            })
            .sum();
        score / associative.len() as f64
    };

    QualityAssessment::from_dimensions(
        content_coherence,
        contextual_consistency,
        temporal_accuracy,
        associative_integrity,
    )
}

/// Estimate how far recovered content can be trusted against what was
/// preserved before degradation.
///
/// Accuracy comes from the content hash, completeness from how much of the
/// preserved fingerprint the evidence covers minus a degradation penalty.
/// Reliability impacts are added onto their mean and the result is clamped
/// to [0.1, 1.0].
pub fn assess_recovery_confidence(
    recovered: &RecoveredContent,
    original: &RecoveryMetadata,
) -> RecoveryConfidenceAssessment {
    let mut factors = Vec::new();
    let mut uncertainties = Vec::new();

    let content_accuracy = match &original.original_content_hash {
        Some(hash) if *hash == recovered.content_hash() => {
            factors.push(ReliabilityFactor {
                name: "content_hash".into(),
                impact: 0.1,
                evidence: "recovered content matches the preserved hash".into(),
            });
            HASH_MATCH_ACCURACY
        }
        Some(_) => {
            factors.push(ReliabilityFactor {
                name: "content_hash".into(),
                impact: -0.2,
                evidence: "recovered content differs from the preserved hash".into(),
            });
            HASH_MISMATCH_ACCURACY
        }
        None => {
            uncertainties.push(UncertaintySource {
                name: "missing_content_hash".into(),
                severity: 0.5,
                mitigations: vec!["Preserve a content hash when degrading memories".into()],
            });
            UNKNOWN_ACCURACY
        }
    };

    let coverage = fingerprint_coverage(recovered, original);
    let degradation = original.cumulative_degradation();
    let completeness = clamp_unit(coverage - 0.5 * degradation);

    if original.association_fingerprint.strong_associations.len() >= 3 {
        factors.push(ReliabilityFactor {
            name: "rich_associations".into(),
            impact: 0.05,
            evidence: format!(
                "{} strong associations preserved",
                original.association_fingerprint.strong_associations.len()
            ),
        });
    }
    if original.original_importance > 0.7 {
        factors.push(ReliabilityFactor {
            name: "high_original_importance".into(),
            impact: 0.05,
            evidence: format!("original importance {:.2}", original.original_importance),
        });
    }
    if degradation > 0.5 {
        factors.push(ReliabilityFactor {
            name: "heavy_degradation".into(),
            impact: -0.1,
            evidence: format!("cumulative degradation {degradation:.2}"),
        });
    }
    if original.degradation_history.len() > 3 {
        uncertainties.push(UncertaintySource {
            name: "repeated_degradation".into(),
            severity: (0.1 * original.degradation_history.len() as f64).min(1.0),
            mitigations: vec!["Recover before further degradation passes run".into()],
        });
    }
    if original.difficulty_estimate > 0.7 {
        factors.push(ReliabilityFactor {
            name: "high_difficulty".into(),
            impact: -0.1,
            evidence: format!("difficulty estimate {:.2}", original.difficulty_estimate),
        });
        uncertainties.push(UncertaintySource {
            name: "high_recovery_difficulty".into(),
            severity: original.difficulty_estimate,
            mitigations: vec!["Ask the user to validate the recovered content".into()],
        });
    }
    if coverage < 0.5 {
        uncertainties.push(UncertaintySource {
            name: "sparse_cue_coverage".into(),
            severity: 1.0 - coverage,
            mitigations: vec!["Supply additional associative or contextual cues".into()],
        });
    }

    let base = (content_accuracy + completeness) / 2.0;
    let adjustment: f64 = factors.iter().map(|f| f.impact).sum();

    RecoveryConfidenceAssessment {
        overall_confidence: (base + adjustment).clamp(0.1, 1.0),
        content_accuracy,
        completeness,
        reliability_factors: factors,
        uncertainty_sources: uncertainties,
    }
}

/// Share of preserved fingerprint elements the evidence refers to.
fn fingerprint_coverage(recovered: &RecoveredContent, original: &RecoveryMetadata) -> f64 {
    let fp = &original.association_fingerprint;
    let preserved: Vec<&String> = fp
        .strong_associations
        .iter()
        .chain(&fp.semantic_clusters)
        .chain(&fp.contextual_tags)
        .collect();
    if preserved.is_empty() {
        return NEUTRAL;
    }
    let evidence = recovered.evidence.elements();
    let covered = preserved
        .iter()
        .filter(|p| evidence.contains(&p.as_str()))
        .count();
    covered as f64 / preserved.len() as f64
}

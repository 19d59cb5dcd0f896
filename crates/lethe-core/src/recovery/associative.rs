//! Recovery through associative links.

use async_trait::async_trait;

use super::error::RecoveryResult;
use super::strategy::{cues_of, summary_or, RecoveryStrategy};
use super::types::{
    CueType, RecoveredContent, RecoveryAttempt, RecoveryCue, RecoveryEvidence, RecoveryMetadata,
};

const CEILING: f64 = 0.9;
const SUCCESS_THRESHOLD: f64 = 0.3;
const FULL_RECOVERY_CONFIDENCE: f64 = 0.7;

/// Confidence grows with associative cues and preserved strong associations.
#[derive(Debug, Clone, Default)]
pub struct AssociativeStrategy;

impl AssociativeStrategy {
    pub const NAME: &'static str = "associative";

    fn confidence(associative_cues: usize, strong_associations: usize) -> f64 {
        (0.35 * associative_cues as f64 + 0.1 * strong_associations as f64).min(CEILING)
    }
}

fn strong_associations(metadata: Option<&RecoveryMetadata>) -> &[String] {
    metadata
        .map(|m| m.association_fingerprint.strong_associations.as_slice())
        .unwrap_or(&[])
}

#[async_trait]
impl RecoveryStrategy for AssociativeStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn estimate_probability(
        &self,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
    ) -> f64 {
        let associative = cues_of(cues, CueType::Associative).len();
        if associative == 0 {
            return 0.1;
        }
        let strong = strong_associations(metadata).len();
        (0.3 + 0.1 * associative as f64 + 0.05 * strong as f64).min(CEILING)
    }

    async fn recover(
        &self,
        _memory_id: &str,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
    ) -> RecoveryResult<RecoveryAttempt> {
        let associative = cues_of(cues, CueType::Associative);
        let strong = strong_associations(metadata);
        let confidence = Self::confidence(associative.len(), strong.len());
        let success = !associative.is_empty() && confidence >= SUCCESS_THRESHOLD;

        if !success {
            let mut attempt = RecoveryAttempt::failed(
                Self::NAME,
                format!("{} associative cues were not enough", associative.len()),
            );
            attempt.confidence = confidence;
            attempt.missing_elements = vec!["content".into(), "associations".into()];
            return Ok(attempt);
        }

        let mut associations_used: Vec<String> =
            associative.iter().map(|c| c.value.clone()).collect();
        for link in strong {
            if !associations_used.contains(link) {
                associations_used.push(link.clone());
            }
        }
        let partial = confidence < FULL_RECOVERY_CONFIDENCE;

        Ok(RecoveryAttempt {
            strategy: Self::NAME.to_string(),
            success,
            confidence,
            partial,
            recovered_elements: vec!["content".into(), "associations".into()],
            missing_elements: if partial {
                vec!["context".into()]
            } else {
                Vec::new()
            },
            recovered_content: Some(RecoveredContent {
                summary: summary_or(
                    metadata,
                    format!("reconstructed from {} associations", associations_used.len()),
                ),
                evidence: RecoveryEvidence::Associative { associations_used },
            }),
            method_detail: format!(
                "{} associative cues, {} strong associations",
                associative.len(),
                strong.len()
            ),
            elapsed_ms: 0,
        })
    }
}

//! Recovery by matching semantic schemas and surrounding context.

use async_trait::async_trait;

use super::error::RecoveryResult;
use super::strategy::{cues_of, summary_or, RecoveryStrategy};
use super::types::{
    CueType, RecoveredContent, RecoveryAttempt, RecoveryCue, RecoveryEvidence, RecoveryMetadata,
};

const CEILING: f64 = 0.85;
const SUCCESS_THRESHOLD: f64 = 0.4;
const FULL_RECOVERY_CONFIDENCE: f64 = 0.7;

/// Confidence grows with semantic and contextual cues.
#[derive(Debug, Clone, Default)]
pub struct SchemaBasedStrategy;

impl SchemaBasedStrategy {
    pub const NAME: &'static str = "schema_based";
}

#[async_trait]
impl RecoveryStrategy for SchemaBasedStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn estimate_probability(
        &self,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
    ) -> f64 {
        let semantic = cues_of(cues, CueType::Semantic).len();
        let contextual = cues_of(cues, CueType::Contextual).len();
        if semantic + contextual == 0 {
            return 0.1;
        }
        let clusters = metadata
            .map(|m| m.association_fingerprint.semantic_clusters.len())
            .unwrap_or(0);
        (0.2 + 0.1 * semantic as f64 + 0.1 * contextual as f64 + 0.05 * clusters as f64)
            .min(CEILING)
    }

    async fn recover(
        &self,
        _memory_id: &str,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
    ) -> RecoveryResult<RecoveryAttempt> {
        let semantic = cues_of(cues, CueType::Semantic);
        let contextual = cues_of(cues, CueType::Contextual);
        let confidence =
            (0.25 * semantic.len() as f64 + 0.2 * contextual.len() as f64).min(CEILING);

        if confidence < SUCCESS_THRESHOLD {
            let mut attempt = RecoveryAttempt::failed(
                Self::NAME,
                format!(
                    "schema match below threshold ({} semantic, {} contextual cues)",
                    semantic.len(),
                    contextual.len()
                ),
            );
            attempt.confidence = confidence;
            attempt.missing_elements = vec!["content".into(), "schema".into()];
            return Ok(attempt);
        }

        let mut schema_elements: Vec<String> = semantic.iter().map(|c| c.value.clone()).collect();
        if let Some(meta) = metadata {
            for cluster in &meta.association_fingerprint.semantic_clusters {
                if !schema_elements.contains(cluster) {
                    schema_elements.push(cluster.clone());
                }
            }
        }
        let context_elements: Vec<String> = contextual.iter().map(|c| c.value.clone()).collect();

        let mut recovered_elements = vec!["content".to_string(), "schema".to_string()];
        let mut missing_elements = Vec::new();
        if context_elements.is_empty() {
            missing_elements.push("context".to_string());
        } else {
            recovered_elements.push("context".to_string());
        }

        Ok(RecoveryAttempt {
            strategy: Self::NAME.to_string(),
            success: true,
            confidence,
            partial: confidence < FULL_RECOVERY_CONFIDENCE,
            recovered_elements,
            missing_elements,
            recovered_content: Some(RecoveredContent {
                summary: summary_or(
                    metadata,
                    format!("reconstructed from schema {}", schema_elements.join(", ")),
                ),
                evidence: RecoveryEvidence::Schema {
                    schema_elements,
                    context_elements,
                },
            }),
            method_detail: format!(
                "{} semantic cues, {} contextual cues",
                semantic.len(),
                contextual.len()
            ),
            elapsed_ms: 0,
        })
    }
}

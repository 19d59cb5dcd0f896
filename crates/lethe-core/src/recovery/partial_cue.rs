//! Recovery from whatever fragments remain, regardless of cue type.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::RecoveryResult;
use super::strategy::{summary_or, RecoveryStrategy};
use super::types::{
    RecoveredContent, RecoveryAttempt, RecoveryCue, RecoveryEvidence, RecoveryMetadata,
};

const CEILING: f64 = 0.8;
const SUCCESS_THRESHOLD: f64 = 0.3;

/// How the strengths of usable cues are folded into one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationPolicy {
    /// Strength-weighted mean, `Σs² / Σs`
    #[default]
    WeightedMean,
    Max,
    /// Plain mean, only when more than two cues agree
    Consensus,
}

impl CombinationPolicy {
    pub fn combine(&self, strengths: &[f64]) -> f64 {
        if strengths.is_empty() {
            return 0.0;
        }
        match self {
            CombinationPolicy::WeightedMean => {
                let total: f64 = strengths.iter().sum();
                if total <= 0.0 {
                    0.0
                } else {
                    strengths.iter().map(|s| s * s).sum::<f64>() / total
                }
            }
            CombinationPolicy::Max => strengths.iter().copied().fold(0.0, f64::max),
            CombinationPolicy::Consensus => {
                if strengths.len() > 2 {
                    strengths.iter().sum::<f64>() / strengths.len() as f64
                } else {
                    0.0
                }
            }
        }
    }
}

/// Attenuation applied to old memories: linear from 1.0 at creation down to
/// 0.5 at one year, flat afterwards.
pub fn temporal_decay_factor(age_days: f64) -> f64 {
    (1.0 - 0.5 * age_days.max(0.0) / 365.0).max(0.5)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialCueConfig {
    /// Cues weaker than this are ignored
    pub min_strength: f64,
    pub combination: CombinationPolicy,
    pub temporal_decay: bool,
}

impl Default for PartialCueConfig {
    fn default() -> Self {
        Self {
            min_strength: 0.3,
            combination: CombinationPolicy::WeightedMean,
            temporal_decay: true,
        }
    }
}

/// Combines usable cue strengths; any success is reported as partial.
#[derive(Debug, Clone, Default)]
pub struct PartialCueStrategy {
    config: PartialCueConfig,
}

impl PartialCueStrategy {
    pub const NAME: &'static str = "partial_cue";

    pub fn new(config: PartialCueConfig) -> Self {
        Self { config }
    }

    fn usable<'a>(&self, cues: &'a [RecoveryCue]) -> Vec<&'a RecoveryCue> {
        cues.iter()
            .filter(|c| c.strength >= self.config.min_strength)
            .collect()
    }

    fn combined_strength(&self, usable: &[&RecoveryCue], metadata: Option<&RecoveryMetadata>) -> f64 {
        let strengths: Vec<f64> = usable.iter().map(|c| c.strength).collect();
        let mut combined = self.config.combination.combine(&strengths);
        if self.config.temporal_decay {
            if let Some(age) = metadata.and_then(|m| m.age_days(Utc::now())) {
                combined *= temporal_decay_factor(age);
            }
        }
        combined
    }
}

#[async_trait]
impl RecoveryStrategy for PartialCueStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn estimate_probability(
        &self,
        cues: &[RecoveryCue],
        _metadata: Option<&RecoveryMetadata>,
    ) -> f64 {
        let usable = self.usable(cues).len();
        if usable == 0 {
            return 0.05;
        }
        (0.2 + 0.1 * usable as f64).min(CEILING)
    }

    async fn recover(
        &self,
        _memory_id: &str,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
    ) -> RecoveryResult<RecoveryAttempt> {
        let usable = self.usable(cues);
        let combined_strength = self.combined_strength(&usable, metadata);
        let confidence = (combined_strength * 0.8).min(CEILING);

        if usable.is_empty() || confidence < SUCCESS_THRESHOLD {
            let mut attempt = RecoveryAttempt::failed(
                Self::NAME,
                format!(
                    "{} of {} cues usable, combined strength {combined_strength:.2}",
                    usable.len(),
                    cues.len()
                ),
            );
            attempt.confidence = confidence;
            attempt.missing_elements = vec!["content".into()];
            return Ok(attempt);
        }

        let cue_values: Vec<String> = usable.iter().map(|c| c.value.clone()).collect();
        Ok(RecoveryAttempt {
            strategy: Self::NAME.to_string(),
            success: true,
            confidence,
            partial: true,
            recovered_elements: vec!["content_fragments".into()],
            missing_elements: vec!["complete_content".into()],
            recovered_content: Some(RecoveredContent {
                summary: summary_or(metadata, format!("fragments: {}", cue_values.join(", "))),
                evidence: RecoveryEvidence::PartialCue {
                    cue_values,
                    combined_strength,
                },
            }),
            method_detail: format!(
                "{:?} over {} cues, combined strength {combined_strength:.2}",
                self.config.combination,
                usable.len()
            ),
            elapsed_ms: 0,
        })
    }
}

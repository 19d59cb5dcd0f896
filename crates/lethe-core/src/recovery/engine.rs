//! Recovery engine: ranks registered strategies, invokes them in order under
//! an attempt cap and a wall-clock budget, and keeps rolling statistics.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::assessment::{assess_quality, assess_recovery_confidence};
use super::associative::AssociativeStrategy;
use super::error::{RecoveryError, RecoveryResult};
use super::partial_cue::PartialCueStrategy;
use super::schema_based::SchemaBasedStrategy;
use super::strategy::RecoveryStrategy;
use super::types::{
    clamp_unit, EnhancedRecoveryResult, FailurePattern, ImprovementTrend, QualityAssessment,
    RecoveredContent, RecoveryAttempt, RecoveryConfidenceAssessment, RecoveryCue,
    RecoveryMetadata, RecoveryStatistics, StrategyStats, TrendDirection, UserValidation,
};
use crate::metrics::METRICS;
use crate::obs;

/// Ranking probability used for every strategy when no metadata is supplied.
pub const DEFAULT_PROBABILITY: f64 = 0.5;
/// Weight of a strategy's own estimate once it has tracked history.
const ESTIMATE_WEIGHT: f64 = 0.8;
/// Smoothing factor of the per-strategy success rate.
const SUCCESS_RATE_ALPHA: f64 = 0.2;
const VALIDATION_BOOST: f64 = 0.1;
const IMPROVING_RATE: f64 = 0.6;
const DECLINING_RATE: f64 = 0.4;
const FAILURE_PATTERN_RATE: f64 = 0.3;

/// Request-scoped tunables for the recovery engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub max_recovery_attempts: usize,
    /// Combined confidence a result needs to count as confident.
    pub confidence_threshold: f64,
    pub enable_strategy_learning: bool,
    pub enable_quality_assessment: bool,
    /// Hard wall-clock budget for one `attempt_recovery` call.
    pub recovery_timeout_ms: u64,
    /// Stop invoking strategies once an attempt is strictly above this.
    pub early_exit_confidence: f64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_recovery_attempts: 3,
            confidence_threshold: 0.6,
            enable_strategy_learning: true,
            enable_quality_assessment: true,
            recovery_timeout_ms: 5_000,
            early_exit_confidence: 0.9,
        }
    }
}

#[derive(Default)]
struct EngineState {
    /// Registration order is the ranking tie-break.
    strategies: Vec<Arc<dyn RecoveryStrategy>>,
    strategy_stats: HashMap<String, StrategyStats>,
    stats: RecoveryStatistics,
    recovery_history: HashMap<String, Vec<RecoveryAttempt>>,
    validation_history: HashMap<String, Vec<UserValidation>>,
}

/// Owns the strategy registry, per-memory histories, and rolling statistics.
///
/// All shared state sits behind one lock that is never held across a
/// strategy call.
pub struct RecoveryEngine {
    config: RecoveryConfig,
    state: Mutex<EngineState>,
}

impl RecoveryEngine {
    /// Engine with the associative, schema-based, and partial-cue strategies
    /// registered in that order.
    pub fn new(config: RecoveryConfig) -> Self {
        let defaults: [Arc<dyn RecoveryStrategy>; 3] = [
            Arc::new(AssociativeStrategy),
            Arc::new(SchemaBasedStrategy),
            Arc::new(PartialCueStrategy::default()),
        ];
        let mut state = EngineState::default();
        for strategy in defaults {
            register(&mut state, strategy);
        }
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// Engine with no strategies registered.
    pub fn empty(config: RecoveryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Register a strategy. A strategy with the same name is replaced in
    /// place and its tracking slot reset.
    pub async fn add_recovery_strategy(&self, strategy: Arc<dyn RecoveryStrategy>) {
        let mut state = self.state.lock().await;
        register(&mut state, strategy);
    }

    /// Returns whether a strategy with that name was registered.
    pub async fn remove_recovery_strategy(&self, name: &str) -> bool {
        let mut state = self.state.lock().await;
        let before = state.strategies.len();
        state.strategies.retain(|s| s.name() != name);
        state.strategy_stats.remove(name);
        state.stats.strategy_success_rates.remove(name);
        state.strategies.len() != before
    }

    /// Registered strategy names in registration order.
    pub async fn strategy_names(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.strategies.iter().map(|s| s.name().to_string()).collect()
    }

    pub async fn strategy_stats(&self, name: &str) -> Option<StrategyStats> {
        self.state.lock().await.strategy_stats.get(name).copied()
    }

    /// Attempts from the most recent recovery of `memory_id`.
    pub async fn recovery_history(&self, memory_id: &str) -> Vec<RecoveryAttempt> {
        let state = self.state.lock().await;
        state
            .recovery_history
            .get(memory_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn validation_history(&self, memory_id: &str) -> Vec<UserValidation> {
        let state = self.state.lock().await;
        state
            .validation_history
            .get(memory_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Try to reconstruct a memory from cues and optional preserved metadata.
    ///
    /// Strategies are ranked by estimated probability (ties keep registration
    /// order) and invoked one at a time until the attempt cap is reached, an
    /// attempt is confident enough, or the time budget runs out. A strategy
    /// error becomes a failed attempt instead of failing the request.
    ///
    /// # Errors
    ///
    /// Returns `RecoveryError::EmptyCues` if `cues` is empty.
    #[instrument(skip(self, cues, metadata), fields(cues = cues.len()))]
    pub async fn attempt_recovery(
        &self,
        memory_id: &str,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
    ) -> RecoveryResult<EnhancedRecoveryResult> {
        if cues.is_empty() {
            return Err(RecoveryError::EmptyCues);
        }
        METRICS.inc_recovery_requests();

        let started = Instant::now();
        let budget = Duration::from_millis(self.config.recovery_timeout_ms);
        let deadline = started + budget;

        let (strategies, learned_rates) = {
            let state = self.state.lock().await;
            let learned: HashMap<String, f64> = state
                .strategy_stats
                .iter()
                .filter(|(_, s)| s.invocations > 0)
                .map(|(name, s)| (name.clone(), s.success_rate))
                .collect();
            (state.strategies.clone(), learned)
        };
        let mut timed_out = false;
        let ranked = match tokio::time::timeout_at(
            deadline,
            rank(strategies, cues, metadata, &learned_rates),
        )
        .await
        {
            Ok(ranked) => ranked,
            Err(_) => {
                warn!("probability estimation exceeded the recovery budget");
                timed_out = true;
                Vec::new()
            }
        };

        let mut attempts: Vec<RecoveryAttempt> = Vec::new();
        for (strategy, probability) in ranked {
            if attempts.len() >= self.config.max_recovery_attempts {
                break;
            }
            if Instant::now() >= deadline {
                timed_out = true;
                break;
            }

            let name = strategy.name().to_string();
            debug!(strategy = %name, probability, "invoking strategy");
            let invoked = Instant::now();
            let outcome =
                tokio::time::timeout_at(deadline, strategy.recover(memory_id, cues, metadata))
                    .await;
            let elapsed_ms = invoked.elapsed().as_millis() as u64;

            let mut attempt = match outcome {
                Ok(Ok(attempt)) => attempt.normalized(),
                Ok(Err(err)) => {
                    METRICS.inc_strategy_failures();
                    obs::emit_strategy_failed(memory_id, &name, &err);
                    RecoveryAttempt::failed(name, err.to_string())
                }
                Err(_) => {
                    timed_out = true;
                    RecoveryAttempt::failed(name, "timeout")
                }
            };
            attempt.elapsed_ms = elapsed_ms;
            let confident =
                attempt.success && attempt.confidence > self.config.early_exit_confidence;
            attempts.push(attempt);

            if timed_out || confident {
                break;
            }
        }
        if timed_out {
            obs::emit_recovery_timeout(memory_id, self.config.recovery_timeout_ms, attempts.len());
        }

        let result = self.combine(memory_id, cues, metadata, attempts, timed_out, started);

        let mut state = self.state.lock().await;
        record_attempts(&mut state, &result);
        state
            .recovery_history
            .insert(memory_id.to_string(), result.attempts.clone());
        drop(state);

        if result.success {
            METRICS.inc_recoveries_succeeded();
        }
        obs::emit_recovery_completed(
            memory_id,
            result.success,
            result.combined_confidence,
            result.attempts.len(),
            result.duration_ms,
        );
        Ok(result)
    }

    fn combine(
        &self,
        memory_id: &str,
        cues: &[RecoveryCue],
        metadata: Option<&RecoveryMetadata>,
        attempts: Vec<RecoveryAttempt>,
        timed_out: bool,
        started: Instant,
    ) -> EnhancedRecoveryResult {
        let successful: Vec<&RecoveryAttempt> = attempts.iter().filter(|a| a.success).collect();
        let combined_confidence = if successful.is_empty() {
            0.0
        } else {
            successful.iter().map(|a| a.confidence).sum::<f64>() / successful.len() as f64
        };
        // First maximal attempt wins on equal confidence.
        let best = successful.iter().copied().fold(None, |best: Option<&RecoveryAttempt>, a| {
            match best {
                Some(b) if b.confidence >= a.confidence => Some(b),
                _ => Some(a),
            }
        });

        let recovered_content: Option<RecoveredContent> =
            best.and_then(|b| b.recovered_content.clone());
        let quality = match (best, &recovered_content) {
            (Some(b), Some(_)) if self.config.enable_quality_assessment => {
                assess_quality(b, cues, metadata)
            }
            _ => QualityAssessment::neutral(),
        };

        EnhancedRecoveryResult {
            memory_id: memory_id.to_string(),
            success: best.is_some(),
            recovered_content,
            combined_confidence,
            meets_confidence_threshold: best.is_some()
                && combined_confidence >= self.config.confidence_threshold,
            recovery_method: best
                .map(|b| b.strategy.clone())
                .unwrap_or_else(|| "none".to_string()),
            partial_recovery: attempts.iter().any(|a| a.partial),
            quality,
            timed_out,
            duration_ms: started.elapsed().as_millis() as u64,
            attempts,
        }
    }

    /// Score recovered content against the metadata preserved before it
    /// was degraded.
    pub fn assess_recovery_confidence(
        &self,
        recovered: &RecoveredContent,
        original: &RecoveryMetadata,
    ) -> RecoveryConfidenceAssessment {
        assess_recovery_confidence(recovered, original)
    }

    /// Record how a recovery result turned out.
    ///
    /// Validation is appended to the memory's history. Confirmed-accurate
    /// validations nudge the winning strategy's success rate when learning
    /// is enabled.
    #[instrument(skip(self, result, validation), fields(success = result.success))]
    pub async fn track_recovery_success(
        &self,
        memory_id: &str,
        result: &EnhancedRecoveryResult,
        validation: Option<UserValidation>,
    ) {
        let mut state = self.state.lock().await;

        if let Some(validation) = validation {
            if self.config.enable_strategy_learning && validation.accurate && result.success {
                let rating = validation.accuracy_rating;
                if let Some(slot) = state.strategy_stats.get_mut(&result.recovery_method) {
                    slot.success_rate = (slot.success_rate + VALIDATION_BOOST * rating).min(1.0);
                    let rate = slot.success_rate;
                    state
                        .stats
                        .strategy_success_rates
                        .insert(result.recovery_method.clone(), rate);
                }
            }
            state
                .validation_history
                .entry(memory_id.to_string())
                .or_default()
                .push(validation);
        }

        let stats = &mut state.stats;
        if !result.success {
            stats.failed_recoveries += 1;
        } else if result.partial_recovery {
            stats.partial_recoveries += 1;
        } else {
            stats.successful_recoveries += 1;
        }
        let n = stats.tracked() as f64;
        stats.average_confidence =
            (stats.average_confidence * (n - 1.0) + result.combined_confidence) / n;
    }

    /// Current totals with freshly derived trends and failure patterns.
    pub async fn get_recovery_statistics(&self) -> RecoveryStatistics {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.improvement_trends = improvement_trends(&stats);
        stats.failure_patterns = failure_patterns(&stats);
        stats
    }

    /// Clear statistics and histories; registered strategies stay and their
    /// tracking slots are zeroed.
    pub async fn reset_statistics(&self) {
        let mut state = self.state.lock().await;
        state.stats = RecoveryStatistics::default();
        state.recovery_history.clear();
        state.validation_history.clear();
        let names: Vec<String> = state.strategies.iter().map(|s| s.name().to_string()).collect();
        for name in names {
            state.strategy_stats.insert(name.clone(), StrategyStats::default());
            state.stats.strategy_success_rates.insert(name, 0.0);
        }
    }
}

fn register(state: &mut EngineState, strategy: Arc<dyn RecoveryStrategy>) {
    let name = strategy.name().to_string();
    match state.strategies.iter().position(|s| s.name() == name) {
        Some(idx) => state.strategies[idx] = strategy,
        None => state.strategies.push(strategy),
    }
    state.strategy_stats.insert(name.clone(), StrategyStats::default());
    state.stats.strategy_success_rates.insert(name, 0.0);
}

/// Estimates run concurrently and are clamped to the unit range; the sort is
/// stable so ties keep registration order.
async fn rank(
    strategies: Vec<Arc<dyn RecoveryStrategy>>,
    cues: &[RecoveryCue],
    metadata: Option<&RecoveryMetadata>,
    learned_rates: &HashMap<String, f64>,
) -> Vec<(Arc<dyn RecoveryStrategy>, f64)> {
    let probabilities: Vec<f64> = match metadata {
        None => vec![DEFAULT_PROBABILITY; strategies.len()],
        Some(meta) => {
            let estimates =
                join_all(strategies.iter().map(|s| s.estimate_probability(cues, Some(meta))))
                    .await;
            strategies
                .iter()
                .zip(estimates)
                .map(|(s, estimate)| {
                    let estimate = clamp_unit(estimate);
                    match learned_rates.get(s.name()) {
                        Some(rate) => ESTIMATE_WEIGHT * estimate + (1.0 - ESTIMATE_WEIGHT) * rate,
                        None => estimate,
                    }
                })
                .collect()
        }
    };

    let mut ranked: Vec<_> = strategies.into_iter().zip(probabilities).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

fn record_attempts(state: &mut EngineState, result: &EnhancedRecoveryResult) {
    let stats = &mut state.stats;
    stats.total_recoveries += 1;
    let n = stats.total_recoveries as f64;
    stats.average_latency_ms =
        (stats.average_latency_ms * (n - 1.0) + result.duration_ms as f64) / n;

    for attempt in &result.attempts {
        let Some(slot) = state.strategy_stats.get_mut(&attempt.strategy) else {
            // Removed while the request was in flight.
            continue;
        };
        let outcome = if attempt.success { 1.0 } else { 0.0 };
        slot.success_rate = if slot.invocations == 0 {
            outcome
        } else {
            slot.success_rate + SUCCESS_RATE_ALPHA * (outcome - slot.success_rate)
        };
        slot.invocations += 1;
        if attempt.success {
            slot.successes += 1;
        }
        state
            .stats
            .strategy_success_rates
            .insert(attempt.strategy.clone(), slot.success_rate);
    }
}

fn success_rate(stats: &RecoveryStatistics) -> Option<f64> {
    let tracked = stats.tracked();
    (tracked > 0).then(|| {
        (stats.successful_recoveries + stats.partial_recoveries) as f64 / tracked as f64
    })
}

fn improvement_trends(stats: &RecoveryStatistics) -> Vec<ImprovementTrend> {
    let Some(rate) = success_rate(stats) else {
        return Vec::new();
    };
    let direction = if rate >= IMPROVING_RATE {
        TrendDirection::Improving
    } else if rate <= DECLINING_RATE {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };
    vec![ImprovementTrend {
        metric: "success_rate".to_string(),
        direction,
        value: rate,
    }]
}

fn failure_patterns(stats: &RecoveryStatistics) -> Vec<FailurePattern> {
    let Some(rate) = success_rate(stats) else {
        return Vec::new();
    };
    let failure_rate = 1.0 - rate;
    if failure_rate <= FAILURE_PATTERN_RATE {
        return Vec::new();
    }
    vec![FailurePattern {
        description: "high overall recovery failure rate".to_string(),
        frequency: failure_rate,
        suggested_causes: vec![
            "Insufficient recovery cues".to_string(),
            "Heavily degraded memories".to_string(),
        ],
        suggested_improvements: vec![
            "Preserve richer association fingerprints before degrading".to_string(),
            "Collect more cue types from the user".to_string(),
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::types::CueType;
    use async_trait::async_trait;

    struct Fixed {
        name: &'static str,
        estimate: f64,
        confidence: f64,
    }

    #[async_trait]
    impl RecoveryStrategy for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn estimate_probability(
            &self,
            _cues: &[RecoveryCue],
            _metadata: Option<&RecoveryMetadata>,
        ) -> f64 {
            self.estimate
        }

        async fn recover(
            &self,
            _memory_id: &str,
            _cues: &[RecoveryCue],
            _metadata: Option<&RecoveryMetadata>,
        ) -> RecoveryResult<RecoveryAttempt> {
            Ok(RecoveryAttempt {
                success: self.confidence > 0.0,
                confidence: self.confidence,
                recovered_elements: vec!["content".into()],
                missing_elements: vec![],
                ..RecoveryAttempt::failed(self.name, "fixed")
            })
        }
    }

    fn fixed(name: &'static str, estimate: f64, confidence: f64) -> Arc<dyn RecoveryStrategy> {
        Arc::new(Fixed {
            name,
            estimate,
            confidence,
        })
    }

    fn cue() -> Vec<RecoveryCue> {
        vec![RecoveryCue::new(CueType::Associative, "x", 0.9)]
    }

    #[tokio::test]
    async fn default_engine_registers_three_strategies() {
        let engine = RecoveryEngine::new(RecoveryConfig::default());
        assert_eq!(
            engine.strategy_names().await,
            vec!["associative", "schema_based", "partial_cue"]
        );
        assert_eq!(
            engine.strategy_stats("associative").await,
            Some(StrategyStats::default())
        );
    }

    #[tokio::test]
    async fn ranking_follows_estimates_with_metadata() {
        let engine = RecoveryEngine::empty(RecoveryConfig {
            max_recovery_attempts: 1,
            ..RecoveryConfig::default()
        });
        engine.add_recovery_strategy(fixed("low", 0.2, 0.5)).await;
        engine.add_recovery_strategy(fixed("high", 0.8, 0.5)).await;

        let meta = RecoveryMetadata::default();
        let result = engine.attempt_recovery("m1", &cue(), Some(&meta)).await.unwrap();
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(result.attempts[0].strategy, "high");
    }

    #[tokio::test]
    async fn ties_keep_registration_order_without_metadata() {
        let engine = RecoveryEngine::empty(RecoveryConfig {
            max_recovery_attempts: 1,
            ..RecoveryConfig::default()
        });
        engine.add_recovery_strategy(fixed("first", 0.1, 0.5)).await;
        engine.add_recovery_strategy(fixed("second", 0.9, 0.5)).await;

        let result = engine.attempt_recovery("m1", &cue(), None).await.unwrap();
        assert_eq!(result.attempts[0].strategy, "first");
    }

    #[tokio::test]
    async fn learned_rate_blends_into_ranking() {
        let engine = RecoveryEngine::empty(RecoveryConfig {
            max_recovery_attempts: 1,
            ..RecoveryConfig::default()
        });
        engine.add_recovery_strategy(fixed("a", 0.55, 0.0)).await;
        engine.add_recovery_strategy(fixed("b", 0.5, 0.6)).await;
        let meta = RecoveryMetadata::default();

        // "a" wins on its estimate, fails, and its tracked rate drops to 0.
        let first = engine.attempt_recovery("m1", &cue(), Some(&meta)).await.unwrap();
        assert_eq!(first.attempts[0].strategy, "a");
        assert_eq!(engine.strategy_stats("a").await.unwrap().success_rate, 0.0);

        // 0.8 * 0.55 = 0.44 now ranks below b's untracked 0.5.
        let second = engine.attempt_recovery("m1", &cue(), Some(&meta)).await.unwrap();
        assert_eq!(second.attempts[0].strategy, "b");
    }

    #[tokio::test]
    async fn replacing_a_strategy_keeps_its_position() {
        let engine = RecoveryEngine::new(RecoveryConfig::default());
        engine
            .add_recovery_strategy(fixed("schema_based", 0.5, 0.5))
            .await;
        assert_eq!(
            engine.strategy_names().await,
            vec!["associative", "schema_based", "partial_cue"]
        );
        assert!(engine.remove_recovery_strategy("schema_based").await);
        assert!(!engine.remove_recovery_strategy("schema_based").await);
        assert!(engine.strategy_stats("schema_based").await.is_none());
    }

    #[tokio::test]
    async fn validation_nudges_winning_strategy() {
        let engine = RecoveryEngine::empty(RecoveryConfig::default());
        engine.add_recovery_strategy(fixed("only", 0.5, 0.5)).await;
        let result = engine.attempt_recovery("m1", &cue(), None).await.unwrap();
        assert_eq!(engine.strategy_stats("only").await.unwrap().success_rate, 1.0);

        // Force a lower rate to observe the nudge.
        {
            let mut state = engine.state.lock().await;
            state.strategy_stats.get_mut("only").unwrap().success_rate = 0.5;
        }
        engine
            .track_recovery_success("m1", &result, Some(UserValidation::new(true, 0.8)))
            .await;
        let rate = engine.strategy_stats("only").await.unwrap().success_rate;
        assert!((rate - 0.58).abs() < 1e-9);
        assert_eq!(engine.validation_history("m1").await.len(), 1);
    }

    #[tokio::test]
    async fn learning_disabled_leaves_rate_alone() {
        let engine = RecoveryEngine::empty(RecoveryConfig {
            enable_strategy_learning: false,
            ..RecoveryConfig::default()
        });
        engine.add_recovery_strategy(fixed("only", 0.5, 0.5)).await;
        let result = engine.attempt_recovery("m1", &cue(), None).await.unwrap();
        engine
            .track_recovery_success("m1", &result, Some(UserValidation::new(true, 1.0)))
            .await;
        assert_eq!(engine.strategy_stats("only").await.unwrap().success_rate, 1.0);
        assert_eq!(engine.validation_history("m1").await.len(), 1);
    }

    #[tokio::test]
    async fn reset_clears_statistics_and_history() {
        let engine = RecoveryEngine::empty(RecoveryConfig::default());
        engine.add_recovery_strategy(fixed("only", 0.5, 0.5)).await;
        let result = engine.attempt_recovery("m1", &cue(), None).await.unwrap();
        engine.track_recovery_success("m1", &result, None).await;

        engine.reset_statistics().await;
        let stats = engine.get_recovery_statistics().await;
        assert_eq!(stats.total_recoveries, 0);
        assert_eq!(stats.tracked(), 0);
        assert!(stats.improvement_trends.is_empty());
        assert!(engine.recovery_history("m1").await.is_empty());
        assert_eq!(engine.strategy_names().await, vec!["only"]);
    }

    #[test]
    fn trend_thresholds() {
        let mut stats = RecoveryStatistics {
            successful_recoveries: 6,
            failed_recoveries: 4,
            ..RecoveryStatistics::default()
        };
        assert_eq!(
            improvement_trends(&stats)[0].direction,
            TrendDirection::Improving
        );
        assert_eq!(failure_patterns(&stats).len(), 1);

        stats.successful_recoveries = 4;
        stats.failed_recoveries = 6;
        assert_eq!(
            improvement_trends(&stats)[0].direction,
            TrendDirection::Declining
        );

        stats.successful_recoveries = 5;
        stats.failed_recoveries = 5;
        assert_eq!(improvement_trends(&stats)[0].direction, TrendDirection::Stable);

        stats.successful_recoveries = 8;
        stats.failed_recoveries = 2;
        assert!(failure_patterns(&stats).is_empty());
    }
}

//! Post-execution impact estimation.
//!
//! Nothing here measures a real memory store yet. The default estimator
//! draws plausible figures at random and is therefore non-deterministic;
//! swap in a real instrumentation hook through [`ImpactEstimator`] once one
//! exists, or use [`FixedImpactEstimator`] where repeatability matters.

use lethe_state::{ActualImpact, AuditEntry, ForgettingAction};
use rand::Rng;

/// Produces the "actual impact" attached to an executed audit entry.
pub trait ImpactEstimator: Send + Sync {
    fn estimate(&self, entry: &AuditEntry) -> ActualImpact;
}

/// Random placeholder estimator.
///
/// Space freed scales with the content summary length; degrade actions free
/// half as much as deletes. Every other figure is drawn uniformly.
#[derive(Debug, Clone, Default)]
pub struct SimulatedImpactEstimator;

impl ImpactEstimator for SimulatedImpactEstimator {
    fn estimate(&self, entry: &AuditEntry) -> ActualImpact {
        let mut rng = rand::thread_rng();
        let base = (entry.content_summary.len() as u64).max(1) * rng.gen_range(8..64);
        let space_freed_bytes = match entry.decision.action {
            ForgettingAction::Degrade => base / 2,
            ForgettingAction::Suppress => 0,
            ForgettingAction::Delete | ForgettingAction::Archive => base,
        };
        ActualImpact {
            space_freed_bytes,
            latency_improvement_ms: rng.gen_range(0.0..10.0),
            interference_reduction: rng.gen_range(0.0..0.3),
            focus_improvement: rng.gen_range(0.0..0.2),
            user_satisfaction: rng.gen_range(0.6..1.0),
        }
    }
}

/// Returns the same impact for every entry.
#[derive(Debug, Clone)]
pub struct FixedImpactEstimator(pub ActualImpact);

impl ImpactEstimator for FixedImpactEstimator {
    fn estimate(&self, _entry: &AuditEntry) -> ActualImpact {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lethe_state::{
        AuditId, ExecutionMethod, ForgettingDecision, ForgettingEvaluation, MemoryType,
        NewAuditEntry, PrivacyLevel,
    };

    fn entry(action: ForgettingAction) -> AuditEntry {
        AuditEntry::open(
            AuditId::new(),
            NewAuditEntry {
                memory_id: "m1".into(),
                memory_type: MemoryType::Episodic,
                content_summary: "a fairly ordinary memory".into(),
                decision: ForgettingDecision::new("m1", action, "stale", 0.7),
                evaluation: ForgettingEvaluation::default(),
                execution_method: ExecutionMethod::Immediate,
                privacy_level: PrivacyLevel::Internal,
            },
            Utc::now(),
        )
    }

    #[test]
    fn simulated_figures_stay_in_range() {
        for _ in 0..50 {
            let impact = SimulatedImpactEstimator.estimate(&entry(ForgettingAction::Delete));
            assert!(impact.space_freed_bytes > 0);
            assert!((0.0..10.0).contains(&impact.latency_improvement_ms));
            assert!((0.6..1.0).contains(&impact.user_satisfaction));
        }
    }

    #[test]
    fn suppress_frees_nothing() {
        let impact = SimulatedImpactEstimator.estimate(&entry(ForgettingAction::Suppress));
        assert_eq!(impact.space_freed_bytes, 0);
    }
}

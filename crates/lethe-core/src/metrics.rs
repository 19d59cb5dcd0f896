//! Global atomic counters for Lethe observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. from a periodic health check).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters. No allocations, no locking.
pub struct Metrics {
    forgetting_requests: AtomicU64,
    forgetting_executions: AtomicU64,
    forgetting_failures: AtomicU64,
    recovery_requests: AtomicU64,
    recoveries_succeeded: AtomicU64,
    strategy_failures: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            forgetting_requests: AtomicU64::new(0),
            forgetting_executions: AtomicU64::new(0),
            forgetting_failures: AtomicU64::new(0),
            recovery_requests: AtomicU64::new(0),
            recoveries_succeeded: AtomicU64::new(0),
            strategy_failures: AtomicU64::new(0),
        }
    }

    pub fn inc_forgetting_requests(&self) {
        self.forgetting_requests.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "forgetting_requests", "counter incremented");
    }

    pub fn inc_forgetting_executions(&self) {
        self.forgetting_executions.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "forgetting_executions", "counter incremented");
    }

    pub fn inc_forgetting_failures(&self) {
        self.forgetting_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "forgetting_failures", "counter incremented");
    }

    pub fn inc_recovery_requests(&self) {
        self.recovery_requests.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "recovery_requests", "counter incremented");
    }

    pub fn inc_recoveries_succeeded(&self) {
        self.recoveries_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "recoveries_succeeded", "counter incremented");
    }

    pub fn inc_strategy_failures(&self) {
        self.strategy_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "strategy_failures", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            forgetting_requests = self.forgetting_requests(),
            forgetting_executions = self.forgetting_executions(),
            forgetting_failures = self.forgetting_failures(),
            recovery_requests = self.recovery_requests(),
            recoveries_succeeded = self.recoveries_succeeded(),
            strategy_failures = self.strategy_failures(),
        );
    }

    pub fn forgetting_requests(&self) -> u64 {
        self.forgetting_requests.load(Ordering::Relaxed)
    }

    pub fn forgetting_executions(&self) -> u64 {
        self.forgetting_executions.load(Ordering::Relaxed)
    }

    pub fn forgetting_failures(&self) -> u64 {
        self.forgetting_failures.load(Ordering::Relaxed)
    }

    pub fn recovery_requests(&self) -> u64 {
        self.recovery_requests.load(Ordering::Relaxed)
    }

    pub fn recoveries_succeeded(&self) -> u64 {
        self.recoveries_succeeded.load(Ordering::Relaxed)
    }

    pub fn strategy_failures(&self) -> u64 {
        self.strategy_failures.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.forgetting_requests.store(0, Ordering::Relaxed);
        self.forgetting_executions.store(0, Ordering::Relaxed);
        self.forgetting_failures.store(0, Ordering::Relaxed);
        self.recovery_requests.store(0, Ordering::Relaxed);
        self.recoveries_succeeded.store(0, Ordering::Relaxed);
        self.strategy_failures.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let m = Metrics::new();
        assert_eq!(m.forgetting_requests(), 0);
        m.inc_forgetting_requests();
        m.inc_forgetting_requests();
        assert_eq!(m.forgetting_requests(), 2);

        m.inc_recovery_requests();
        assert_eq!(m.recovery_requests(), 1);

        m.inc_strategy_failures();
        m.inc_strategy_failures();
        m.inc_strategy_failures();
        assert_eq!(m.strategy_failures(), 3);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.inc_forgetting_executions();
        m.inc_forgetting_failures();
        m.inc_recoveries_succeeded();
        m.reset();
        assert_eq!(m.forgetting_executions(), 0);
        assert_eq!(m.forgetting_failures(), 0);
        assert_eq!(m.recoveries_succeeded(), 0);
    }
}

//! Per-run success/failure counters.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Aggregate outcome counters for one ingestion run.
///
/// Owned by the single aggregator of a dispatch; never shared between runs.
/// Invariant: `succeeded + failed == attempted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionTally {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl IngestionTally {
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }

    /// Whether every attempted row was indexed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Cooperative stop signal for a running dispatch.
///
/// Once triggered no further rows are enqueued; queued and in-flight
/// submissions are allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_conservation() {
        let mut tally = IngestionTally::default();
        tally.record_success();
        tally.record_failure();
        tally.record_success();

        assert_eq!(tally.attempted, 3);
        assert_eq!(tally.succeeded + tally.failed, tally.attempted);
        assert!(!tally.is_clean());
    }

    #[test]
    fn test_shutdown_signal_is_shared_between_clones() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();

        assert!(!clone.is_triggered());
        signal.trigger();
        assert!(clone.is_triggered());
    }
}

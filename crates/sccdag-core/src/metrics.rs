//! Operation-count instrumentation.
//!
//! Every stage of the pipeline takes a `&mut dyn Metrics` and bumps it at
//! fixed points (once per node visited, once per edge examined or relaxed).
//! The algorithms only ever write to it, so swapping [`NoopMetrics`] for
//! [`OperationCounter`] never changes a result.
//!
//! Stages do not call [`Metrics::reset`] themselves. Whoever owns the
//! counter decides whether counts accumulate across stages or not.

use std::time::Instant;

/// Sink for operation counts and elapsed time.
pub trait Metrics {
    /// Zero the operation count and restart the clock.
    fn reset(&mut self);

    /// Record one unit of work.
    fn increment_operation_count(&mut self);

    /// Operations recorded since the last reset.
    fn operation_count(&self) -> u64;

    /// Nanoseconds since the last reset (or construction).
    fn elapsed_nanos(&self) -> u64;
}

/// Metrics sink that records nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn reset(&mut self) {}

    #[inline]
    fn increment_operation_count(&mut self) {}

    fn operation_count(&self) -> u64 {
        0
    }

    fn elapsed_nanos(&self) -> u64 {
        0
    }
}

/// Counts operations and measures wall-clock time since the last reset.
#[derive(Debug, Clone)]
pub struct OperationCounter {
    operations: u64,
    started: Instant,
}

impl OperationCounter {
    /// Create a counter with zero operations and the clock started now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operations: 0,
            started: Instant::now(),
        }
    }
}

impl Default for OperationCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics for OperationCounter {
    fn reset(&mut self) {
        self.operations = 0;
        self.started = Instant::now();
    }

    #[inline]
    fn increment_operation_count(&mut self) {
        self.operations = self.operations.saturating_add(1);
    }

    fn operation_count(&self) -> u64 {
        self.operations
    }

    fn elapsed_nanos(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

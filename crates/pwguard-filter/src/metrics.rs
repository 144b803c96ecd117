//! Metrics hooks for filter operations
//!
//! Thread-safe counters for monitoring filter builds, inserts, and lookups.
//! The replica service records into one of these; external metrics systems
//! can plug in through [`MetricsRecorder`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for filter operations
#[derive(Default)]
pub struct Metrics {
    /// Total filters built (fresh, from snapshot, or from cache)
    pub filters_built: AtomicU64,
    /// Total elements inserted
    pub elements_inserted: AtomicU64,
    /// Total lookups performed
    pub lookups_performed: AtomicU64,
    /// Total positive lookups (possible members, including false positives)
    pub lookups_positive: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
    /// Cumulative insert time in nanoseconds
    pub insert_time_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a filter build.
    pub fn record_filter_built(&self, _size_bits: usize, _hash_count: usize) {
        self.filters_built.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an element insertion.
    pub fn record_insert(&self, duration: Duration) {
        self.elements_inserted.fetch_add(1, Ordering::Relaxed);
        self.insert_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a lookup and whether it reported a possible member.
    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_built: self.filters_built.load(Ordering::Relaxed),
            elements_inserted: self.elements_inserted.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            avg_lookup_ns: self.avg_lookup_time_ns(),
            avg_insert_ns: self.avg_insert_time_ns(),
        }
    }

    /// Average lookup time in nanoseconds.
    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        let count = self.lookups_performed.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Average insert time in nanoseconds.
    pub fn avg_insert_time_ns(&self) -> u64 {
        let total = self.insert_time_ns.load(Ordering::Relaxed);
        let count = self.elements_inserted.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Ratio of positive lookups to total lookups.
    ///
    /// Includes both true positives and false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.filters_built.store(0, Ordering::Relaxed);
        self.elements_inserted.store(0, Ordering::Relaxed);
        self.lookups_performed.store(0, Ordering::Relaxed);
        self.lookups_positive.store(0, Ordering::Relaxed);
        self.lookup_time_ns.store(0, Ordering::Relaxed);
        self.insert_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct MetricsSnapshot {
    /// Total filters built
    pub filters_built: u64,
    /// Total elements inserted
    pub elements_inserted: u64,
    /// Total lookups performed
    pub lookups_performed: u64,
    /// Total positive lookups
    pub lookups_positive: u64,
    /// Average lookup time in nanoseconds
    pub avg_lookup_ns: u64,
    /// Average insert time in nanoseconds
    pub avg_insert_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus, StatsD, or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    /// Record a filter build
    fn record_filter_built(&self, size_bits: usize, hash_count: usize);

    /// Record an element insertion
    fn record_insert(&self, duration: Duration);

    /// Record a lookup operation
    fn record_lookup(&self, duration: Duration, found: bool);
}

/// No-op recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_built(&self, _: usize, _: usize) {}
    fn record_insert(&self, _: Duration) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_built(&self, size_bits: usize, hash_count: usize) {
        Metrics::record_filter_built(self, size_bits, hash_count);
    }

    fn record_insert(&self, duration: Duration) {
        Metrics::record_insert(self, duration);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let metrics = Metrics::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.filters_built, 0);
        assert_eq!(snapshot.elements_inserted, 0);
        assert_eq!(snapshot.lookups_performed, 0);
    }

    #[test]
    fn test_record_lookups() {
        let metrics = Metrics::new();

        metrics.record_lookup(Duration::from_nanos(100), true);
        metrics.record_lookup(Duration::from_nanos(150), false);
        metrics.record_lookup(Duration::from_nanos(120), true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.lookups_performed, 3);
        assert_eq!(snapshot.lookups_positive, 2);
        assert_eq!(snapshot.avg_lookup_ns, 123); // (100 + 150 + 120) / 3
    }

    #[test]
    fn test_observed_positive_rate() {
        let metrics = Metrics::new();

        for _ in 0..90 {
            metrics.record_lookup(Duration::from_nanos(100), false);
        }
        for _ in 0..10 {
            metrics.record_lookup(Duration::from_nanos(100), true);
        }

        let rate = metrics.observed_positive_rate();
        assert!((rate - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();

        metrics.record_filter_built(1000, 7);
        metrics.record_lookup(Duration::from_nanos(100), true);
        metrics.record_insert(Duration::from_nanos(50));

        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.filters_built, 0);
        assert_eq!(snapshot.lookups_performed, 0);
        assert_eq!(snapshot.elements_inserted, 0);
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_filter_built(1000, 7);
        metrics.record_insert(Duration::from_nanos(100));
        metrics.record_lookup(Duration::from_nanos(100), true);
    }
}

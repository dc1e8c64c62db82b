//! Detection metrics and observability module.
//!
//! Tracks how often conversations hit the external language-detection
//! capability versus reusing their persisted language code, and how often
//! detection fails. The report is exposed on the `/metrics` endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global detection metrics singleton.
pub struct DetectionMetrics {
    /// Number of calls made to the detection capability
    detector_calls: AtomicUsize,

    /// Number of detection calls that failed
    detector_failures: AtomicUsize,

    /// Number of turns that reused a persisted language code
    /// (no external call)
    code_reuses: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<DetectionMetrics> = OnceLock::new();

impl DetectionMetrics {
    /// Get the global detection metrics instance.
    pub fn global() -> &'static DetectionMetrics {
        METRICS.get_or_init(|| DetectionMetrics {
            detector_calls: AtomicUsize::new(0),
            detector_failures: AtomicUsize::new(0),
            code_reuses: AtomicUsize::new(0),
        })
    }

    /// Record a call to the detection capability.
    pub fn record_detector_call(&self) {
        self.detector_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed detection call.
    pub fn record_detector_failure(&self) {
        self.detector_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a turn that reused the conversation's persisted language code.
    pub fn record_code_reuse(&self) {
        self.code_reuses.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current detector call count.
    pub fn detector_calls(&self) -> usize {
        self.detector_calls.load(Ordering::Relaxed)
    }

    /// Get the current detector failure count.
    pub fn detector_failures(&self) -> usize {
        self.detector_failures.load(Ordering::Relaxed)
    }

    /// Get the current persisted-code reuse count.
    pub fn code_reuses(&self) -> usize {
        self.code_reuses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let calls = self.detector_calls();
        let failures = self.detector_failures();
        let detection_success_rate = if calls > 0 {
            ((calls - failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        let reuses = self.code_reuses();
        let total_resolutions = calls + reuses;
        let reuse_rate = if total_resolutions > 0 {
            (reuses as f64 / total_resolutions as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            detector_calls: calls,
            detector_failures: failures,
            detection_success_rate,
            code_reuses: reuses,
            reuse_rate,
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.detector_calls.store(0, Ordering::Relaxed);
        self.detector_failures.store(0, Ordering::Relaxed);
        self.code_reuses.store(0, Ordering::Relaxed);
    }
}

/// Metrics report containing current detection statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of calls made to the detection capability
    pub detector_calls: usize,

    /// Number of detection calls that failed
    pub detector_failures: usize,

    /// Detection success rate as a percentage (0-100)
    pub detection_success_rate: f64,

    /// Number of turns that reused a persisted language code
    pub code_reuses: usize,

    /// Share of locale resolutions served without an external call (0-100)
    pub reuse_rate: f64,
}

//! Metrics collection and registry.

use crate::proctor::{ProctorError, ProctorObserver};
use crate::verification::VerificationResult;
use crate::view::ViewChange;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus metrics registry for proctoring.
///
/// Doubles as a [`ProctorObserver`] so the loop's events feed it directly.
pub struct MetricsRegistry {
    registry: Registry,

    // Cycle metrics
    cycles_total: IntCounter,
    last_sequence: IntGauge,

    // Verdict metrics
    recognized_total: IntCounter,
    unrecognized_total: IntCounter,
    face_detected: IntGauge,
    warning_active: IntGauge,

    // Failure metrics
    failures_total: IntCounterVec,
    stale_responses_total: IntCounter,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all proctoring metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new(
            "proctor_cycles_total",
            "Total number of verification cycles fired",
        )?;
        let last_sequence = IntGauge::new(
            "proctor_last_applied_sequence",
            "Sequence number of the last response applied to the view",
        )?;

        let recognized_total = IntCounter::new(
            "proctor_recognized_total",
            "Responses reporting the expected person",
        )?;
        let unrecognized_total = IntCounter::new(
            "proctor_unrecognized_total",
            "Responses reporting an unknown or missing person",
        )?;
        let face_detected = IntGauge::new(
            "proctor_face_detected",
            "Whether the last applied response carried a face box (1=yes, 0=no)",
        )?;
        let warning_active = IntGauge::new(
            "proctor_warning_active",
            "Whether a warning is currently displayed (1=yes, 0=no)",
        )?;

        let failures_total = IntCounterVec::new(
            Opts::new("proctor_failures_total", "Failures by kind"),
            &["kind"],
        )?;
        let stale_responses_total = IntCounter::new(
            "proctor_stale_responses_total",
            "Responses discarded because a newer one was already applied",
        )?;

        // Register all metrics
        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(last_sequence.clone()))?;
        registry.register(Box::new(recognized_total.clone()))?;
        registry.register(Box::new(unrecognized_total.clone()))?;
        registry.register(Box::new(face_detected.clone()))?;
        registry.register(Box::new(warning_active.clone()))?;
        registry.register(Box::new(failures_total.clone()))?;
        registry.register(Box::new(stale_responses_total.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            last_sequence,
            recognized_total,
            unrecognized_total,
            face_detected,
            warning_active,
            failures_total,
            stale_responses_total,
        })
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl ProctorObserver for MetricsRegistry {
    fn on_cycle(&self, _sequence: u64) {
        self.cycles_total.inc();
    }

    fn on_applied(&self, sequence: u64, result: &VerificationResult, change: &ViewChange) {
        if result.recognized {
            self.recognized_total.inc();
        } else {
            self.unrecognized_total.inc();
        }
        self.face_detected.set(i64::from(change.face_drawn));
        self.warning_active.set(i64::from(result.warning().is_some()));
        self.last_sequence.set(sequence as i64);
    }

    fn on_stale(&self, _sequence: u64, _last_applied: u64) {
        self.stale_responses_total.inc();
    }

    fn on_failure(&self, _sequence: Option<u64>, error: &ProctorError) {
        self.failures_total.with_label_values(&[error.kind()]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::{FaceBox, VerifyError};

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_observer_updates_metrics() {
        let registry = MetricsRegistry::new().unwrap();

        registry.on_cycle(1);
        registry.on_cycle(2);
        registry.on_applied(
            2,
            &VerificationResult::unrecognized("Face not recognized", Some(FaceBox::new(1.0, 1.0, 2.0, 2.0))),
            &ViewChange {
                warning_changed: true,
                face_drawn: true,
            },
        );
        registry.on_stale(1, 2);
        registry.on_failure(Some(3), &ProctorError::Verify(VerifyError::MissingMessage));

        let output = registry.encode().unwrap();
        assert!(output.contains("proctor_cycles_total 2"));
        assert!(output.contains("proctor_unrecognized_total 1"));
        assert!(output.contains("proctor_face_detected 1"));
        assert!(output.contains("proctor_warning_active 1"));
        assert!(output.contains("proctor_last_applied_sequence 2"));
        assert!(output.contains("proctor_stale_responses_total 1"));
        assert!(output.contains("proctor_failures_total{kind=\"malformed\"} 1"));
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        // Should contain metric names
        assert!(output.contains("proctor_cycles_total"));
        assert!(output.contains("proctor_recognized_total"));
        assert!(output.contains("proctor_stale_responses_total"));
    }
}

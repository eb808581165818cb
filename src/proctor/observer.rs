//! Observability hooks for the proctoring loop.

use super::ProctorError;
use crate::verification::VerificationResult;
use crate::view::ViewChange;
use std::sync::Arc;

/// Receives loop events. Called from the loop task and from response
/// handlers, possibly concurrently.
pub trait ProctorObserver: Send + Sync {
    /// A cycle fired and its request is about to be sent.
    fn on_cycle(&self, _sequence: u64) {}

    /// A response was applied to the view.
    fn on_applied(&self, _sequence: u64, _result: &VerificationResult, _change: &ViewChange) {}

    /// A response arrived after a newer one had been applied and was dropped.
    fn on_stale(&self, _sequence: u64, _last_applied: u64) {}

    /// Something failed. `sequence` is `None` for setup failures.
    fn on_failure(&self, sequence: Option<u64>, error: &ProctorError);
}

/// Reports loop events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProctorObserver for LogObserver {
    fn on_cycle(&self, sequence: u64) {
        tracing::trace!(sequence, "Verification cycle fired");
    }

    fn on_applied(&self, sequence: u64, result: &VerificationResult, change: &ViewChange) {
        if change.warning_changed {
            match result.warning() {
                Some(message) => tracing::warn!(sequence, warning = message, "Warning displayed"),
                None => tracing::info!(sequence, "Warning cleared"),
            }
        }
        tracing::debug!(
            sequence,
            recognized = result.recognized,
            face = change.face_drawn,
            "Verification applied"
        );
    }

    fn on_stale(&self, sequence: u64, last_applied: u64) {
        tracing::debug!(sequence, last_applied, "Discarded stale verification response");
    }

    fn on_failure(&self, sequence: Option<u64>, error: &ProctorError) {
        tracing::warn!(?sequence, kind = error.kind(), error = %error, "Proctoring failure");
    }
}

/// Fans events out to several observers.
#[derive(Default, Clone)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn ProctorObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    pub fn with(mut self, observer: Arc<dyn ProctorObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl ProctorObserver for ObserverSet {
    fn on_cycle(&self, sequence: u64) {
        for o in &self.observers {
            o.on_cycle(sequence);
        }
    }

    fn on_applied(&self, sequence: u64, result: &VerificationResult, change: &ViewChange) {
        for o in &self.observers {
            o.on_applied(sequence, result, change);
        }
    }

    fn on_stale(&self, sequence: u64, last_applied: u64) {
        for o in &self.observers {
            o.on_stale(sequence, last_applied);
        }
    }

    fn on_failure(&self, sequence: Option<u64>, error: &ProctorError) {
        for o in &self.observers {
            o.on_failure(sequence, error);
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

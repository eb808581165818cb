//! Prometheus metrics for the proctoring loop.
//!
//! The registry is a [`ProctorObserver`](crate::proctor::ProctorObserver):
//! hand it to the loop (usually inside an
//! [`ObserverSet`](crate::proctor::ObserverSet) next to the log observer)
//! and every cycle, verdict and failure is counted.
//!
//! # Metrics Exposed
//!
//! - `proctor_cycles_total` - Verification cycles fired
//! - `proctor_last_applied_sequence` - Sequence number of the last applied response
//! - `proctor_recognized_total` - Responses reporting the expected person
//! - `proctor_unrecognized_total` - Responses reporting anyone else
//! - `proctor_face_detected` - Whether the last applied response had a face box
//! - `proctor_warning_active` - Whether a warning is displayed
//! - `proctor_failures_total{kind}` - Failures by kind (camera, capture, encode, http, status, malformed)
//! - `proctor_stale_responses_total` - Responses dropped by `latest-wins` ordering
//!
//! With the `metrics` feature the registry is served over HTTP at
//! `/metrics`.

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};

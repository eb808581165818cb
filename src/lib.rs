//! Proctor Cam Library
//!
//! Webcam client for exam proctoring. Captures frames from a camera,
//! sends them to a face verification endpoint and keeps a warning text
//! and face box overlay in sync with the verdicts.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → encoding → verification → view
//!     ↓         ↓            ↓
//!           proctor (loop, failures) → metrics
//!           snapshot (one-shot form submission)
//! ```
//!
//! # Design Principles
//!
//! - **Keep polling**: no failure (camera, network, malformed response)
//!   stops the proctoring loop; failures are reported and the next cycle
//!   fires on schedule
//! - **Injected UI handles**: the loop writes to a [`view::ProctorView`] it
//!   is given, never to global state
//! - **Shared coordinate space**: frames are rendered at the video's display
//!   size before upload, so reported face boxes line up with the overlay
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use proctor_cam::{
//!     capture::{FileConfig, MockCamera},
//!     proctor::{LogObserver, ProctoringLoop},
//!     verification::HttpVerifier,
//!     view::{ProctorView, VideoElement},
//! };
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FileConfig::default();
//! let view = ProctorView::new(VideoElement::new(0, 0, 640, 480)).shared();
//! let verifier = HttpVerifier::new(config.verify_url()?);
//!
//! let proctor = ProctoringLoop::setup(
//!     Box::new(MockCamera::new()),
//!     &config.capture,
//!     &config.proctor,
//!     view,
//!     Arc::new(verifier),
//!     Arc::new(LogObserver),
//! );
//!
//! // Runs until the future is dropped
//! proctor.run().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod encoding;
pub mod metrics;
pub mod proctor;
pub mod snapshot;
pub mod verification;
pub mod view;

// Re-export commonly used types at crate root
pub use capture::{Camera, CaptureConfig, FileConfig, Frame, MockCamera, VideoStream};
pub use encoding::{encode_jpeg, CapturedImage, Surface};
pub use metrics::MetricsRegistry;
pub use proctor::{LogObserver, ObserverSet, ProctorError, ProctorObserver, ProctoringLoop};
pub use snapshot::{HttpFormTarget, SnapshotForm, SnapshotSubmitter};
pub use verification::{FaceBox, HttpVerifier, VerificationResult, Verifier};
pub use view::{ProctorView, VideoElement};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

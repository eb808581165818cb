//! The periodic capture, verify and overlay loop.

use super::{ProctorError, ProctorObserver, SequenceGate};
use crate::capture::{Camera, CaptureConfig, Frame, ProctorConfig, VideoStream};
use crate::encoding::{encode_jpeg, CapturedImage, Surface};
use crate::verification::{VerificationResult, Verifier, VerifyError};
use crate::view::SharedView;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Continuously verifies the person in front of the camera.
///
/// Each cycle captures and encodes a frame on the calling task, then sends
/// it and applies the response on a spawned task. Cycles never wait for
/// earlier requests, and no failure stops the loop.
pub struct ProctoringLoop {
    stream: VideoStream,
    surface: Surface,
    verifier: Arc<dyn Verifier>,
    handler: ResponseHandler,
    interval: Duration,
    jpeg_quality: u8,
    sequence: u64,
}

impl ProctoringLoop {
    /// Acquires the camera and prepares the loop.
    ///
    /// A camera that fails to open is reported to `observer` and the loop
    /// is still returned; it then sends blank frames.
    pub fn setup(
        camera: Box<dyn Camera>,
        capture: &CaptureConfig,
        settings: &ProctorConfig,
        view: SharedView,
        verifier: Arc<dyn Verifier>,
        observer: Arc<dyn ProctorObserver>,
    ) -> Self {
        let (stream, camera_error) = VideoStream::acquire(camera, capture);
        if let Some(e) = camera_error {
            observer.on_failure(None, &ProctorError::CameraUnavailable(e));
        }

        let (width, height) = {
            let view = view.lock().unwrap_or_else(PoisonError::into_inner);
            (view.video().width(), view.video().height())
        };

        Self {
            stream,
            surface: Surface::new(width, height),
            verifier,
            handler: ResponseHandler {
                view,
                gate: Arc::new(Mutex::new(SequenceGate::new(settings.ordering))),
                observer,
                preview_path: settings.preview_path.clone(),
            },
            interval: settings.interval(),
            jpeg_quality: settings.jpeg_quality,
            sequence: 0,
        }
    }

    /// Returns the view the loop writes to.
    pub fn view(&self) -> SharedView {
        Arc::clone(&self.handler.view)
    }

    /// Sequence number of the most recent cycle (0 before the first).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the response handler, which applies results to the view.
    pub fn handler(&self) -> &ResponseHandler {
        &self.handler
    }

    /// Runs one cycle without waiting for its response.
    ///
    /// Returns the handle of the spawned request task, or `None` when the
    /// frame could not be encoded.
    pub fn tick(&mut self) -> Option<JoinHandle<()>> {
        self.sequence += 1;
        let sequence = self.sequence;
        self.handler.observer.on_cycle(sequence);

        let image = match self.capture(sequence) {
            Ok(image) => image,
            Err(e) => {
                self.handler.observer.on_failure(Some(sequence), &e);
                return None;
            }
        };

        let verifier = Arc::clone(&self.verifier);
        let handler = self.handler.clone();
        Some(tokio::spawn(async move {
            let outcome = verifier.verify(image).await;
            handler.handle(sequence, outcome).await;
        }))
    }

    /// Runs one cycle and waits for its response to be handled.
    pub async fn run_cycle(&mut self) {
        if let Some(handle) = self.tick() {
            if let Err(e) = handle.await {
                tracing::error!("Verification task failed: {}", e);
            }
        }
    }

    /// Runs cycles on the configured period until the future is dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            camera = self.stream.is_bound(),
            "Proctoring loop started"
        );

        loop {
            ticker.tick().await;
            // Detached: the next tick does not wait for this request
            let _ = self.tick();
        }
    }

    fn capture(&mut self, sequence: u64) -> Result<CapturedImage, ProctorError> {
        let frame = self.current_frame(sequence);
        self.surface.draw_frame(&frame);

        {
            let mut view = self
                .handler
                .view
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            view.video_mut().show(self.surface.raster().clone());
        }

        Ok(encode_jpeg(&self.surface, self.jpeg_quality)?)
    }

    fn current_frame(&mut self, sequence: u64) -> Frame {
        match self.stream.current_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.handler
                    .observer
                    .on_failure(Some(sequence), &ProctorError::Capture(e));
                self.stream.blank_frame()
            }
        }
    }
}

impl std::fmt::Debug for ProctoringLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProctoringLoop")
            .field("stream", &self.stream)
            .field("interval", &self.interval)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Applies verification outcomes to the shared view.
#[derive(Clone)]
pub struct ResponseHandler {
    view: SharedView,
    gate: Arc<Mutex<SequenceGate>>,
    observer: Arc<dyn ProctorObserver>,
    preview_path: Option<PathBuf>,
}

impl ResponseHandler {
    /// Handles the outcome of request `sequence`.
    ///
    /// Failures are reported and leave the view untouched.
    pub async fn handle(&self, sequence: u64, outcome: Result<VerificationResult, VerifyError>) {
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                self.observer
                    .on_failure(Some(sequence), &ProctorError::Verify(e));
                return;
            }
        };

        if let Some(preview) = self.apply(sequence, &result) {
            self.save_preview(preview).await;
        }
    }

    /// Applies `result` if the ordering policy admits it.
    ///
    /// Returns the composited preview when one is configured and the
    /// result was applied.
    pub fn apply(&self, sequence: u64, result: &VerificationResult) -> Option<RgbaImage> {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);

        if !gate.admit(sequence) {
            self.observer.on_stale(sequence, gate.last_applied());
            return None;
        }

        let change = view.apply(result);
        self.observer.on_applied(sequence, result, &change);

        self.preview_path.as_ref().map(|_| view.composite())
    }

    async fn save_preview(&self, preview: RgbaImage) {
        let Some(path) = self.preview_path.clone() else {
            return;
        };
        let saved = tokio::task::spawn_blocking(move || preview.save(&path)).await;
        match saved {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Failed to write preview: {}", e),
            Err(e) => tracing::warn!("Preview task failed: {}", e),
        }
    }
}

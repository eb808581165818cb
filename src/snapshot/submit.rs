//! One-shot capture and form submission.

use super::{FormResponse, FormTarget, SnapshotError, SnapshotForm};
use crate::capture::{Camera, CaptureConfig, SnapshotConfig, VideoStream};
use crate::encoding::{encode_jpeg, Surface};
use std::sync::Arc;

/// Captures a single frame per trigger and submits it with a form.
pub struct SnapshotSubmitter {
    stream: VideoStream,
    surface: Surface,
    form: SnapshotForm,
    target: Arc<dyn FormTarget>,
    jpeg_quality: u8,
}

impl SnapshotSubmitter {
    /// Acquires the camera. A camera that fails to open is logged and the
    /// submitter still works on blank frames.
    pub fn setup(
        camera: Box<dyn Camera>,
        capture: &CaptureConfig,
        settings: &SnapshotConfig,
        form: SnapshotForm,
        target: Arc<dyn FormTarget>,
    ) -> Self {
        let (stream, _camera_error) = VideoStream::acquire(camera, capture);
        Self {
            stream,
            surface: Surface::new(settings.width, settings.height),
            form,
            target,
            jpeg_quality: settings.jpeg_quality,
        }
    }

    /// Returns the form, including the file from the last trigger.
    pub fn form(&self) -> &SnapshotForm {
        &self.form
    }

    /// Returns true when a camera is bound.
    pub fn has_camera(&self) -> bool {
        self.stream.is_bound()
    }

    /// Captures the current frame, attaches it as `webcam.jpg` and submits
    /// the form once.
    pub async fn trigger(&mut self) -> Result<FormResponse, SnapshotError> {
        let frame = match self.stream.current_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Frame capture failed, submitting blank frame: {}", e);
                self.stream.blank_frame()
            }
        };
        self.surface.draw_frame(&frame);

        let image = encode_jpeg(&self.surface, self.jpeg_quality)?;
        tracing::debug!(?image, field = self.form.file_field(), "Attaching snapshot");
        self.form.set_file(image.into());

        self.target.submit(&self.form).await
    }
}

impl std::fmt::Debug for SnapshotSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotSubmitter")
            .field("stream", &self.stream)
            .field("surface", &self.surface.dimensions())
            .field("form", &self.form)
            .finish()
    }
}

//! Live video stream bound to a display.
//!
//! Acquisition never fails outright: when the camera cannot be opened the
//! stream stays unbound and serves blank frames, so downstream capture and
//! send paths keep working.

use super::{Camera, CameraError, CaptureConfig, Frame};

/// A camera feed owned by one component for its lifetime.
pub struct VideoStream {
    camera: Option<Box<dyn Camera>>,
    width: u32,
    height: u32,
}

impl VideoStream {
    /// Requests video access from `camera`.
    ///
    /// Returns the stream together with the open error, if any. The stream
    /// is usable either way.
    pub fn acquire(
        mut camera: Box<dyn Camera>,
        config: &CaptureConfig,
    ) -> (Self, Option<CameraError>) {
        match camera.open(config) {
            Ok(()) => {
                tracing::info!(device_id = config.device_id, "Video stream bound");
                let stream = Self {
                    camera: Some(camera),
                    width: config.width,
                    height: config.height,
                };
                (stream, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error accessing webcam; serving blank frames");
                (Self::unbound(config.width, config.height), Some(e))
            }
        }
    }

    /// A stream with no camera behind it.
    pub fn unbound(width: u32, height: u32) -> Self {
        Self {
            camera: None,
            width,
            height,
        }
    }

    /// Returns true when a camera is bound.
    pub fn is_bound(&self) -> bool {
        self.camera.as_ref().map_or(false, |c| c.is_open())
    }

    /// Returns the frame currently on display.
    ///
    /// An unbound stream yields a blank frame. A bound camera that fails to
    /// capture yields the error; callers decide whether to fall back to
    /// [`VideoStream::blank_frame`].
    pub fn current_frame(&mut self) -> Result<Frame, CameraError> {
        match self.camera.as_mut() {
            Some(camera) => camera.capture(),
            None => Ok(self.blank_frame()),
        }
    }

    /// A black frame at the requested stream resolution.
    pub fn blank_frame(&self) -> Frame {
        Frame::blank(self.width, self.height)
    }
}

impl std::fmt::Debug for VideoStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoStream")
            .field("bound", &self.is_bound())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

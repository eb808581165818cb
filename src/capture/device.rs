//! Hardware webcam backed by `nokhwa`.

use super::{Camera, CameraError, CaptureConfig, Frame};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};

/// A physical video capture device.
///
/// Requests the configured resolution and frame rate; the device may pick
/// the closest mode it supports, so captured frames can differ in size
/// from the request.
#[derive(Default)]
pub struct DeviceCamera {
    device: Option<nokhwa::Camera>,
    sequence: u64,
}

impl DeviceCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Camera for DeviceCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(config.width, config.height),
                FrameFormat::MJPEG,
                config.fps,
            ),
        ));

        let mut device = nokhwa::Camera::new(CameraIndex::Index(config.device_id), requested)
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;
        device
            .open_stream()
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;

        tracing::info!(
            device_id = config.device_id,
            resolution = %device.resolution(),
            "Camera stream opened"
        );

        self.device = Some(device);
        self.sequence = 0;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let device = self.device.as_mut().ok_or(CameraError::NotInitialized)?;

        let buffer = device
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        self.sequence += 1;
        Ok(Frame::new(decoded.into_raw(), width, height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.stop_stream() {
                tracing::warn!("Failed to stop camera stream: {}", e);
            }
            tracing::info!("Camera closed");
        }
    }
}

impl Drop for DeviceCamera {
    fn drop(&mut self) {
        self.close();
    }
}

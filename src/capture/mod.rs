//! Camera input and frame handling.
//!
//! This module provides abstractions for capturing frames from a camera,
//! binding the camera to a video stream, and managing configuration.

mod camera;
mod config;
#[cfg(feature = "camera")]
mod device;
mod frame;
mod stream;

pub use camera::{Camera, CameraError, MockCamera, UnavailableCamera};
pub use config::{
    CaptureConfig, ConfigError, FileConfig, MetricsConfig, ProctorConfig, ServerConfig,
    SnapshotConfig, ViewConfig, DEFAULT_JPEG_QUALITY,
};
#[cfg(feature = "camera")]
pub use device::DeviceCamera;
pub use frame::{Frame, RGB_CHANNELS};
pub use stream::VideoStream;

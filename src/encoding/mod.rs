//! Frame rasterization and compression.
//!
//! A captured frame is drawn into an offscreen [`Surface`] of the target
//! size, then encoded to JPEG for upload.

mod jpeg;
mod surface;

pub use jpeg::{encode_jpeg, CapturedImage, EncodeError, JPEG_MEDIA_TYPE, WEBCAM_FILE_NAME};
pub use surface::Surface;

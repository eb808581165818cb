//! JPEG encoding of drawing surfaces.

use super::Surface;
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

/// File name every captured frame is uploaded under.
pub const WEBCAM_FILE_NAME: &str = "webcam.jpg";

/// Media type of captured frames.
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Errors that can occur while encoding a surface.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("invalid JPEG quality {0} (must be 1-100)")]
    InvalidQuality(u8),
    #[error("JPEG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// A compressed frame ready to upload or attach to a form.
#[derive(Clone)]
pub struct CapturedImage {
    bytes: Vec<u8>,
    file_name: String,
    media_type: String,
    width: u32,
    height: u32,
}

impl CapturedImage {
    /// Returns the encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the image and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Encodes the surface as a JPEG named `webcam.jpg`.
pub fn encode_jpeg(surface: &Surface, quality: u8) -> Result<CapturedImage, EncodeError> {
    if quality == 0 || quality > 100 {
        return Err(EncodeError::InvalidQuality(quality));
    }

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(surface.raster())?;

    let (width, height) = surface.dimensions();
    tracing::trace!(width, height, bytes = bytes.len(), "Encoded frame");

    Ok(CapturedImage {
        bytes,
        file_name: WEBCAM_FILE_NAME.to_string(),
        media_type: JPEG_MEDIA_TYPE.to_string(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Frame;

    #[test]
    fn test_encode_produces_jpeg() {
        let surface = Surface::new(64, 48);
        let image = encode_jpeg(&surface, 92).unwrap();

        assert_eq!(image.file_name(), "webcam.jpg");
        assert_eq!(image.media_type(), "image/jpeg");
        assert_eq!((image.width(), image.height()), (64, 48));
        // SOI marker
        assert_eq!(&image.bytes()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encoded_jpeg_decodes_to_surface_size() {
        let mut surface = Surface::new(40, 30);
        surface.draw_frame(&Frame::new(vec![128u8; 20 * 15 * 3], 20, 15, 1));

        let image = encode_jpeg(&surface, 80).unwrap();
        let decoded =
            image::load_from_memory_with_format(image.bytes(), image::ImageFormat::Jpeg).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let surface = Surface::new(8, 8);
        assert!(matches!(
            encode_jpeg(&surface, 0),
            Err(EncodeError::InvalidQuality(0))
        ));
    }
}

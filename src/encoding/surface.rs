//! Offscreen drawing surface.

use crate::capture::Frame;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// An RGB raster of fixed dimensions that frames are drawn into.
#[derive(Debug, Clone)]
pub struct Surface {
    raster: RgbImage,
}

impl Surface {
    /// Creates a black surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: RgbImage::from_pixel(width, height, Rgb([0, 0, 0])),
        }
    }

    /// Draws `frame` scaled to cover the whole surface.
    ///
    /// A frame whose buffer does not match its dimensions clears the
    /// surface to black instead.
    pub fn draw_frame(&mut self, frame: &Frame) {
        let (width, height) = self.dimensions();

        let source = if frame.is_valid() {
            RgbImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
        } else {
            None
        };

        self.raster = match source {
            Some(img) if img.dimensions() == (width, height) => img,
            Some(img) => imageops::resize(&img, width, height, FilterType::Triangle),
            None => {
                tracing::debug!(?frame, "Invalid frame; drawing black");
                RgbImage::from_pixel(width, height, Rgb([0, 0, 0]))
            }
        };
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// Returns the underlying raster.
    pub fn raster(&self) -> &RgbImage {
        &self.raster
    }
}

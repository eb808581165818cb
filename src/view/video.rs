//! The displayed video element.

use image::RgbImage;

/// Display geometry of the live video plus the frame it currently shows.
#[derive(Debug, Clone)]
pub struct VideoElement {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    z_index: i32,
    frame: Option<RgbImage>,
}

impl VideoElement {
    /// Creates a video element at `(left, top)` rendered at `width` x `height`.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            z_index: 0,
            frame: None,
        }
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Replaces the displayed frame.
    pub fn show(&mut self, frame: RgbImage) {
        self.frame = Some(frame);
    }

    /// Returns the displayed frame, if any has been shown yet.
    pub fn frame(&self) -> Option<&RgbImage> {
        self.frame.as_ref()
    }
}

//! Transparent annotation layer stacked above the video.

use super::{Color, VideoElement};
use image::{Rgba, RgbaImage};

/// Placement of the overlay relative to its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayout {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    /// Stacking order; higher draws on top.
    pub z_index: i32,
    /// Whether pointer input is delivered to the overlay. Always false so
    /// clicks reach the video beneath.
    pub intercepts_pointer: bool,
}

/// A retained drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// An unfilled rectangle between two corners.
    StrokeRect {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        line_width: f64,
    },
}

/// The overlay drawing surface.
#[derive(Debug, Clone)]
pub struct Overlay {
    layout: OverlayLayout,
    shapes: Vec<Shape>,
}

impl Overlay {
    /// Creates an empty overlay aligned with `video` and stacked above it.
    pub fn stacked_over(video: &VideoElement) -> Self {
        Self {
            layout: OverlayLayout {
                left: video.left(),
                top: video.top(),
                width: video.width(),
                height: video.height(),
                z_index: video.z_index() + 1,
                intercepts_pointer: false,
            },
            shapes: Vec::new(),
        }
    }

    pub fn layout(&self) -> &OverlayLayout {
        &self.layout
    }

    /// Erases everything drawn so far.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Strokes a rectangle outline with corners `(x1, y1)` and `(x2, y2)`.
    pub fn stroke_rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, line_width: f64) {
        self.shapes.push(Shape::StrokeRect {
            x1,
            y1,
            x2,
            y2,
            color,
            line_width,
        });
    }

    /// Returns the drawn shapes in paint order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Renders the overlay to a transparent RGBA image of its layout size.
    ///
    /// Strokes are centered on the rectangle path, so a line of width 2
    /// covers one pixel on each side of the edge. Anything outside the
    /// surface is clipped.
    pub fn rasterize(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.layout.width, self.layout.height);
        for shape in &self.shapes {
            match *shape {
                Shape::StrokeRect {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                    line_width,
                } => paint_stroke_rect(&mut img, (x1, y1, x2, y2), color, line_width),
            }
        }
        img
    }
}

fn paint_stroke_rect(img: &mut RgbaImage, corners: (f64, f64, f64, f64), color: Color, line_width: f64) {
    let (x1, y1, x2, y2) = corners;
    let half = line_width.max(0.0) / 2.0;
    let (min_x, max_x) = (x1.min(x2), x1.max(x2));
    let (min_y, max_y) = (y1.min(y2), y1.max(y2));

    let outer = (min_x - half, min_y - half, max_x + half, max_y + half);
    let inner = (min_x + half, min_y + half, max_x - half, max_y - half);

    let (width, height) = img.dimensions();
    let col_start = outer.0.floor().max(0.0) as u32;
    let col_end = outer.2.ceil().min(width as f64).max(0.0) as u32;
    let row_start = outer.1.floor().max(0.0) as u32;
    let row_end = outer.3.ceil().min(height as f64).max(0.0) as u32;

    let pixel = Rgba(color.0);
    for py in row_start..row_end {
        let cy = py as f64 + 0.5;
        for px in col_start..col_end {
            let cx = px as f64 + 0.5;
            let in_outer = cx >= outer.0 && cx < outer.2 && cy >= outer.1 && cy < outer.3;
            let in_inner = cx > inner.0 && cx < inner.2 && cy > inner.1 && cy < inner.3;
            if in_outer && !in_inner {
                img.put_pixel(px, py, pixel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(width: u32, height: u32) -> Overlay {
        Overlay::stacked_over(&VideoElement::new(5, 7, width, height))
    }

    #[test]
    fn test_stacked_over_video() {
        let video = VideoElement::new(5, 7, 640, 480);
        let overlay = Overlay::stacked_over(&video);
        let layout = overlay.layout();

        assert_eq!((layout.left, layout.top), (5, 7));
        assert_eq!((layout.width, layout.height), (640, 480));
        assert!(layout.z_index > video.z_index());
        assert!(!layout.intercepts_pointer);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_clear_removes_shapes() {
        let mut overlay = overlay(100, 100);
        overlay.stroke_rect(1.0, 1.0, 10.0, 10.0, Color::GREEN, 2.0);
        assert_eq!(overlay.shapes().len(), 1);

        overlay.clear();
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_rasterize_stroke_is_unfilled() {
        let mut overlay = overlay(200, 300);
        overlay.stroke_rect(10.0, 20.0, 110.0, 220.0, Color::GREEN, 2.0);
        let img = overlay.rasterize();

        let green = Rgba(Color::GREEN.0);
        // Line straddles the left edge at x=10
        assert_eq!(*img.get_pixel(9, 100), green);
        assert_eq!(*img.get_pixel(10, 100), green);
        assert_eq!(img.get_pixel(11, 100).0[3], 0);
        // Top and bottom edges
        assert_eq!(*img.get_pixel(60, 19), green);
        assert_eq!(*img.get_pixel(60, 220), green);
        // Interior and exterior stay transparent
        assert_eq!(img.get_pixel(60, 120).0[3], 0);
        assert_eq!(img.get_pixel(5, 5).0[3], 0);
        assert_eq!(img.get_pixel(150, 100).0[3], 0);
    }

    #[test]
    fn test_rasterize_clips_out_of_bounds() {
        let mut overlay = overlay(50, 50);
        overlay.stroke_rect(-20.0, -20.0, 500.0, 25.0, Color::GREEN, 2.0);
        let img = overlay.rasterize();

        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(*img.get_pixel(10, 25), Rgba(Color::GREEN.0));
    }

    #[test]
    fn test_rasterize_empty_is_transparent() {
        let img = overlay(16, 16).rasterize();
        assert!(img.pixels().all(|p| p.0[3] == 0));
    }
}

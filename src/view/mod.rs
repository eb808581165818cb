//! Proctoring display state.
//!
//! [`ProctorView`] bundles the UI handles the proctoring loop writes to:
//! the video element, the overlay stacked above it and the warning label.
//! Handles are created by the caller and injected; nothing here looks up
//! global state.

mod overlay;
mod video;
mod warning;

pub use overlay::{Overlay, OverlayLayout, Shape};
pub use video::VideoElement;
pub use warning::{WarningLabel, WarningStyle};

use crate::verification::VerificationResult;
use chrono::{DateTime, Utc};
use image::{DynamicImage, RgbaImage};
use std::sync::{Arc, Mutex};

/// Stroke width of the face box.
pub const FACE_BOX_LINE_WIDTH: f64 = 2.0;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// CSS `green`, used for the face box.
    pub const GREEN: Color = Color([0, 128, 0, 255]);
    /// CSS `red`, used for alert text.
    pub const RED: Color = Color([255, 0, 0, 255]);
}

/// What a single [`ProctorView::apply`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewChange {
    /// The warning text differs from before the update.
    pub warning_changed: bool,
    /// A face box was drawn.
    pub face_drawn: bool,
}

/// The UI handles owned by a proctoring page.
#[derive(Debug, Clone)]
pub struct ProctorView {
    video: VideoElement,
    overlay: Overlay,
    warning: WarningLabel,
    box_color: Color,
    updated_at: Option<DateTime<Utc>>,
}

/// A view shared between the loop and in-flight response handlers.
pub type SharedView = Arc<Mutex<ProctorView>>;

impl ProctorView {
    /// Creates a view around `video` with a fresh overlay stacked over it.
    pub fn new(video: VideoElement) -> Self {
        let overlay = Overlay::stacked_over(&video);
        Self {
            video,
            overlay,
            warning: WarningLabel::new(),
            box_color: Color::GREEN,
            updated_at: None,
        }
    }

    /// Wraps the view for sharing.
    pub fn shared(self) -> SharedView {
        Arc::new(Mutex::new(self))
    }

    /// Applies a verification result to the warning text and overlay.
    ///
    /// The overlay is cleared on every call, then holds at most the one
    /// face box from `result`.
    pub fn apply(&mut self, result: &VerificationResult) -> ViewChange {
        let before = self.warning.text().to_string();

        match result.warning() {
            None => self.warning.clear(),
            Some(message) => self.warning.alert(message),
        }

        self.overlay.clear();
        if let Some(face) = result.face_box {
            self.overlay.stroke_rect(
                face.x1,
                face.y1,
                face.x2,
                face.y2,
                self.box_color,
                FACE_BOX_LINE_WIDTH,
            );
        }

        self.updated_at = Some(Utc::now());

        ViewChange {
            warning_changed: before != self.warning.text(),
            face_drawn: result.face_box.is_some(),
        }
    }

    pub fn video(&self) -> &VideoElement {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut VideoElement {
        &mut self.video
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn warning(&self) -> &WarningLabel {
        &self.warning
    }

    /// When a result was last applied.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Renders the displayed frame with the overlay blended on top.
    pub fn composite(&self) -> RgbaImage {
        let layout = self.overlay.layout();
        let mut base = match self.video.frame() {
            Some(frame) => DynamicImage::ImageRgb8(frame.clone()).to_rgba8(),
            None => RgbaImage::from_pixel(layout.width, layout.height, image::Rgba([0, 0, 0, 255])),
        };
        let top = self.overlay.rasterize();
        for (x, y, pixel) in top.enumerate_pixels() {
            if x >= base.width() || y >= base.height() {
                continue;
            }
            let alpha = pixel.0[3] as u32;
            if alpha == 0 {
                continue;
            }
            let under = base.get_pixel_mut(x, y);
            for c in 0..3 {
                let blended = (pixel.0[c] as u32 * alpha + under.0[c] as u32 * (255 - alpha)) / 255;
                under.0[c] = blended as u8;
            }
            under.0[3] = 255;
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::FaceBox;
    use proptest::prelude::*;

    fn view() -> ProctorView {
        ProctorView::new(VideoElement::new(0, 0, 640, 480))
    }

    fn only_rect(view: &ProctorView) -> (f64, f64, f64, f64, f64) {
        match view.overlay().shapes() {
            [Shape::StrokeRect {
                x1,
                y1,
                x2,
                y2,
                line_width,
                ..
            }] => (*x1, *y1, *x2, *y2, *line_width),
            other => panic!("expected one rectangle, got {:?}", other),
        }
    }

    #[test]
    fn test_recognized_with_box() {
        let mut view = view();
        let result =
            VerificationResult::recognized(Some(FaceBox::new(10.0, 20.0, 110.0, 220.0)));

        let change = view.apply(&result);

        assert!(view.warning().is_empty());
        assert_eq!(only_rect(&view), (10.0, 20.0, 110.0, 220.0, 2.0));
        assert!(change.face_drawn);
        assert!(view.updated_at().is_some());
    }

    #[test]
    fn test_unrecognized_without_box() {
        let mut view = view();
        view.apply(&VerificationResult::recognized(Some(FaceBox::new(
            1.0, 2.0, 3.0, 4.0,
        ))));

        let change = view.apply(&VerificationResult::unrecognized(
            "Unknown person detected",
            None,
        ));

        assert_eq!(view.warning().text(), "Unknown person detected");
        assert_eq!(view.warning().style(), WarningStyle::Alert);
        assert!(view.overlay().is_empty());
        assert!(change.warning_changed);
        assert!(!change.face_drawn);
    }

    #[test]
    fn test_recognized_clears_previous_warning() {
        let mut view = view();
        view.apply(&VerificationResult::unrecognized("Face not recognized", None));
        let change = view.apply(&VerificationResult::recognized(None));

        assert!(view.warning().is_empty());
        assert!(change.warning_changed);
    }

    #[test]
    fn test_composite_draws_box_over_frame() {
        let mut view = ProctorView::new(VideoElement::new(0, 0, 40, 40));
        view.video_mut()
            .show(image::RgbImage::from_pixel(40, 40, image::Rgb([10, 10, 10])));
        view.apply(&VerificationResult::recognized(Some(FaceBox::new(
            5.0, 5.0, 30.0, 30.0,
        ))));

        let img = view.composite();
        assert_eq!(img.dimensions(), (40, 40));
        assert_eq!(img.get_pixel(5, 15).0, Color::GREEN.0);
        assert_eq!(img.get_pixel(15, 15).0, [10, 10, 10, 255]);
    }

    fn arb_result() -> impl Strategy<Value = VerificationResult> {
        let face = prop::option::of(
            (0.0..640.0f64, 0.0..480.0f64, 0.0..640.0f64, 0.0..480.0f64)
                .prop_map(|(x1, y1, x2, y2)| FaceBox::new(x1, y1, x2, y2)),
        );
        (any::<bool>(), "[a-zA-Z ]{1,32}", face).prop_map(|(ok, msg, face)| {
            if ok {
                VerificationResult::recognized(face)
            } else {
                VerificationResult::unrecognized(msg, face)
            }
        })
    }

    proptest! {
        #[test]
        fn prop_apply_is_idempotent(first in arb_result(), result in arb_result()) {
            let mut once = view();
            once.apply(&first);
            once.apply(&result);

            let mut twice = view();
            twice.apply(&first);
            twice.apply(&result);
            twice.apply(&result);

            prop_assert_eq!(once.warning(), twice.warning());
            prop_assert_eq!(once.overlay().shapes(), twice.overlay().shapes());
        }

        #[test]
        fn prop_overlay_holds_at_most_the_reported_box(
            history in prop::collection::vec(arb_result(), 0..5),
            result in arb_result(),
        ) {
            let mut view = view();
            for earlier in &history {
                view.apply(earlier);
            }
            view.apply(&result);

            match result.face_box {
                Some(face) => {
                    prop_assert_eq!(only_rect(&view), (face.x1, face.y1, face.x2, face.y2, 2.0));
                }
                None => prop_assert!(view.overlay().is_empty()),
            }
            prop_assert_eq!(view.warning().text(), result.warning().unwrap_or(""));
        }
    }
}

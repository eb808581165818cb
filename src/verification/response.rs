//! Verification endpoint response.

use super::VerifyError;
use serde::{Deserialize, Serialize};

/// A detected face region.
///
/// Coordinates are in the pixel space of the submitted image, which is
/// always rendered at the video element's display size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl FaceBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }
}

/// Outcome of one verification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the face matches the reference identity.
    pub recognized: bool,
    /// Explanation shown to the candidate when not recognized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Detected face, absent or `null` when no face was found.
    #[serde(default)]
    pub face_box: Option<FaceBox>,
}

impl VerificationResult {
    /// A positive result.
    pub fn recognized(face_box: Option<FaceBox>) -> Self {
        Self {
            recognized: true,
            message: None,
            face_box,
        }
    }

    /// A negative result with the warning to display.
    pub fn unrecognized(message: impl Into<String>, face_box: Option<FaceBox>) -> Self {
        Self {
            recognized: false,
            message: Some(message.into()),
            face_box,
        }
    }

    /// Parses and validates a response body.
    ///
    /// `recognized` is required, and `message` is required when
    /// `recognized` is false.
    pub fn from_json(body: &[u8]) -> Result<Self, VerifyError> {
        let result: Self = serde_json::from_slice(body)
            .map_err(|e| VerifyError::MalformedResponse(e.to_string()))?;
        if !result.recognized && result.message.is_none() {
            return Err(VerifyError::MissingMessage);
        }
        Ok(result)
    }

    /// Warning text to display, `None` when the face was recognized.
    pub fn warning(&self) -> Option<&str> {
        if self.recognized {
            None
        } else {
            self.message.as_deref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_with_box() {
        let body = br#"{"recognized": true, "message": "Face recognized",
                        "face_box": {"x1": 10, "y1": 20, "x2": 110, "y2": 220}}"#;
        let result = VerificationResult::from_json(body).unwrap();

        assert!(result.recognized);
        assert_eq!(result.warning(), None);
        assert_eq!(result.face_box, Some(FaceBox::new(10.0, 20.0, 110.0, 220.0)));
    }

    #[test]
    fn test_parse_null_box_is_absent() {
        let body =
            br#"{"recognized": false, "message": "Unknown person detected", "face_box": null}"#;
        let result = VerificationResult::from_json(body).unwrap();

        assert_eq!(result.warning(), Some("Unknown person detected"));
        assert!(result.face_box.is_none());
    }

    #[test]
    fn test_parse_missing_box_is_absent() {
        let body = br#"{"recognized": false, "message": "No face detected"}"#;
        let result = VerificationResult::from_json(body).unwrap();
        assert!(result.face_box.is_none());
    }

    #[test]
    fn test_missing_recognized_rejected() {
        let body = br#"{"message": "hello"}"#;
        assert!(matches!(
            VerificationResult::from_json(body),
            Err(VerifyError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_unrecognized_without_message_rejected() {
        let body = br#"{"recognized": false}"#;
        assert!(matches!(
            VerificationResult::from_json(body),
            Err(VerifyError::MissingMessage)
        ));
    }

    #[test]
    fn test_non_json_rejected() {
        assert!(matches!(
            VerificationResult::from_json(b"<html>502 Bad Gateway</html>"),
            Err(VerifyError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_face_box_extent() {
        let face = FaceBox::new(110.0, 220.0, 10.0, 20.0);
        assert_eq!(face.width(), 100.0);
        assert_eq!(face.height(), 200.0);
    }
}

//! Failures reported by the proctoring loop.

use crate::capture::CameraError;
use crate::encoding::EncodeError;
use crate::verification::VerifyError;
use thiserror::Error;

/// Every failure the loop can hit. None of them stop the loop.
#[derive(Debug, Error)]
pub enum ProctorError {
    /// The camera could not be opened at setup; blank frames are sent.
    #[error("error accessing webcam: {0}")]
    CameraUnavailable(CameraError),
    /// A bound camera failed to deliver a frame; a blank frame was sent.
    #[error("frame capture failed: {0}")]
    Capture(CameraError),
    /// The frame could not be encoded; the cycle was skipped.
    #[error("frame encoding failed: {0}")]
    Encode(#[from] EncodeError),
    /// The verification request failed; the view was left untouched.
    #[error("error in verifying the person: {0}")]
    Verify(#[from] VerifyError),
}

impl ProctorError {
    /// Short label used for log fields and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProctorError::CameraUnavailable(_) => "camera",
            ProctorError::Capture(_) => "capture",
            ProctorError::Encode(_) => "encode",
            ProctorError::Verify(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        let camera = ProctorError::CameraUnavailable(CameraError::NotInitialized);
        assert_eq!(camera.kind(), "camera");

        let malformed = ProctorError::from(VerifyError::MissingMessage);
        assert_eq!(malformed.kind(), "malformed");
        assert!(malformed.to_string().starts_with("error in verifying the person"));
    }
}

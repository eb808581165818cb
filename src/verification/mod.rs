//! Remote face verification.
//!
//! Frames are posted as multipart form data with a single `webcam` part;
//! the endpoint answers with a JSON [`VerificationResult`].

mod client;
mod response;

pub use client::{HttpVerifier, Verifier};
pub use response::{FaceBox, VerificationResult};

use thiserror::Error;

/// Multipart field name frames are uploaded under.
pub const WEBCAM_FIELD: &str = "webcam";

/// Errors that can occur while verifying a frame.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {status} body={body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("response is missing a message for an unrecognized face")]
    MissingMessage,
}

impl VerifyError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::Http(_) => "http",
            VerifyError::UnexpectedStatus { .. } => "status",
            VerifyError::MalformedResponse(_) | VerifyError::MissingMessage => "malformed",
        }
    }
}

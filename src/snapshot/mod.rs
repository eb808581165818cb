//! Snapshot-and-submit.
//!
//! On each trigger one frame is captured, attached to a form's file input
//! as `webcam.jpg` and the form is submitted. Used to register the
//! reference image before an exam.

mod form;
mod submit;

pub use form::{FormFile, FormResponse, FormTarget, HttpFormTarget, SnapshotForm};
pub use submit::SnapshotSubmitter;

use crate::encoding::EncodeError;
use thiserror::Error;

/// Errors that can occur while capturing or submitting a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("form has no file attached")]
    MissingFile,
    #[error("form submission failed: {0}")]
    Http(#[from] reqwest::Error),
}

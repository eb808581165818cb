//! Exam proctoring loop.
//!
//! Every interval the loop captures a frame, posts it to the verification
//! endpoint and updates the warning text and face box overlay from the
//! response. Failures are reported to a [`ProctorObserver`] and never stop
//! the loop.

mod error;
mod observer;
mod ordering;
mod runner;

pub use error::ProctorError;
pub use observer::{LogObserver, ObserverSet, ProctorObserver};
pub use ordering::{ResponseOrdering, SequenceGate};
pub use runner::{ProctoringLoop, ResponseHandler};

//! Detection runs and result listings for Sparrow

mod listing;
mod outcome;
mod run;

pub use listing::{ArtifactEntry, GenerationListing};
pub use outcome::DetectionOutcome;
pub use run::{detect_capture, detect_upload, request_for, run_detection};

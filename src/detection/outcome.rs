//! Typed result of one detection run

use std::path::{Path, PathBuf};

use crate::core::{Artifact, DetectorError};

/// How a detection run ended
#[derive(Debug)]
pub enum DetectionOutcome {
    /// Detector returned and its output is present
    Completed(Artifact),
    /// Detector returned but left no output where expected
    OutputMissing { expected: PathBuf },
    /// Detector could not be started or reported failure
    DetectorFailed(DetectorError),
}

impl DetectionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DetectionOutcome::Completed(_))
    }

    /// Only a failed detector is fatal; a missing output is a warning
    pub fn is_fatal(&self) -> bool {
        matches!(self, DetectionOutcome::DetectorFailed(_))
    }

    pub fn output(&self) -> Option<&Path> {
        match self {
            DetectionOutcome::Completed(artifact) => Some(&artifact.path),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            DetectionOutcome::Completed(_) => "✓",
            DetectionOutcome::OutputMissing { .. } => "⚠",
            DetectionOutcome::DetectorFailed(_) => "✗",
        }
    }

    pub fn description(&self) -> String {
        match self {
            DetectionOutcome::Completed(artifact) => {
                format!("Detection complete: {}", artifact.path.display())
            }
            DetectionOutcome::OutputMissing { expected } => {
                format!("Output not found: {}", expected.display())
            }
            DetectionOutcome::DetectorFailed(err) => format!("Error: {}", err),
        }
    }
}

//! Result store, artifact model and detector seam

pub mod artifact;
pub mod detector;
pub mod store;

pub use artifact::{
    classify, Artifact, ArtifactKind, ArtifactOrigin, KindSet, CAPTURED_IMAGE_NAME,
    IMAGE_EXTENSIONS, VIDEO_EXTENSIONS,
};
pub use detector::{DetectionRequest, Detector, DetectorError, ExternalDetector};
pub use store::{accept, clear, ensure, list_artifacts, ResultStore, StoreError, StoreResult};

// src/core/artifact.rs
//
// Artifact kinds, origins and suffix classification.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Suffixes accepted as still images (lowercase, no dot)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Suffixes accepted as video
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

/// File name used for frames handed over by a camera capture
pub const CAPTURED_IMAGE_NAME: &str = "captured_image.jpg";

/// Media kind of a file, derived from its suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Image,
    Video,
    Unknown,
}

impl ArtifactKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Image => "image",
            ArtifactKind::Video => "video",
            ArtifactKind::Unknown => "unknown",
        }
    }

    /// Suffixes that classify as this kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ArtifactKind::Image => IMAGE_EXTENSIONS,
            ArtifactKind::Video => VIDEO_EXTENSIONS,
            ArtifactKind::Unknown => &[],
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an artifact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactOrigin {
    /// Written from user-supplied bytes
    Uploaded,
    /// Encoded from a camera frame
    Captured,
    /// Written by the detector
    DetectionOutput,
}

/// A file managed by the result store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub origin: ArtifactOrigin,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, origin: ArtifactOrigin) -> Self {
        let path = path.into();
        let kind = classify(&path);
        Self { path, kind, origin }
    }

    /// Final path component, lossily converted
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Set of kinds a listing is allowed to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSet {
    pub image: bool,
    pub video: bool,
}

impl KindSet {
    pub const MEDIA: KindSet = KindSet { image: true, video: true };
    pub const IMAGES: KindSet = KindSet { image: true, video: false };
    pub const VIDEOS: KindSet = KindSet { image: false, video: true };

    pub fn contains(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Image => self.image,
            ArtifactKind::Video => self.video,
            ArtifactKind::Unknown => false,
        }
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::MEDIA
    }
}

/// Map a path's suffix to a kind. Case-insensitive.
pub fn classify(path: &Path) -> ArtifactKind {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return ArtifactKind::Unknown,
    };

    [ArtifactKind::Image, ArtifactKind::Video]
        .into_iter()
        .find(|kind| kind.extensions().contains(&ext.as_str()))
        .unwrap_or(ArtifactKind::Unknown)
}

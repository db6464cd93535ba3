//! Snapshot of the current generation for display and download

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::{classify, ArtifactKind, KindSet, ResultStore, StoreError, StoreResult};

/// One listed artifact with its metadata
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

impl ArtifactEntry {
    pub fn from_path(path: &Path, with_checksum: bool) -> StoreResult<Self> {
        let metadata =
            std::fs::metadata(path).map_err(|e| StoreError::io("stat", path, e))?;

        let md5 = if with_checksum {
            let bytes = std::fs::read(path).map_err(|e| StoreError::io("read", path, e))?;
            Some(format!("{:x}", md5::compute(&bytes)))
        } else {
            None
        };

        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            kind: classify(path),
            size_bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            md5,
        })
    }
}

/// Artifacts present in a store at scan time
#[derive(Debug, Clone, Serialize)]
pub struct GenerationListing {
    pub dir: PathBuf,
    pub artifacts: Vec<ArtifactEntry>,
}

impl GenerationListing {
    pub fn scan(store: &ResultStore, kinds: KindSet, with_checksums: bool) -> StoreResult<Self> {
        let artifacts = store
            .list_artifacts(kinds)
            .map(|path| ArtifactEntry::from_path(&path, with_checksums))
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Self {
            dir: store.dir().to_path_buf(),
            artifacts,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn images(&self) -> impl Iterator<Item = &ArtifactEntry> {
        self.artifacts.iter().filter(|a| a.kind == ArtifactKind::Image)
    }

    pub fn videos(&self) -> impl Iterator<Item = &ArtifactEntry> {
        self.artifacts.iter().filter(|a| a.kind == ArtifactKind::Video)
    }
}

// src/core/store.rs
//
// Result store: owns one output directory holding at most one generation of
// input and detection-output artifacts.
//
// A store directory has exactly one writer at a time. Two processes sharing
// the same directory race between clear/accept/list; use
// `ResultStore::for_session` to give each session its own directory.

use image::{DynamicImage, ImageFormat};
use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;
use walkdir::WalkDir;

use super::artifact::{classify, Artifact, ArtifactOrigin, KindSet, CAPTURED_IMAGE_NAME};

/// Errors raised by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact name: {0:?}")]
    InvalidName(String),

    #[error("failed to encode captured frame to {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl StoreError {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure(dir: &Path) -> StoreResult<()> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io("create directory", dir, e))
}

/// Delete every regular file directly inside `dir`.
///
/// Subdirectories and their contents are left alone. Returns the number of
/// files removed.
pub fn clear(dir: &Path) -> StoreResult<usize> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io("read directory", dir, e))?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io("read directory", dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        fs::remove_file(&path).map_err(|e| StoreError::io("remove", &path, e))?;
        debug!("removed stale artifact {}", path.display());
        removed += 1;
    }

    Ok(removed)
}

/// Write `bytes` to `dir/name`, replacing any existing file.
///
/// Content is not inspected: a `.jpg` holding garbage is stored as-is.
pub fn accept(dir: &Path, bytes: &[u8], name: &str) -> StoreResult<PathBuf> {
    let path = dir.join(validate_name(name)?);
    fs::write(&path, bytes).map_err(|e| StoreError::io("write", &path, e))?;
    debug!("accepted {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Lazily list files directly inside `dir` whose suffix is in `kinds`.
///
/// Every call re-scans the directory. Entries are yielded in file-name order.
/// A missing or unreadable directory yields nothing.
pub fn list_artifacts(dir: &Path, kinds: KindSet) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(move |p| kinds.contains(classify(p)))
}

/// Accept only a single plain file name so writes stay inside the store.
fn validate_name(name: &str) -> StoreResult<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => Err(StoreError::InvalidName(name.to_string())),
    }
}

/// Handle to one output directory
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        ensure(&dir)?;
        Ok(Self { dir })
    }

    /// Open a store for one session under `root`
    pub fn for_session<P: AsRef<Path>>(root: P, session: &Uuid) -> StoreResult<Self> {
        Self::open(root.as_ref().join(session.to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an artifact named `name` has (or would have) in this store
    pub fn path_of(&self, name: &str) -> StoreResult<PathBuf> {
        Ok(self.dir.join(validate_name(name)?))
    }

    /// Split the store directory into the detector's `project` and `name`
    /// so that `project/name` is the store directory itself.
    pub fn project_and_name(&self) -> (PathBuf, String) {
        match (self.dir.parent(), self.dir.file_name()) {
            (Some(parent), Some(name)) => {
                let project = if parent.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    parent.to_path_buf()
                };
                (project, name.to_string_lossy().into_owned())
            }
            _ => (self.dir.clone(), ".".to_string()),
        }
    }

    pub fn clear(&self) -> StoreResult<usize> {
        clear(&self.dir)
    }

    pub fn accept(&self, bytes: &[u8], name: &str) -> StoreResult<PathBuf> {
        accept(&self.dir, bytes, name)
    }

    pub fn list_artifacts(&self, kinds: KindSet) -> impl Iterator<Item = PathBuf> {
        list_artifacts(&self.dir, kinds)
    }

    /// Start a new generation from uploaded bytes
    pub fn submit(&self, bytes: &[u8], name: &str) -> StoreResult<Artifact> {
        // Reject the name before anything is deleted
        validate_name(name)?;
        let removed = self.clear()?;
        debug!("cleared {} artifact(s) from {}", removed, self.dir.display());
        let path = self.accept(bytes, name)?;
        Ok(Artifact::new(path, ArtifactOrigin::Uploaded))
    }

    /// Start a new generation from a captured camera frame
    pub fn submit_capture(&self, frame: &DynamicImage) -> StoreResult<Artifact> {
        let removed = self.clear()?;
        debug!("cleared {} artifact(s) from {}", removed, self.dir.display());

        let path = self.dir.join(CAPTURED_IMAGE_NAME);
        frame
            .to_rgb8()
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|source| StoreError::Encode {
                path: path.clone(),
                source,
            })?;
        debug!("captured frame saved to {}", path.display());
        Ok(Artifact::new(path, ArtifactOrigin::Captured))
    }

    /// Read an artifact's bytes
    pub fn read(&self, name: &str) -> StoreResult<Vec<u8>> {
        let path = self.path_of(name)?;
        fs::read(&path).map_err(|e| StoreError::io("read", &path, e))
    }

    /// Copy an artifact into `destination`, returning the new path.
    ///
    /// Exporting into the store directory itself leaves the artifact in place.
    pub fn export<P: AsRef<Path>>(&self, name: &str, destination: P) -> StoreResult<PathBuf> {
        let source = self.path_of(name)?;
        let destination = destination.as_ref();
        if !source.is_file() {
            return Err(StoreError::io(
                "export",
                &source,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such artifact"),
            ));
        }
        ensure(destination)?;

        // fs::copy onto the same file truncates it
        if self.is_store_dir(destination)? {
            debug!("{} already in {}", name, destination.display());
            return Ok(source);
        }

        let target = destination.join(name);
        fs::copy(&source, &target).map_err(|e| StoreError::io("copy", &source, e))?;
        debug!("exported {} to {}", source.display(), target.display());
        Ok(target)
    }

    fn is_store_dir(&self, dir: &Path) -> StoreResult<bool> {
        let store = fs::canonicalize(&self.dir)
            .map_err(|e| StoreError::io("resolve", &self.dir, e))?;
        let dir = fs::canonicalize(dir).map_err(|e| StoreError::io("resolve", dir, e))?;
        Ok(store == dir)
    }
}

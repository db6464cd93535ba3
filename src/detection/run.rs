//! Upload/capture → detect flow over a result store

use image::DynamicImage;
use log::{info, warn};

use crate::config::Settings;
use crate::core::{
    Artifact, ArtifactOrigin, DetectionRequest, Detector, ResultStore, StoreResult,
};

use super::DetectionOutcome;

/// Build a request whose output directory is the store directory itself
pub fn request_for(store: &ResultStore, source: &Artifact, settings: &Settings) -> DetectionRequest {
    let (project, name) = store.project_and_name();
    DetectionRequest {
        weights: settings.weights.clone(),
        source: source.path.clone(),
        imgsz: settings.imgsz,
        conf_thres: settings.conf_thres,
        project,
        name,
        exist_ok: true,
        data: settings.data.clone(),
    }
}

/// Run `detector` on an artifact already in `store` and check for its output.
///
/// No cleanup happens on failure; whatever the detector left stays until the
/// next submission clears the store.
pub fn run_detection<D: Detector + ?Sized>(
    store: &ResultStore,
    detector: &mut D,
    source: &Artifact,
    settings: &Settings,
) -> DetectionOutcome {
    let request = request_for(store, source, settings);

    if let Err(err) = detector.run(&request) {
        warn!("detection on {} failed: {}", source.path.display(), err);
        return DetectionOutcome::DetectorFailed(err);
    }

    let expected = match request.expected_output() {
        Some(path) => path,
        None => {
            warn!("source {} has no file name", source.path.display());
            return DetectionOutcome::OutputMissing {
                expected: request.output_dir(),
            };
        }
    };

    if expected.is_file() {
        info!("detection output at {}", expected.display());
        DetectionOutcome::Completed(Artifact::new(expected, ArtifactOrigin::DetectionOutput))
    } else {
        warn!("detector produced no output at {}", expected.display());
        DetectionOutcome::OutputMissing { expected }
    }
}

/// Clear the store, accept uploaded bytes and run detection on them
pub fn detect_upload<D: Detector + ?Sized>(
    store: &ResultStore,
    detector: &mut D,
    settings: &Settings,
    bytes: &[u8],
    name: &str,
) -> StoreResult<DetectionOutcome> {
    let source = store.submit(bytes, name)?;
    Ok(run_detection(store, detector, &source, settings))
}

/// Clear the store, save a captured frame and run detection on it
pub fn detect_capture<D: Detector + ?Sized>(
    store: &ResultStore,
    detector: &mut D,
    settings: &Settings,
    frame: &DynamicImage,
) -> StoreResult<DetectionOutcome> {
    let source = store.submit_capture(frame)?;
    Ok(run_detection(store, detector, &source, settings))
}

// tests/store_test.rs
//
// Result store lifecycle through the public API: generations, listing and
// detection outcomes with in-process detectors.

mod test_utils;

use std::fs;

use sparrow::core::{accept, clear, ensure, list_artifacts};
use sparrow::detection::{detect_upload, run_detection, DetectionOutcome};
use sparrow::{
    ArtifactKind, ArtifactOrigin, DetectionRequest, DetectorError, KindSet, ResultStore,
    Settings,
};
use test_utils::file_names;

fn ok_detector(_: &DetectionRequest) -> Result<(), DetectorError> {
    Ok(())
}

#[test]
fn ensure_twice_leaves_directory_present() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("a").join("b").join("c");

    ensure(&dir).unwrap();
    ensure(&dir).unwrap();

    assert!(dir.is_dir());
}

#[test]
fn clear_removes_every_regular_file_and_keeps_subdirectories() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    for name in ["a.jpg", "b.png", "c.mp4", "labels.txt", "no_suffix"] {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }
    fs::create_dir_all(dir.join("exp").join("labels")).unwrap();
    fs::write(dir.join("exp").join("keep.jpg"), b"keep").unwrap();

    clear(dir).unwrap();

    assert!(file_names(dir).is_empty());
    assert!(dir.join("exp").join("keep.jpg").is_file());
    assert!(dir.join("exp").join("labels").is_dir());
}

#[test]
fn accept_round_trips_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    let path = accept(tmp.path(), &bytes, "x.jpg").unwrap();

    assert_eq!(path, tmp.path().join("x.jpg"));
    assert_eq!(fs::read(tmp.path().join("x.jpg")).unwrap(), bytes);
}

#[test]
fn accept_stores_invalid_content_unchecked() {
    let tmp = tempfile::tempdir().unwrap();
    accept(tmp.path(), b"definitely not a jpeg", "broken.jpg").unwrap();

    let listed: Vec<_> = list_artifacts(tmp.path(), KindSet::MEDIA).collect();
    assert_eq!(listed, vec![tmp.path().join("broken.jpg")]);
    assert!(image::open(tmp.path().join("broken.jpg")).is_err());
}

#[test]
fn listing_returns_only_allowed_suffixes() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    for name in ["a.JPG", "b.png", "c.mp4", "d.gif", "e.mov", "data.yaml", "best.pt"] {
        fs::write(dir.join(name), b"").unwrap();
    }

    let all: Vec<_> = list_artifacts(dir, KindSet::MEDIA)
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(all, vec!["a.JPG", "b.png", "c.mp4"]);

    let images = list_artifacts(dir, KindSet::IMAGES).count();
    assert_eq!(images, 2);
}

#[test]
fn upload_then_detect_reports_success_when_output_present() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ResultStore::open(tmp.path().join("detection_results")).unwrap();
    let settings = Settings::default();
    let mut detector = ok_detector;

    let outcome = detect_upload(&store, &mut detector, &settings, b"jpeg", "cat.jpg").unwrap();

    match outcome {
        DetectionOutcome::Completed(artifact) => {
            assert_eq!(artifact.path, store.dir().join("cat.jpg"));
            assert_eq!(artifact.kind, ArtifactKind::Image);
            assert_eq!(artifact.origin, ArtifactOrigin::DetectionOutput);
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[test]
fn upload_then_detect_warns_when_output_absent() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ResultStore::open(tmp.path()).unwrap();
    let settings = Settings::default();
    let mut detector = |req: &DetectionRequest| -> Result<(), DetectorError> {
        fs::remove_file(&req.source).map_err(|e| DetectorError::Other(e.to_string()))
    };

    let outcome = detect_upload(&store, &mut detector, &settings, b"jpeg", "cat.jpg").unwrap();

    assert!(!outcome.is_fatal());
    match outcome {
        DetectionOutcome::OutputMissing { expected } => {
            assert_eq!(expected, store.dir().join("cat.jpg"));
        }
        other => panic!("expected OutputMissing, got {:?}", other),
    }
}

#[test]
fn detector_writes_annotated_output_over_input() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ResultStore::open(tmp.path().join("output").join("detection_results")).unwrap();
    let settings = Settings::default();
    let mut detector = |req: &DetectionRequest| -> Result<(), DetectorError> {
        let target = req.expected_output().expect("source has a file name");
        fs::write(target, b"annotated").map_err(|e| DetectorError::Other(e.to_string()))
    };

    let source = store.submit(b"raw", "rice_bug.png").unwrap();
    let outcome = run_detection(&store, &mut detector, &source, &settings);

    assert!(outcome.is_success());
    assert_eq!(store.read("rice_bug.png").unwrap(), b"annotated");
}

#[test]
fn sequential_uploads_do_not_leak() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ResultStore::open(tmp.path()).unwrap();
    let settings = Settings::default();
    let mut detector = ok_detector;

    detect_upload(&store, &mut detector, &settings, b"first", "a.jpg").unwrap();
    detect_upload(&store, &mut detector, &settings, b"second", "b.jpg").unwrap();

    assert_eq!(file_names(store.dir()), vec!["b.jpg"]);
    let listed: Vec<_> = store.list_artifacts(KindSet::MEDIA).collect();
    assert_eq!(listed, vec![store.dir().join("b.jpg")]);
}

#[test]
fn reopening_store_keeps_current_generation() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("results");

    ResultStore::open(&dir).unwrap().submit(b"v", "clip.mp4").unwrap();
    let reopened = ResultStore::open(&dir).unwrap();

    assert_eq!(reopened.list_artifacts(KindSet::VIDEOS).count(), 1);
}

// tests/test_utils/mod.rs
//
// Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Store directory used inside a test workspace
pub fn store_dir(workspace: &Path) -> PathBuf {
    workspace.join("output").join("detection_results")
}

/// `sparrow` with an empty config file and the store inside `workspace`
pub fn sparrow(workspace: &Path) -> Command {
    let config = workspace.join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").expect("write config");
    }

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sparrow"));
    cmd.env_remove("SPARROW_CONFIG")
        .env_remove("SPARROW_OUTPUT_DIR")
        .env_remove("SPARROW_WEIGHTS")
        .env("RUST_LOG", "warn")
        .arg("--config")
        .arg(config)
        .arg("--output-dir")
        .arg(store_dir(workspace));
    cmd
}

/// Use `sh <script>` as the detector
pub fn with_detector_script(cmd: &mut Command, script: &Path) {
    cmd.arg("--detector-program")
        .arg("sh")
        .arg("--detector-script")
        .arg(script);
}

/// Write a shell script acting as the detector.
///
/// Arguments arrive as `--weights W --source S ...`, so `$4` is the source.
pub fn write_detector_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("detect.sh");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write detector script");
    path
}

/// Write a small valid JPEG
pub fn write_jpeg(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(16, 16, image::Rgb([40, 160, 60]))
        .save_with_format(&path, image::ImageFormat::Jpeg)
        .expect("write jpeg");
    path
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// File names directly inside `dir`, sorted
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

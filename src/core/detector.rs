// src/core/detector.rs
//
// Seam to the external object detector. The model is never loaded in
// process; a detector receives a request and, as a side effect, writes an
// annotated copy of the source under `project/name/`.

use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Everything the detector needs for one run. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRequest {
    /// Model checkpoint
    pub weights: PathBuf,
    /// Input image or video
    pub source: PathBuf,
    /// Inference size as (width, height)
    pub imgsz: (u32, u32),
    /// Minimum confidence for a box to be drawn
    pub conf_thres: f32,
    pub project: PathBuf,
    pub name: String,
    /// Reuse `project/name` if it already exists
    pub exist_ok: bool,
    /// Optional dataset description (class names)
    pub data: Option<PathBuf>,
}

impl DetectionRequest {
    /// Directory the detector writes into
    pub fn output_dir(&self) -> PathBuf {
        self.project.join(&self.name)
    }

    /// Where the annotated copy of `source` is expected to appear
    pub fn expected_output(&self) -> Option<PathBuf> {
        self.source
            .file_name()
            .map(|file_name| self.output_dir().join(file_name))
    }
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to start detector `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("detector exited with {}: {stderr}", exit_code_label(.code))]
    Failed { code: Option<i32>, stderr: String },

    #[error("{0}")]
    Other(String),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// A routine that runs detection on one request.
///
/// Calls block until the detector returns; there is no timeout.
pub trait Detector {
    fn run(&mut self, request: &DetectionRequest) -> Result<(), DetectorError>;
}

impl<F> Detector for F
where
    F: FnMut(&DetectionRequest) -> Result<(), DetectorError>,
{
    fn run(&mut self, request: &DetectionRequest) -> Result<(), DetectorError> {
        self(request)
    }
}

/// Runs a YOLO-style `detect` program as a child process.
///
/// The command line is `program [script] --weights W --source S --imgsz W H
/// --conf-thres C --project P --name N [--exist-ok] [--data D]`.
#[derive(Debug, Clone)]
pub struct ExternalDetector {
    program: PathBuf,
    script: Option<PathBuf>,
}

impl ExternalDetector {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            script: None,
        }
    }

    /// Script passed as the first argument, e.g. `detect.py` for `python`
    pub fn with_script<P: AsRef<Path>>(mut self, script: P) -> Self {
        self.script = Some(script.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for one request, script first
    pub fn args(&self, request: &DetectionRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if let Some(script) = &self.script {
            args.push(script.into());
        }

        args.push("--weights".into());
        args.push(request.weights.clone().into());
        args.push("--source".into());
        args.push(request.source.clone().into());
        args.push("--imgsz".into());
        args.push(request.imgsz.0.to_string().into());
        args.push(request.imgsz.1.to_string().into());
        args.push("--conf-thres".into());
        args.push(request.conf_thres.to_string().into());
        args.push("--project".into());
        args.push(request.project.clone().into());
        args.push("--name".into());
        args.push(request.name.clone().into());
        if request.exist_ok {
            args.push("--exist-ok".into());
        }
        if let Some(data) = &request.data {
            args.push("--data".into());
            args.push(data.into());
        }

        args
    }
}

impl Detector for ExternalDetector {
    fn run(&mut self, request: &DetectionRequest) -> Result<(), DetectorError> {
        let args = self.args(request);
        info!(
            "running detector {} on {}",
            self.program.display(),
            request.source.display()
        );
        debug!("detector args: {:?}", args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| DetectorError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(DetectorError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(
            "detector stdout: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }
}

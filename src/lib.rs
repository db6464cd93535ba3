//! Sparrow - AI-powered insect detection in plant fields
//!
//! A thin layer over a pretrained object detector. An uploaded image/video or
//! a captured camera frame is placed in a result store, an external detector
//! annotates it in place, and the result is listed for display and download.
//!
//! Detectable pests: leaf-folder, green-leafhopper, rice-bug, stem-borer and
//! whorl-maggot.
//!
//! ## Module Structure
//!
//! - `core` - Result store, artifact classification and the detector seam
//! - `detection` - Detection runs, typed outcomes and result listings
//! - `config` - Detection settings
//! - `cli` - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sparrow::config::Settings;
//! use sparrow::core::ResultStore;
//! use sparrow::detection::detect_upload;
//!
//! let settings = Settings::default();
//! let store = ResultStore::open(&settings.output_dir)?;
//! let mut detector = settings.external_detector();
//!
//! let outcome = detect_upload(&store, &mut detector, &settings, &bytes, "field.jpg")?;
//! println!("{}", outcome.description());
//! ```
//!
//! ## Store lifecycle
//!
//! | Step      | Effect                                               |
//! |-----------|------------------------------------------------------|
//! | `open`    | Output directory created if missing                  |
//! | `submit`  | Every file in the store removed, then input written  |
//! | detector  | Annotated copy written over the input's file name    |
//! | `list`    | Directory re-scanned for `.jpg`, `.png`, `.mp4`      |
//!
//! A store directory assumes a single writer. Concurrent sessions should each
//! use `ResultStore::for_session`.

// Result store and detector seam
pub mod core;

// Command-line interface
pub mod cli;

// Detection settings
pub mod config;

// Detection runs and listings
pub mod detection;

pub use crate::config::{Settings, SettingsBuilder};
pub use crate::core::{
    Artifact, ArtifactKind, ArtifactOrigin, DetectionRequest, Detector, DetectorError,
    ExternalDetector, KindSet, ResultStore, StoreError,
};
pub use crate::detection::{DetectionOutcome, GenerationListing};

// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{Args, Command};
pub use output::{format_listing, format_listing_json, format_outcome};

use anyhow::{bail, Context, Result};
use colorful::Colorful;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Settings;
use crate::core::{classify, ArtifactKind, KindSet, ResultStore};
use crate::detection::{self, DetectionOutcome, GenerationListing};

/// Run the CLI
pub fn run(args: Args) -> Result<()> {
    let settings = args.settings()?;

    if let Command::Config { save } = &args.command {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        if let Some(path) = save {
            settings.save(path)?;
        }
        return Ok(());
    }

    let store = open_store(&args, &settings)?;
    match &args.command {
        Command::Detect { file, store_only } => detect(&store, &settings, file, *store_only),
        Command::Capture { image } => capture(&store, &settings, image),
        Command::List { json, checksums } => list(&store, *json, *checksums, args.verbose),
        Command::Clear => {
            let removed = store.clear()?;
            println!("Removed {} file(s) from {}", removed, store.dir().display());
            Ok(())
        }
        Command::Export { name, to } => {
            let target = store.export(name, to)?;
            println!("Saved {}", target.display());
            Ok(())
        }
        Command::Config { .. } => Ok(()),
    }
}

fn open_store(args: &Args, settings: &Settings) -> Result<ResultStore> {
    let session = if args.new_session {
        let id = Uuid::new_v4();
        eprintln!("Session: {}", id);
        Some(id)
    } else {
        args.session
    };

    let store = match session {
        Some(id) => ResultStore::for_session(&settings.output_dir, &id)?,
        None => ResultStore::open(&settings.output_dir)?,
    };
    info!("result store at {}", store.dir().display());
    Ok(store)
}

fn detect(store: &ResultStore, settings: &Settings, file: &Path, store_only: bool) -> Result<()> {
    if classify(file) == ArtifactKind::Unknown {
        bail!(
            "Unsupported file type: {} (expected .jpg, .png or .mp4)",
            file.display()
        );
    }
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", file.display()))?;
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    if store_only {
        let artifact = store.submit(&bytes, name)?;
        println!("Stored {}", artifact.path.display());
        return Ok(());
    }

    let mut detector = settings.external_detector();
    let spinner = spinner("Running detection on the uploaded file...");
    let outcome = detection::detect_upload(store, &mut detector, settings, &bytes, name);
    spinner.finish_and_clear();

    report(outcome?)
}

fn capture(store: &ResultStore, settings: &Settings, image_path: &Path) -> Result<()> {
    let frame = image::open(image_path)
        .with_context(|| format!("Failed to decode image: {}", image_path.display()))?;

    let mut detector = settings.external_detector();
    let spinner = spinner("Detecting objects in the captured image...");
    let outcome = detection::detect_capture(store, &mut detector, settings, &frame);
    spinner.finish_and_clear();

    report(outcome?)
}

fn list(store: &ResultStore, json: bool, checksums: bool, verbose: bool) -> Result<()> {
    let listing = GenerationListing::scan(store, KindSet::MEDIA, checksums)?;
    if json {
        println!("{}", format_listing_json(&listing)?);
    } else {
        println!("{}", "Detected Pest".bold());
        print!("{}", format_listing(&listing, verbose));
        if listing.is_empty() {
            println!();
        }
    }
    Ok(())
}

fn report(outcome: DetectionOutcome) -> Result<()> {
    println!("{}", format_outcome(&outcome));
    match outcome {
        DetectionOutcome::DetectorFailed(err) => Err(err.into()),
        _ => Ok(()),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

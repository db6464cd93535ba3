//! CLI argument parsing

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::{Settings, SettingsBuilder};

#[derive(Parser, Debug)]
#[command(name = "sparrow", version)]
#[command(about = "AI-powered insect detection in plant fields")]
pub struct Args {
    /// Settings file (JSON)
    #[arg(short, long, global = true, env = "SPARROW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Result store directory
    #[arg(short, long, global = true, env = "SPARROW_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Model checkpoint passed to the detector
    #[arg(long, global = true, env = "SPARROW_WEIGHTS")]
    pub weights: Option<PathBuf>,

    /// Dataset yaml passed to the detector
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Confidence threshold (0.0 - 1.0)
    #[arg(long, global = true)]
    pub conf_thres: Option<f32>,

    /// Inference size, `640` or `640x480`
    #[arg(long, global = true, value_parser = parse_imgsz)]
    pub imgsz: Option<(u32, u32)>,

    /// Detector executable
    #[arg(long, global = true)]
    pub detector_program: Option<PathBuf>,

    /// Script passed to the detector executable (empty for none)
    #[arg(long, global = true)]
    pub detector_script: Option<PathBuf>,

    /// Use the store of an existing session under the output directory
    #[arg(long, global = true, conflicts_with = "new_session")]
    pub session: Option<Uuid>,

    /// Start a fresh session under the output directory
    #[arg(long, global = true)]
    pub new_session: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Upload an image or video and run detection on it
    Detect {
        /// Image (.jpg, .png) or video (.mp4)
        file: PathBuf,

        /// Only store the file, do not run detection
        #[arg(long)]
        store_only: bool,
    },

    /// Use an image as a captured camera frame and run detection on it
    Capture {
        /// Any image the decoder understands
        image: PathBuf,
    },

    /// List detected files in the store
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Include MD5 checksums
        #[arg(long)]
        checksums: bool,
    },

    /// Remove all files from the store
    Clear,

    /// Copy a file out of the store
    Export {
        /// File name inside the store
        name: String,

        /// Destination directory
        #[arg(long, default_value = ".")]
        to: PathBuf,
    },

    /// Print the effective settings as JSON
    Config {
        /// Also write them to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

impl Args {
    /// Settings from the config file with command-line overrides applied
    pub fn settings(&self) -> Result<Settings> {
        let base = Settings::load(self.config.as_deref())?;
        let mut builder = SettingsBuilder::from_settings(base);

        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir);
        }
        if let Some(weights) = &self.weights {
            builder = builder.weights(weights);
        }
        if let Some(data) = &self.data {
            builder = builder.data(data);
        }
        if let Some(conf) = self.conf_thres {
            if !(0.0..=1.0).contains(&conf) {
                anyhow::bail!("--conf-thres must be within 0.0-1.0, got {}", conf);
            }
            builder = builder.conf_thres(conf);
        }
        if let Some((width, height)) = self.imgsz {
            builder = builder.imgsz(width, height);
        }
        if let Some(program) = &self.detector_program {
            builder = builder.detector_program(program);
        }
        if let Some(script) = &self.detector_script {
            builder = builder.detector_script(script);
        }

        Ok(builder.build()?)
    }
}

/// Parse `640` (square) or `640x480`
fn parse_imgsz(s: &str) -> Result<(u32, u32), String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("Invalid image size: {}", s))
    };

    let (width, height) = match s.split_once(['x', 'X', ',']) {
        Some((w, h)) => (parse(w)?, parse(h)?),
        None => {
            let side = parse(s)?;
            (side, side)
        }
    };

    if width == 0 || height == 0 {
        return Err(format!("Image size must be non-zero: {}", s));
    }
    Ok((width, height))
}

// src/config/settings.rs
//
// Detection settings: model, thresholds, detector command and output root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::ExternalDetector;

pub const DEFAULT_OUTPUT_DIR: &str = "output/detection_results";
pub const DEFAULT_WEIGHTS: &str = "../best.pt";
pub const DEFAULT_CONF_THRES: f32 = 0.25;
pub const DEFAULT_IMGSZ: (u32, u32) = (640, 640);
pub const DEFAULT_DETECTOR_PROGRAM: &str = "python";
pub const DEFAULT_DETECTOR_SCRIPT: &str = "detect.py";

/// Config file looked up when no explicit path is given
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// How to launch the external detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorCommand {
    pub program: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
}

impl Default for DetectorCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_DETECTOR_PROGRAM),
            script: Some(PathBuf::from(DEFAULT_DETECTOR_SCRIPT)),
        }
    }
}

/// Complete detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Result store directory
    pub output_dir: PathBuf,
    /// Model checkpoint
    pub weights: PathBuf,
    /// Dataset yaml forwarded to the detector when set
    pub data: Option<PathBuf>,
    /// Confidence threshold (0.0-1.0)
    pub conf_thres: f32,
    /// Inference size as (width, height)
    pub imgsz: (u32, u32),
    pub detector: DetectorCommand,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            weights: PathBuf::from(DEFAULT_WEIGHTS),
            data: None,
            conf_thres: DEFAULT_CONF_THRES,
            imgsz: DEFAULT_IMGSZ,
            detector: DetectorCommand::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the per-user config file if it
    /// exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.conf_thres) {
            return Err(ConfigError::Invalid(format!(
                "conf_thres must be within 0.0-1.0, got {}",
                self.conf_thres
            )));
        }
        if self.imgsz.0 == 0 || self.imgsz.1 == 0 {
            return Err(ConfigError::Invalid(format!(
                "imgsz must be non-zero, got {}x{}",
                self.imgsz.0, self.imgsz.1
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir must not be empty".to_string()));
        }
        Ok(())
    }

    /// Detector configured by these settings
    pub fn external_detector(&self) -> ExternalDetector {
        let detector = ExternalDetector::new(&self.detector.program);
        match &self.detector.script {
            Some(script) => detector.with_script(script),
            None => detector,
        }
    }
}

/// `<config dir>/sparrow/config.json`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sparrow").join(CONFIG_FILE_NAME))
}

/// Builder for settings overrides
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.output_dir = dir.into();
        self
    }

    pub fn weights(mut self, weights: impl Into<PathBuf>) -> Self {
        self.settings.weights = weights.into();
        self
    }

    pub fn data(mut self, data: impl Into<PathBuf>) -> Self {
        self.settings.data = Some(data.into());
        self
    }

    pub fn conf_thres(mut self, threshold: f32) -> Self {
        self.settings.conf_thres = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn imgsz(mut self, width: u32, height: u32) -> Self {
        self.settings.imgsz = (width, height);
        self
    }

    pub fn detector_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.settings.detector.program = program.into();
        self
    }

    /// Set the script argument; an empty path removes it
    pub fn detector_script(mut self, script: impl Into<PathBuf>) -> Self {
        let script = script.into();
        self.settings.detector.script = if script.as_os_str().is_empty() {
            None
        } else {
            Some(script)
        };
        self
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

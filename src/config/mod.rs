//! Configuration module for Sparrow

mod settings;

pub use settings::{
    default_config_path, ConfigError, DetectorCommand, Settings, SettingsBuilder,
    DEFAULT_CONF_THRES, DEFAULT_IMGSZ, DEFAULT_OUTPUT_DIR, DEFAULT_WEIGHTS,
};

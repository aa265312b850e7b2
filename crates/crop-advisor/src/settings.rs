//! Layered Configuration
//!
//! Defaults, then `crop-advisor.toml` (or an explicit file), then
//! `CROP_ADVISOR__SECTION__KEY` environment variables.

use config::{Config, ConfigError, Environment, File};
use feature_validator::HeaderMode;
use predictor_client::PredictorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "crop-advisor";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CROP_ADVISOR";

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub predictor: PredictorConfig,
    pub images: ImageSettings,
    pub csv: CsvSettings,
    pub log: LogSettings,
}

/// Crop image lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Directory searched for `<crop>.jpg` / `<crop>.jpeg`
    pub dir: PathBuf,
    /// Also look up images for batch rows
    pub in_batch: bool,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            in_batch: false,
        }
    }
}

/// CSV upload handling
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    pub header: HeaderMode,
}

/// Logging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Max level: error, warn, info, debug, trace
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings; an explicit file must exist, the default one may not
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

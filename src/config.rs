// SPDX-License-Identifier: GPL-3.0-only

//! Persisted user settings
//!
//! Stored as JSON under the platform config directory. A missing file
//! yields [`Config::default`]; unknown or missing fields fall back to
//! their defaults so older files keep loading.

use crate::constants::{render, scanner};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "qraft";
const CONFIG_FILE_NAME: &str = "config.json";

/// Defaults handed to the QR renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Rendered size in pixels
    pub size: u32,
    /// Quiet zone in modules
    pub margin: u32,
    /// Foreground color (`#RRGGBB`)
    pub dark_color: String,
    /// Background color (`#RRGGBB`)
    pub light_color: String,
    /// Optional logo embedded in the center of the symbol
    pub logo: Option<String>,
    /// Longest accepted payload
    pub max_text_length: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: render::DEFAULT_SIZE,
            margin: render::DEFAULT_MARGIN,
            dark_color: render::DEFAULT_DARK_COLOR.to_string(),
            light_color: render::DEFAULT_LIGHT_COLOR.to_string(),
            logo: None,
            max_text_length: render::MAX_TEXT_LENGTH,
        }
    }
}

/// Camera scanning settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Capture device path
    pub device_path: String,
    /// Frames are downscaled to this dimension before decoding
    pub max_dimension: u32,
    /// Pause between frame attempts in milliseconds
    pub frame_interval_ms: u64,
}

impl ScannerSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            device_path: scanner::DEFAULT_DEVICE_PATH.to_string(),
            max_dimension: scanner::DEFAULT_MAX_DIMENSION,
            frame_interval_ms: scanner::DEFAULT_FRAME_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderSettings,
    pub scanner: ScannerSettings,
}

impl Config {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> AppResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`; a missing file is not an error
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }
}

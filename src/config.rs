use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::QUICK_PALETTE;
use crate::error::ConfigError;
use crate::state::{DEFAULT_COLOR, DEFAULT_WIDTH};

/// Start-up settings for a drawing session.
///
/// Loaded from JSON. Every field has a default, so a partial file (or no
/// file at all) is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old files
pub struct CanvasConfig {
    /// Brush color of a new session
    pub default_color: Color32,
    /// Brush width of a new session
    pub default_width: f32,
    /// Smallest width the brush slider offers
    pub min_width: f32,
    /// Largest width the brush slider offers
    pub max_width: f32,
    /// Swatches shown next to the canvas
    pub palette: Vec<Color32>,
    /// Where exports are written. Defaults to the platform pictures directory.
    pub export_dir: Option<PathBuf>,
    /// Exported files are named `<file_prefix>_<epoch-millis>.png`
    pub file_prefix: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR,
            default_width: DEFAULT_WIDTH,
            min_width: 1.0,
            max_width: 50.0,
            palette: QUICK_PALETTE.to_vec(),
            export_dir: None,
            file_prefix: "Drawing".to_string(),
        }
    }
}

impl CanvasConfig {
    /// Parses and validates a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading canvas config from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads `path` if it exists, otherwise falls back to the defaults.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No canvas config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_width.is_finite() && self.min_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_width must be positive, got {}",
                self.min_width
            )));
        }
        if !(self.max_width.is_finite() && self.max_width >= self.min_width) {
            return Err(ConfigError::Invalid(format!(
                "max_width ({}) must be at least min_width ({})",
                self.max_width, self.min_width
            )));
        }
        if !(self.min_width..=self.max_width).contains(&self.default_width) {
            return Err(ConfigError::Invalid(format!(
                "default_width ({}) must be within {}..={}",
                self.default_width, self.min_width, self.max_width
            )));
        }
        if self.file_prefix.is_empty() || self.file_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "file_prefix must be a plain, non-empty name, got {:?}",
                self.file_prefix
            )));
        }
        Ok(())
    }

    /// Clamps a slider value into the configured width range
    pub fn clamp_width(&self, width: f32) -> f32 {
        width.clamp(self.min_width, self.max_width)
    }
}

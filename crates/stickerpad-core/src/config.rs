//! Editor configuration.

use crate::drawables::SerializableColor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tunables for the canvas, tools and sticker palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Line width of the thin marker.
    pub thin_width: f64,
    /// Line width of the thick marker.
    pub thick_width: f64,
    /// Font size stickers are placed at.
    pub sticker_size: f64,
    /// Opacity of the sticker ghost under the pointer.
    pub preview_opacity: f64,
    pub stroke_color: SerializableColor,
    /// Initial sticker palette, in button order.
    pub stickers: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 256,
            canvas_height: 256,
            thin_width: 2.0,
            thick_width: 8.0,
            sticker_size: 32.0,
            preview_opacity: 0.8,
            stroke_color: SerializableColor::black(),
            stickers: vec!["🐱".to_string(), "🌵".to_string(), "🍕".to_string()],
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be non-zero (got {}x{})",
                self.canvas_width, self.canvas_height
            )));
        }
        for (name, value) in [
            ("thin_width", self.thin_width),
            ("thick_width", self.thick_width),
            ("sticker_size", self.sticker_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive (got {value})")));
            }
        }
        if !(0.0..=1.0).contains(&self.preview_opacity) {
            return Err(ConfigError::Invalid(format!(
                "preview_opacity must be within 0..=1 (got {})",
                self.preview_opacity
            )));
        }
        if self.stickers.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("stickers must not contain empty glyphs".into()));
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> kurbo::Size {
        kurbo::Size::new(self.canvas_width as f64, self.canvas_height as f64)
    }
}

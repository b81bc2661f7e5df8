//! Bake configuration file.
//!
//! Uses RON (Rust Object Notation) so stroke settings can be kept next to
//! the audio they are tuned for and edited by hand.

use serde::{Deserialize, Serialize};
use std::path::Path;
use waveplot_core::{Frames, defaults};

use crate::stroke::StrokeParams;

/// Current configuration format version
pub const CONFIG_VERSION: u32 = 1;

/// User-facing bake settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    /// Format version for future compatibility
    pub version: u32,

    /// Full visual stroke thickness in pixels
    pub line_width: f32,

    /// Horizontal pixel advance per sample
    pub x_step: f32,

    /// Viewport height; samples are centered and scaled to half of it
    pub viewport_height: f32,

    /// Optional miter clamp, in multiples of half the line width
    pub miter_limit: Option<f32>,

    /// Largest sample count baked and served by the index buffer
    pub capacity: Frames,

    /// Average all channels into one before baking
    pub down_mix: bool,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            line_width: defaults::LINE_WIDTH,
            x_step: defaults::X_STEP,
            viewport_height: defaults::VIEWPORT_HEIGHT,
            miter_limit: None,
            capacity: defaults::SAMPLE_CAPACITY,
            down_mix: true,
        }
    }
}

impl BakeConfig {
    /// Stroke parameters derived from these settings
    pub fn stroke_params(&self) -> StrokeParams {
        let params = StrokeParams::for_viewport(self.line_width, self.x_step, self.viewport_height);
        match self.miter_limit {
            Some(limit) => params.with_miter_limit(limit),
            None => params,
        }
    }

    /// Save configuration to a RON file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be written or serialization fails
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        std::fs::write(path.as_ref(), ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from a RON file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, deserialization fails, or the
    /// version is newer than this build understands
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let ron_string = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_ron(&ron_string)
    }

    /// Parse configuration from a RON string
    pub fn from_ron(ron_string: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(ron_string)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;

        // Validate version
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }

        Ok(config)
    }
}

/// Errors that can occur while reading or writing configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

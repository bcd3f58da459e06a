//! Measure tool options with TOML preset support.
//!
//! Picking behavior, the synthetic build plate and the demo camera are
//! consolidated here. Options serialize to/from TOML; every section uses
//! `#[serde(default)]` so partial files work.

mod build_plate;
mod camera;
mod picking;

use std::path::Path;

pub use build_plate::BuildPlateOptions;
pub use camera::CameraOptions;
pub use picking::{PickingOptions, MAX_RENDER_SCALE};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Pick rendering and cache policy.
    pub picking: PickingOptions,
    /// Synthetic build plate.
    pub build_plate: BuildPlateOptions,
    /// Demo camera parameters.
    pub camera: CameraOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`MeasureError::OptionsParse`] on malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, MeasureError> {
        toml::from_str(content)
            .map_err(|e| MeasureError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`MeasureError::Io`] if the file cannot be read, or
    /// [`MeasureError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, MeasureError> {
        let content = std::fs::read_to_string(path).map_err(MeasureError::Io)?;
        let options = Self::from_toml_str(&content)?;
        log::info!("loaded measure options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`MeasureError::OptionsParse`] if serialization fails, or
    /// [`MeasureError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MeasureError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MeasureError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MeasureError::Io)?;
        }
        std::fs::write(path, content).map_err(MeasureError::Io)
    }
}

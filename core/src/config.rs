//! Fur configuration
//!
//! `FurSettings` are the live parameters the generator works from. `Config`
//! is the on-disk TOML document: settings plus control limits, material and an
//! optional random seed. Every section falls back to defaults when missing.

use serde::{Deserialize, Serialize};

use crate::controls::Limits;
use crate::error::{FurError, FurResult};
use crate::line_model::Material;
use crate::segments::Orientation;

/// Parameters that shape the generated fur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FurSettings {
    /// Base hair length; each hair is 20-100% of this (default: 0.1)
    #[serde(default = "default_length")]
    pub length: f32,
    /// Subdivision depth per face (default: 3)
    #[serde(default = "default_density")]
    pub density: u32,
    /// Hair direction mode (default: normal)
    #[serde(default)]
    pub orientation: Orientation,
}

fn default_length() -> f32 {
    0.1
}
fn default_density() -> u32 {
    3
}

impl Default for FurSettings {
    fn default() -> Self {
        Self {
            length: default_length(),
            density: default_density(),
            orientation: Orientation::default(),
        }
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Fixed seed for reproducible fur; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Initial fur parameters
    #[serde(default)]
    pub fur: FurSettings,
    /// Bounds for interactive edits
    #[serde(default)]
    pub limits: Limits,
    /// Fur shading
    #[serde(default)]
    pub material: Material,
}

impl Config {
    /// Check that the initial settings respect the configured limits.
    ///
    /// # Errors
    ///
    /// Returns [`FurError::InvalidSettings`] describing the first problem found.
    pub fn validate(&self) -> FurResult<()> {
        let limits = &self.limits;
        if limits.density_min > limits.density_max {
            return Err(FurError::InvalidSettings(format!(
                "density range {}..={} is empty",
                limits.density_min, limits.density_max
            )));
        }
        if !(limits.length_min > 0.0 && limits.length_min <= limits.length_max) {
            return Err(FurError::InvalidSettings(format!(
                "length range {}..={} is invalid",
                limits.length_min, limits.length_max
            )));
        }
        if !limits.contains(&self.fur) {
            return Err(FurError::InvalidSettings(format!(
                "length {} / density {} outside limits",
                self.fur.length, self.fur.density
            )));
        }
        Ok(())
    }
}

//! Interactive fur controls and their bounds
//!
//! The input layer owns the range policy: a step that would leave the allowed
//! range is dropped instead of reaching the generator.

use serde::{Deserialize, Serialize};

use crate::config::FurSettings;
use crate::segments::Orientation;

/// A single user adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurControl {
    /// One more subdivision level
    DensityUp,
    /// One fewer subdivision level
    DensityDown,
    /// Longer hair
    LengthUp,
    /// Shorter hair
    LengthDown,
    /// Switch (or re-roll) the orientation mode
    Orientation(Orientation),
}

impl FurControl {
    /// Map a key name to a control.
    ///
    /// `l`/`k` lengthen/shorten, `m`/`n` densify/thin, `b` combs every hair
    /// one way, `v` resets to normal-aligned.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "l" => Some(FurControl::LengthUp),
            "k" => Some(FurControl::LengthDown),
            "m" => Some(FurControl::DensityUp),
            "n" => Some(FurControl::DensityDown),
            "b" => Some(FurControl::Orientation(Orientation::Shared)),
            "v" => Some(FurControl::Orientation(Orientation::Normal)),
            _ => None,
        }
    }
}

/// Allowed ranges and step sizes for interactive edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Lowest subdivision density (default: 0)
    #[serde(default)]
    pub density_min: u32,
    /// Highest subdivision density (default: 10)
    #[serde(default = "default_density_max")]
    pub density_max: u32,
    /// Shortest base length (default: 0.02)
    #[serde(default = "default_length_min")]
    pub length_min: f32,
    /// Longest base length (default: 1.0)
    #[serde(default = "default_length_max")]
    pub length_max: f32,
    /// Length change per key press (default: 0.01)
    #[serde(default = "default_length_step")]
    pub length_step: f32,
}

fn default_density_max() -> u32 {
    10
}
fn default_length_min() -> f32 {
    0.02
}
fn default_length_max() -> f32 {
    1.0
}
fn default_length_step() -> f32 {
    0.01
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            density_min: 0,
            density_max: default_density_max(),
            length_min: default_length_min(),
            length_max: default_length_max(),
            length_step: default_length_step(),
        }
    }
}

impl Limits {
    /// Whether `settings` lie inside these limits
    pub fn contains(&self, settings: &FurSettings) -> bool {
        let tolerance = self.tolerance();
        (self.density_min..=self.density_max).contains(&settings.density)
            && settings.length >= self.length_min - tolerance
            && settings.length <= self.length_max + tolerance
    }

    /// Settings after applying `control`, or `None` if the step is rejected.
    pub fn next(&self, settings: &FurSettings, control: FurControl) -> Option<FurSettings> {
        let mut next = *settings;
        match control {
            FurControl::DensityUp => {
                next.density = settings.density.checked_add(1)?;
                (next.density <= self.density_max).then_some(next)
            }
            FurControl::DensityDown => {
                next.density = settings.density.checked_sub(1)?;
                (next.density >= self.density_min).then_some(next)
            }
            FurControl::LengthUp => {
                next.length = self.snap(settings.length + self.length_step);
                (next.length <= self.length_max + self.tolerance()).then(|| {
                    next.length = next.length.min(self.length_max);
                    next
                })
            }
            FurControl::LengthDown => {
                next.length = self.snap(settings.length - self.length_step);
                (next.length >= self.length_min - self.tolerance()).then(|| {
                    next.length = next.length.max(self.length_min);
                    next
                })
            }
            FurControl::Orientation(orientation) => {
                next.orientation = orientation;
                Some(next)
            }
        }
    }

    /// Round onto the step grid so repeated steps do not drift.
    fn snap(&self, length: f32) -> f32 {
        if self.length_step > 0.0 {
            (length / self.length_step).round() * self.length_step
        } else {
            length
        }
    }

    fn tolerance(&self) -> f32 {
        self.length_step.abs() * 1e-3 + f32::EPSILON
    }
}

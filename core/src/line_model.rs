//! Renderable line model contract
//!
//! The fur generator never talks to the GPU. It hands finished [`LineModel`]s
//! to a [`LineSink`], which uploads them and returns a handle. Handing the
//! handle back through [`LineSink::remove_lines`] is the only way to release
//! it, so each model is released exactly once.

use serde::{Deserialize, Serialize};

use crate::segments::LineBuffer;

/// Phong material used to shade fur lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Ambient reflectivity
    #[serde(default)]
    pub ambient: [f32; 3],
    /// Diffuse reflectivity
    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],
    /// Specular reflectivity
    #[serde(default = "default_specular")]
    pub specular: [f32; 3],
    /// Specular exponent
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

fn default_diffuse() -> [f32; 3] {
    [0.5, 0.35, 0.25]
}
fn default_specular() -> [f32; 3] {
    [0.4, 0.3, 0.25]
}
fn default_shininess() -> f32 {
    5.0
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.0, 0.0, 0.0],
            diffuse: default_diffuse(),
            specular: default_specular(),
            shininess: default_shininess(),
        }
    }
}

/// A line list plus the material it is drawn with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineModel {
    /// Root/tip pairs and their normals
    pub buffer: LineBuffer,
    /// Shading parameters
    pub material: Material,
}

/// Scene-side owner of uploaded line models.
pub trait LineSink {
    /// Token identifying an uploaded model
    type Handle;

    /// Upload `model` and register it for drawing
    fn add_lines(&mut self, model: &LineModel) -> Self::Handle;

    /// Unregister a model and release its GPU resources
    fn remove_lines(&mut self, handle: Self::Handle);
}

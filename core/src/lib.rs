//! Procedural fur generation for Furview
//!
//! Grows short line-segment "hairs" out of a base mesh. Extra hair roots are
//! placed by recursively subdividing every face around a jittered centroid;
//! each root then gets a tip along its normal (or one shared direction).
//!
//! # Example
//! ```
//! use std::sync::Arc;
//!
//! use furview_core::{BaseMesh, Faces, Fur, FurSettings, LineModel, LineSink, Material};
//! use glam::Vec3;
//! use rand::SeedableRng;
//! use rand_pcg::Pcg64;
//!
//! #[derive(Default)]
//! struct Scene {
//!     live: Vec<usize>,
//! }
//!
//! impl LineSink for Scene {
//!     type Handle = usize;
//!
//!     fn add_lines(&mut self, model: &LineModel) -> usize {
//!         self.live.push(model.buffer.len());
//!         self.live.len() - 1
//!     }
//!
//!     fn remove_lines(&mut self, _handle: usize) {}
//! }
//!
//! let mesh = BaseMesh::new(
//!     vec![Vec3::ZERO, Vec3::X, Vec3::Y],
//!     Some(vec![Vec3::Z; 3]),
//!     Faces::Triangles(vec![[0, 1, 2]]),
//! )?;
//! let settings = FurSettings { length: 1.0, density: 1, ..Default::default() };
//! let mut fur = Fur::new(
//!     Arc::new(mesh),
//!     settings,
//!     Material::default(),
//!     Scene::default(),
//!     Pcg64::seed_from_u64(1),
//! )?;
//!
//! assert_eq!(fur.roots().len(), 4);
//! assert_eq!(fur.lines().len(), 8);
//!
//! // Longer hair reuses the existing roots
//! fur.set_length(0.5);
//! assert_eq!(fur.roots().len(), 4);
//! # Ok::<(), furview_core::FurError>(())
//! ```

pub mod config;
pub mod controls;
pub mod error;
pub mod fur;
pub mod line_model;
pub mod mesh;
pub mod roots;
pub mod segments;
pub mod subdivide;

pub use config::{Config, FurSettings};
pub use controls::{FurControl, Limits};
pub use error::{FurError, FurResult};
pub use fur::Fur;
pub use line_model::{LineModel, LineSink, Material};
pub use mesh::{compute_vertex_normals, BaseMesh, Faces};
pub use roots::{build_roots, expected_root_count, HairRoots};
pub use segments::{compute_segments, LineBuffer, Orientation};
pub use subdivide::{centroid_count, subdivide, subdivide_into, Bulbs};

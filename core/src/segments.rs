//! Hair end points and the line buffer handed to the renderer

use bytemuck::cast_slice;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::roots::HairRoots;

/// Shortest hair relative to the base length, in tenths.
pub const MIN_LENGTH_TENTHS: u32 = 2;
/// Longest hair relative to the base length, in tenths.
pub const MAX_LENGTH_TENTHS: u32 = 10;

/// Which direction hairs grow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Every hair follows its own root normal
    #[default]
    Normal,
    /// Every hair follows one root normal picked at random per rebuild
    Shared,
}

/// Flat line list: `positions` alternates root, tip; each pair shares a normal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBuffer {
    /// Root/tip positions, two per hair
    pub positions: Vec<Vec3>,
    /// Normals, duplicated for each root/tip pair
    pub normals: Vec<Vec3>,
}

impl LineBuffer {
    /// Number of line vertices (twice the hair count)
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the buffer has no lines
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of hairs
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// Iterate over `(root, tip)` pairs
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.positions.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Positions as raw bytes for vertex buffer upload
    pub fn position_bytes(&self) -> &[u8] {
        cast_slice(&self.positions)
    }

    /// Normals as raw bytes for vertex buffer upload
    pub fn normal_bytes(&self) -> &[u8] {
        cast_slice(&self.normals)
    }
}

/// Grow one hair from every root.
///
/// Each hair gets its own length, `length * k / 10` with `k` drawn from
/// `2..=10`. In [`Orientation::Shared`] mode a single root normal is drawn once
/// and used for every tip.
pub fn compute_segments<R: Rng>(
    roots: &HairRoots,
    length: f32,
    orientation: Orientation,
    rng: &mut R,
) -> LineBuffer {
    let count = roots.len();
    let mut positions = Vec::with_capacity(count * 2);
    let mut normals = Vec::with_capacity(count * 2);

    if count == 0 {
        return LineBuffer { positions, normals };
    }

    let shared = match orientation {
        Orientation::Normal => None,
        Orientation::Shared => Some(roots.normals[rng.random_range(0..count)]),
    };

    for (&root, &normal) in roots.positions.iter().zip(&roots.normals) {
        let tenths = rng.random_range(MIN_LENGTH_TENTHS..=MAX_LENGTH_TENTHS);
        let hair_length = length * (tenths as f32 / 10.0);
        let direction = shared.unwrap_or(normal);

        positions.push(root);
        positions.push(root + direction * hair_length);
        normals.push(normal);
        normals.push(normal);
    }

    LineBuffer { positions, normals }
}

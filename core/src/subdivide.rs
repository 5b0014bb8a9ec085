//! Recursive face subdivision for hair bulb placement
//!
//! Each level emits one jittered centroid per face, then fans the face into
//! triangles around that centroid and recurses. Normals are averaged alongside
//! positions but are left unnormalized; the caller renormalizes once after all
//! bulbs are collected.

use glam::Vec3;
use rand::Rng;

use crate::error::{FurError, FurResult};

/// Largest jitter step (in tenths) applied to a centroid.
const MAX_JITTER_TENTHS: u32 = 5;

/// Bulb positions and normals emitted by subdivision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bulbs {
    /// Bulb positions
    pub positions: Vec<Vec3>,
    /// Bulb normals (not normalized)
    pub normals: Vec<Vec3>,
}

impl Bulbs {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collector with room for `capacity` bulbs
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
        }
    }

    /// Number of bulbs
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no bulbs were emitted
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push(&mut self, position: Vec3, normal: Vec3) {
        self.positions.push(position);
        self.normals.push(normal);
    }
}

/// Subdivide one face to `depth` levels and return the emitted bulbs.
///
/// `vertices` and `normals` are the face corners in winding order.
///
/// # Errors
///
/// Returns an error if the face is not a triangle or quad, or if the corner
/// lists differ in length. A depth of 0 always succeeds with no bulbs.
pub fn subdivide<R: Rng>(
    vertices: &[Vec3],
    normals: &[Vec3],
    depth: u32,
    rng: &mut R,
) -> FurResult<Bulbs> {
    let mut bulbs = Bulbs::new();
    subdivide_into(vertices, normals, depth, rng, &mut bulbs)?;
    Ok(bulbs)
}

/// Subdivide one face, appending bulbs to `out`.
///
/// Same contract as [`subdivide`], but lets a caller collect many faces into
/// one buffer.
pub fn subdivide_into<R: Rng>(
    vertices: &[Vec3],
    normals: &[Vec3],
    depth: u32,
    rng: &mut R,
    out: &mut Bulbs,
) -> FurResult<()> {
    if depth == 0 {
        return Ok(());
    }

    if vertices.len() != 3 && vertices.len() != 4 {
        return Err(FurError::UnsupportedArity {
            face: 0,
            arity: vertices.len(),
        });
    }
    if normals.len() != vertices.len() {
        return Err(FurError::CornerCountMismatch {
            vertices: vertices.len(),
            normals: normals.len(),
        });
    }

    match (vertices, normals) {
        (&[v0, v1, v2], &[n0, n1, n2]) => {
            subdivide_triangle([v0, v1, v2], [n0, n1, n2], depth, rng, out);
        }
        (&[v0, v1, v2, v3], &[n0, n1, n2, n3]) => {
            let (c, cn) = jittered_centroid(vertices, normals, rng);
            out.push(c, cn);
            if depth > 1 {
                let quad_v = [v0, v1, v2, v3];
                let quad_n = [n0, n1, n2, n3];
                for i in 0..4 {
                    let j = (i + 1) % 4;
                    subdivide_triangle(
                        [quad_v[i], quad_v[j], c],
                        [quad_n[i], quad_n[j], cn],
                        depth - 1,
                        rng,
                        out,
                    );
                }
            }
        }
        _ => unreachable!("arity checked above"),
    }

    Ok(())
}

fn subdivide_triangle<R: Rng>(
    vertices: [Vec3; 3],
    normals: [Vec3; 3],
    depth: u32,
    rng: &mut R,
    out: &mut Bulbs,
) {
    if depth == 0 {
        return;
    }

    let (c, cn) = jittered_centroid(&vertices, &normals, rng);
    out.push(c, cn);

    if depth > 1 {
        let [v0, v1, v2] = vertices;
        let [n0, n1, n2] = normals;
        subdivide_triangle([v0, v1, c], [n0, n1, cn], depth - 1, rng, out);
        subdivide_triangle([v0, v2, c], [n0, n2, cn], depth - 1, rng, out);
        subdivide_triangle([v1, v2, c], [n1, n2, cn], depth - 1, rng, out);
    }
}

/// Face centroid pulled a random 0-50% of the way toward the first corner.
///
/// Plain centroids form a visibly regular lattice once a few levels stack up.
fn jittered_centroid<R: Rng>(
    vertices: &[Vec3],
    normals: &[Vec3],
    rng: &mut R,
) -> (Vec3, Vec3) {
    let count = vertices.len() as f32;
    let centroid = vertices.iter().copied().sum::<Vec3>() / count;
    let normal = normals.iter().copied().sum::<Vec3>() / count;

    let tenths = rng.random_range(0..=MAX_JITTER_TENTHS);
    let offset = (vertices[0] - centroid) * (tenths as f32 / 10.0);

    (centroid + offset, normal)
}

/// Number of bulbs one face of `arity` corners emits at `depth`.
///
/// The top level fans an n-gon into n triangles, so only the first step
/// depends on arity.
pub fn centroid_count(arity: usize, depth: u32) -> usize {
    if depth == 0 {
        return 0;
    }
    arity.saturating_mul(triangle_count(depth - 1)).saturating_add(1)
}

fn triangle_count(depth: u32) -> usize {
    (0..depth).fold(0usize, |count, _| count.saturating_mul(3).saturating_add(1))
}

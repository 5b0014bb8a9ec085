//! Base mesh supplied by the importer
//!
//! A `BaseMesh` is one connected surface: vertex positions, one normal per
//! vertex, and faces that are either all triangles or all quads. The topology
//! is decided once when the mesh is built and carried as a tagged variant so
//! later stages never have to re-inspect array shapes.

use glam::Vec3;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::{FurError, FurResult};

/// Corner list for a single face (3 or 4 entries).
pub type Corners = SmallVec<[Vec3; 4]>;

/// Face list of a mesh, tagged by arity.
#[derive(Debug, Clone, PartialEq)]
pub enum Faces {
    /// Triangle mesh
    Triangles(Vec<[u32; 3]>),
    /// Quad mesh
    Quads(Vec<[u32; 4]>),
}

impl Default for Faces {
    fn default() -> Self {
        Faces::Triangles(Vec::new())
    }
}

impl Faces {
    /// Build a face list from raw polygons.
    ///
    /// The first face fixes the arity. Any face that is not a triangle or quad,
    /// or that disagrees with the first face, is rejected with its index.
    pub fn from_polygons<P: AsRef<[u32]>>(polygons: &[P]) -> FurResult<Self> {
        let Some(first) = polygons.first() else {
            return Ok(Faces::default());
        };

        let arity = first.as_ref().len();
        if arity != 3 && arity != 4 {
            return Err(FurError::UnsupportedArity { face: 0, arity });
        }

        for (face, polygon) in polygons.iter().enumerate() {
            let found = polygon.as_ref().len();
            if found != 3 && found != 4 {
                return Err(FurError::UnsupportedArity { face, arity: found });
            }
            if found != arity {
                return Err(FurError::MixedArity {
                    face,
                    expected: arity,
                    found,
                });
            }
        }

        let faces = if arity == 3 {
            Faces::Triangles(
                polygons
                    .iter()
                    .map(|p| {
                        let p = p.as_ref();
                        [p[0], p[1], p[2]]
                    })
                    .collect(),
            )
        } else {
            Faces::Quads(
                polygons
                    .iter()
                    .map(|p| {
                        let p = p.as_ref();
                        [p[0], p[1], p[2], p[3]]
                    })
                    .collect(),
            )
        };
        Ok(faces)
    }

    /// Corners per face (3 or 4)
    pub fn arity(&self) -> usize {
        match self {
            Faces::Triangles(_) => 3,
            Faces::Quads(_) => 4,
        }
    }

    /// Number of faces
    pub fn len(&self) -> usize {
        match self {
            Faces::Triangles(faces) => faces.len(),
            Faces::Quads(faces) => faces.len(),
        }
    }

    /// Whether there are no faces
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vertex indices of face `i`
    pub fn indices(&self, i: usize) -> &[u32] {
        match self {
            Faces::Triangles(faces) => &faces[i],
            Faces::Quads(faces) => &faces[i],
        }
    }

    /// Iterate over the vertex indices of every face
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.len()).map(move |i| self.indices(i))
    }
}

/// A validated, read-only surface that fur is grown on.
#[derive(Debug, Clone, Default)]
pub struct BaseMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Faces,
}

impl BaseMesh {
    /// Create a mesh, synthesizing normals when none are supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if a face references a missing vertex or if the
    /// supplied normal array has a different length than `positions`.
    pub fn new(positions: Vec<Vec3>, normals: Option<Vec<Vec3>>, faces: Faces) -> FurResult<Self> {
        let vertex_count = positions.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(FurError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        let normals = match normals {
            Some(normals) => {
                if normals.len() != vertex_count {
                    return Err(FurError::NormalCountMismatch {
                        vertices: vertex_count,
                        normals: normals.len(),
                    });
                }
                normals
            }
            None => {
                warn!("No normal array was provided, computing from faces");
                compute_vertex_normals(&positions, &faces)
            }
        };

        debug!(
            "Base mesh: {} vertices, {} faces, {} corners per face",
            vertex_count,
            faces.len(),
            faces.arity()
        );

        Ok(Self {
            positions,
            normals,
            faces,
        })
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex normals
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Face list
    pub fn faces(&self) -> &Faces {
        &self.faces
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Gather the corner positions and normals of face `i`.
    pub fn face_corners(&self, i: usize) -> (Corners, Corners) {
        let indices = self.faces.indices(i);
        let vertices = indices.iter().map(|&v| self.positions[v as usize]).collect();
        let normals = indices.iter().map(|&v| self.normals[v as usize]).collect();
        (vertices, normals)
    }
}

/// Compute per-vertex normals by summing adjacent face normals.
///
/// Face normals come from the cross product of the first two edges, so larger
/// faces weigh more. Vertices without a usable face normal end up as zero.
pub fn compute_vertex_normals(positions: &[Vec3], faces: &Faces) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for indices in faces.iter() {
        let p0 = positions[indices[0] as usize];
        let p1 = positions[indices[1] as usize];
        let p2 = positions[indices[2] as usize];
        let face_normal = (p1 - p0).cross(p2 - p0);

        for &v in indices {
            normals[v as usize] += face_normal;
        }
    }

    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}

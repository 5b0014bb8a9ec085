//! Hair root set construction

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::error::FurResult;
use crate::mesh::BaseMesh;
use crate::subdivide::{centroid_count, subdivide_into, Bulbs};

/// Upper bound on bulbs reserved up front; larger sets grow on demand.
const MAX_RESERVE: usize = 1 << 22;

/// Positions and unit normals every hair grows from.
///
/// The first `mesh.vertex_count()` entries are the original vertices, followed
/// by subdivision bulbs in face order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HairRoots {
    /// Root positions
    pub positions: Vec<Vec3>,
    /// Root normals, unit length (or zero where the source normal was zero)
    pub normals: Vec<Vec3>,
}

impl HairRoots {
    /// Number of roots
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no roots
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Build the full root set for `mesh` at the given subdivision `density`.
///
/// Normals are renormalized in a single pass after all bulbs are gathered.
///
/// # Errors
///
/// Propagates subdivision errors; a `BaseMesh` only holds triangles or quads,
/// so this only fails on a corrupted face list.
pub fn build_roots<R: Rng>(mesh: &BaseMesh, density: u32, rng: &mut R) -> FurResult<HairRoots> {
    let per_face = centroid_count(mesh.faces().arity(), density);
    let extra = per_face.saturating_mul(mesh.face_count());

    let mut bulbs = Bulbs::with_capacity(extra.min(MAX_RESERVE));
    if density > 0 {
        for face in 0..mesh.face_count() {
            let (vertices, normals) = mesh.face_corners(face);
            subdivide_into(&vertices, &normals, density, rng, &mut bulbs)?;
        }
    }

    debug!(
        "Subdivided {} faces at density {}: {} bulbs",
        mesh.face_count(),
        density,
        bulbs.len()
    );

    let mut positions = Vec::with_capacity(mesh.vertex_count() + bulbs.len());
    positions.extend_from_slice(mesh.positions());
    positions.append(&mut bulbs.positions);

    let mut normals = Vec::with_capacity(positions.len());
    normals.extend_from_slice(mesh.normals());
    normals.append(&mut bulbs.normals);
    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }

    Ok(HairRoots { positions, normals })
}

/// Root count `build_roots` will produce for `mesh` at `density`.
pub fn expected_root_count(mesh: &BaseMesh, density: u32) -> usize {
    centroid_count(mesh.faces().arity(), density)
        .saturating_mul(mesh.face_count())
        .saturating_add(mesh.vertex_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Faces;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn two_triangles() -> BaseMesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let normals = vec![
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.3, 0.0, 1.0),
            Vec3::new(0.0, 0.3, 1.0),
            Vec3::new(-0.2, -0.2, 1.0),
        ];
        let faces = Faces::Triangles(vec![[0, 1, 2], [0, 2, 3]]);
        BaseMesh::new(positions, Some(normals), faces).unwrap()
    }

    #[test]
    fn test_density_zero_returns_vertices() {
        let mesh = two_triangles();
        let roots = build_roots(&mesh, 0, &mut Pcg64::seed_from_u64(1)).unwrap();
        assert_eq!(roots.positions, mesh.positions());
        assert_eq!(roots.len(), mesh.vertex_count());
    }

    #[test]
    fn test_root_count_matches_formula() {
        let mesh = two_triangles();
        for density in 0..6 {
            let roots = build_roots(&mesh, density, &mut Pcg64::seed_from_u64(2)).unwrap();
            assert_eq!(roots.len(), expected_root_count(&mesh, density));
            assert_eq!(roots.normals.len(), roots.len());
        }
        assert_eq!(expected_root_count(&mesh, 3), 4 + 2 * 13);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = two_triangles();
        let roots = build_roots(&mesh, 4, &mut Pcg64::seed_from_u64(3)).unwrap();
        for normal in &roots.normals {
            assert!((normal.length() - 1.0).abs() < 1e-5, "{normal}");
        }
    }

    #[test]
    fn test_original_vertices_come_first() {
        let mesh = two_triangles();
        let roots = build_roots(&mesh, 2, &mut Pcg64::seed_from_u64(4)).unwrap();
        assert_eq!(&roots.positions[..4], mesh.positions());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = BaseMesh::default();
        let roots = build_roots(&mesh, 5, &mut Pcg64::seed_from_u64(5)).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_faceless_mesh_keeps_vertices() {
        let mesh = BaseMesh::new(vec![Vec3::ZERO, Vec3::X], Some(vec![Vec3::Y; 2]), Faces::default())
            .unwrap();
        let roots = build_roots(&mesh, 3, &mut Pcg64::seed_from_u64(6)).unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots.normals, vec![Vec3::Y; 2]);
    }

    #[test]
    fn test_zero_normal_stays_zero() {
        let mesh = BaseMesh::new(vec![Vec3::ZERO], Some(vec![Vec3::ZERO]), Faces::default()).unwrap();
        let roots = build_roots(&mesh, 0, &mut Pcg64::seed_from_u64(7)).unwrap();
        assert_eq!(roots.normals[0], Vec3::ZERO);
    }
}

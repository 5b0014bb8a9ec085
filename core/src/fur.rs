//! Fur generator
//!
//! Owns the hair root set and the displayed line model for one mesh. Density
//! changes rebuild everything because the subdivision topology changes with
//! depth. Length and orientation changes keep the roots and only regrow tips.
//!
//! All work runs synchronously on the caller's thread. A very high density
//! stalls the caller until subdivision finishes; work is not split across frames.

use std::sync::Arc;

use rand::Rng;
use tracing::info;

use crate::config::FurSettings;
use crate::controls::{FurControl, Limits};
use crate::error::FurResult;
use crate::line_model::{LineModel, LineSink, Material};
use crate::mesh::BaseMesh;
use crate::roots::{build_roots, HairRoots};
use crate::segments::{compute_segments, LineBuffer, Orientation};

/// Procedural fur on one base mesh.
pub struct Fur<S: LineSink, R: Rng> {
    mesh: Arc<BaseMesh>,
    settings: FurSettings,
    roots: HairRoots,
    model: LineModel,
    handle: Option<S::Handle>,
    sink: S,
    rng: R,
}

impl<S: LineSink, R: Rng> Fur<S, R> {
    /// Grow fur on `mesh` and register it with `sink`.
    ///
    /// # Errors
    ///
    /// Fails only if the mesh face list cannot be subdivided.
    pub fn new(
        mesh: Arc<BaseMesh>,
        settings: FurSettings,
        material: Material,
        sink: S,
        mut rng: R,
    ) -> FurResult<Self> {
        info!(
            "Initialising fur: {} vertices, {} faces, density {}, length {}",
            mesh.vertex_count(),
            mesh.face_count(),
            settings.density,
            settings.length
        );

        let roots = build_roots(&mesh, settings.density, &mut rng)?;
        let buffer = compute_segments(&roots, settings.length, settings.orientation, &mut rng);

        let mut fur = Self {
            mesh,
            settings,
            roots,
            model: LineModel { buffer, material },
            handle: None,
            sink,
            rng,
        };
        fur.swap_model();
        Ok(fur)
    }

    /// Current parameters
    pub fn settings(&self) -> &FurSettings {
        &self.settings
    }

    /// Current hair roots
    pub fn roots(&self) -> &HairRoots {
        &self.roots
    }

    /// Line buffer currently on display
    pub fn lines(&self) -> &LineBuffer {
        &self.model.buffer
    }

    /// Model currently on display
    pub fn model(&self) -> &LineModel {
        &self.model
    }

    /// Base mesh the fur grows on
    pub fn mesh(&self) -> &Arc<BaseMesh> {
        &self.mesh
    }

    /// Scene the fur is registered with
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Change subdivision density, rebuilding roots and tips.
    ///
    /// # Errors
    ///
    /// Propagates subdivision errors; on error the previous fur stays live.
    pub fn set_density(&mut self, density: u32) -> FurResult<()> {
        info!("Updating hair density to {} iterations", density);
        self.rebuild_full(FurSettings {
            density,
            ..self.settings
        })
    }

    /// Change base hair length, keeping the current roots.
    pub fn set_length(&mut self, length: f32) {
        info!("Updating hair length to {}", length);
        self.rebuild_ends_only(FurSettings {
            length,
            ..self.settings
        });
    }

    /// Change hair orientation, keeping the current roots.
    ///
    /// Selecting [`Orientation::Shared`] again draws a new shared direction.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        info!("Updating hair orientation to {:?}", orientation);
        self.rebuild_ends_only(FurSettings {
            orientation,
            ..self.settings
        });
    }

    /// Apply one user control within `limits`.
    ///
    /// Returns `Ok(false)` when the control was rejected by the limits and
    /// nothing was rebuilt.
    ///
    /// # Errors
    ///
    /// Propagates subdivision errors from a density change.
    pub fn apply(&mut self, control: FurControl, limits: &Limits) -> FurResult<bool> {
        let Some(next) = limits.next(&self.settings, control) else {
            return Ok(false);
        };
        match control {
            FurControl::DensityUp | FurControl::DensityDown => self.set_density(next.density)?,
            FurControl::LengthUp | FurControl::LengthDown => self.set_length(next.length),
            FurControl::Orientation(orientation) => self.set_orientation(orientation),
        }
        Ok(true)
    }

    /// Rebuild roots and tips from scratch with `settings`.
    ///
    /// # Errors
    ///
    /// Propagates subdivision errors; on error the previous fur stays live.
    pub fn rebuild_full(&mut self, settings: FurSettings) -> FurResult<()> {
        let roots = build_roots(&self.mesh, settings.density, &mut self.rng)?;
        self.roots = roots;
        self.settings = settings;
        self.regrow();
        info!(
            "Rebuilt fur: {} roots, {} line vertices",
            self.roots.len(),
            self.model.buffer.len()
        );
        Ok(())
    }

    /// Regrow tips from the existing roots with `settings`.
    ///
    /// The density in `settings` is ignored; the root set is left untouched.
    pub fn rebuild_ends_only(&mut self, settings: FurSettings) {
        self.settings.length = settings.length;
        self.settings.orientation = settings.orientation;
        self.regrow();
        info!("Regrew {} hair ends", self.roots.len());
    }

    fn regrow(&mut self) {
        self.model.buffer = compute_segments(
            &self.roots,
            self.settings.length,
            self.settings.orientation,
            &mut self.rng,
        );
        self.swap_model();
    }

    /// Release the displayed model before registering the current one.
    fn swap_model(&mut self) {
        if let Some(old) = self.handle.take() {
            self.sink.remove_lines(old);
        }
        self.handle = Some(self.sink.add_lines(&self.model));
    }
}

impl<S: LineSink, R: Rng> Drop for Fur<S, R> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.sink.remove_lines(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Faces;
    use crate::roots::expected_root_count;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Event log shared between a test and the sink it hands to `Fur`.
    #[derive(Default)]
    struct SinkLog {
        next_id: u32,
        live: Vec<u32>,
        added: Vec<(u32, usize)>,
        removed: Vec<u32>,
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Rc<RefCell<SinkLog>>);

    impl LineSink for RecordingSink {
        type Handle = u32;

        fn add_lines(&mut self, model: &LineModel) -> u32 {
            let mut log = self.0.borrow_mut();
            let id = log.next_id;
            log.next_id += 1;
            log.live.push(id);
            log.added.push((id, model.buffer.len()));
            id
        }

        fn remove_lines(&mut self, handle: u32) {
            let mut log = self.0.borrow_mut();
            let index = log.live.iter().position(|&id| id == handle).unwrap();
            log.live.remove(index);
            log.removed.push(handle);
        }
    }

    fn unit_triangle() -> Arc<BaseMesh> {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let faces = Faces::Triangles(vec![[0, 1, 2]]);
        Arc::new(BaseMesh::new(positions, Some(vec![Vec3::Z; 3]), faces).unwrap())
    }

    fn cube_quads() -> Arc<BaseMesh> {
        let positions = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        let normals = positions.iter().map(|p| p.normalize()).collect();
        let faces = Faces::Quads(vec![
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [2, 3, 7, 6],
            [1, 2, 6, 5],
            [0, 4, 7, 3],
        ]);
        Arc::new(BaseMesh::new(positions, Some(normals), faces).unwrap())
    }

    fn settings(length: f32, density: u32) -> FurSettings {
        FurSettings {
            length,
            density,
            orientation: Orientation::Normal,
        }
    }

    fn fur(
        mesh: Arc<BaseMesh>,
        settings: FurSettings,
        seed: u64,
    ) -> (Fur<RecordingSink, Pcg64>, Rc<RefCell<SinkLog>>) {
        let sink = RecordingSink::default();
        let log = sink.0.clone();
        let fur = Fur::new(
            mesh,
            settings,
            Material::default(),
            sink,
            Pcg64::seed_from_u64(seed),
        )
        .unwrap();
        (fur, log)
    }

    #[test]
    fn test_unit_triangle_scenario() {
        let (fur, log) = fur(unit_triangle(), settings(1.0, 1), 11);

        assert_eq!(fur.roots().len(), 4);
        let bulb = fur.roots().positions[3];
        assert!((bulb - Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).length() <= 0.5 * 0.4715 + 1e-5);
        assert_eq!(bulb.z, 0.0);

        assert_eq!(fur.lines().len(), 8);
        assert!(fur.lines().normals.iter().all(|n| *n == Vec3::Z));
        assert_eq!(log.borrow().added, vec![(0, 8)]);
    }

    #[test]
    fn test_density_zero_uses_vertices_only() {
        let (fur, _) = fur(cube_quads(), settings(0.1, 0), 1);
        assert_eq!(fur.roots().positions, fur.mesh().positions());
        assert_eq!(fur.lines().len(), 16);
    }

    #[test]
    fn test_set_density_rebuilds_roots() {
        let mesh = cube_quads();
        let (mut fur, log) = fur(mesh.clone(), settings(0.1, 1), 2);
        assert_eq!(fur.roots().len(), expected_root_count(&mesh, 1));

        fur.set_density(3).unwrap();
        assert_eq!(fur.settings().density, 3);
        assert_eq!(fur.roots().len(), expected_root_count(&mesh, 3));
        assert_eq!(fur.roots().len(), 8 + 6 * 17);
        assert_eq!(fur.lines().len(), 2 * fur.roots().len());

        let log = log.borrow();
        assert_eq!(log.removed, vec![0]);
        assert_eq!(log.live, vec![1]);
    }

    #[test]
    fn test_rebuild_ends_only_keeps_roots() {
        let (mut fur, _) = fur(cube_quads(), settings(0.1, 3), 3);
        let before = fur.roots().clone();
        let lines_before = fur.lines().clone();

        fur.set_length(0.5);
        assert_eq!(fur.roots(), &before);
        assert_ne!(fur.lines(), &lines_before);
        assert!((fur.settings().length - 0.5).abs() < f32::EPSILON);

        fur.set_orientation(Orientation::Shared);
        assert_eq!(fur.roots(), &before);
        assert_eq!(fur.settings().orientation, Orientation::Shared);
    }

    #[test]
    fn test_rebuild_ends_only_ignores_density() {
        let (mut fur, _) = fur(cube_quads(), settings(0.1, 2), 4);
        let count = fur.roots().len();
        fur.rebuild_ends_only(settings(0.2, 7));
        assert_eq!(fur.settings().density, 2);
        assert_eq!(fur.roots().len(), count);
    }

    #[test]
    fn test_shared_orientation_tips() {
        let (mut fur, _) = fur(cube_quads(), settings(0.3, 2), 5);
        fur.set_orientation(Orientation::Shared);

        let directions: Vec<Vec3> = fur
            .lines()
            .segments()
            .map(|(root, tip)| (tip - root).normalize())
            .collect();
        for direction in &directions {
            assert!((*direction - directions[0]).length() < 1e-5);
        }
    }

    #[test]
    fn test_each_swap_releases_previous_model() {
        let (mut fur, log) = fur(unit_triangle(), settings(0.1, 2), 6);
        fur.set_length(0.2);
        fur.set_density(4).unwrap();
        fur.set_orientation(Orientation::Shared);
        fur.set_density(0).unwrap();

        {
            let log = log.borrow();
            assert_eq!(log.added.len(), 5);
            assert_eq!(log.removed, vec![0, 1, 2, 3]);
            assert_eq!(log.live, vec![4]);
        }

        drop(fur);
        let log = log.borrow();
        assert!(log.live.is_empty());
        assert_eq!(log.removed, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_apply_respects_limits() {
        let limits = Limits::default();
        let (mut fur, log) = fur(unit_triangle(), settings(1.0, 10), 7);

        assert!(!fur.apply(FurControl::DensityUp, &limits).unwrap());
        assert!(!fur.apply(FurControl::LengthUp, &limits).unwrap());
        assert_eq!(log.borrow().added.len(), 1);

        assert!(fur.apply(FurControl::LengthDown, &limits).unwrap());
        assert!((fur.settings().length - 0.99).abs() < 1e-6);

        assert!(fur.apply(FurControl::DensityDown, &limits).unwrap());
        assert_eq!(fur.settings().density, 9);
        assert_eq!(fur.roots().len(), expected_root_count(fur.mesh(), 9));
    }

    #[test]
    fn test_same_seed_same_fur() {
        let (a, _) = fur(cube_quads(), settings(0.2, 3), 8);
        let (b, _) = fur(cube_quads(), settings(0.2, 3), 8);
        assert_eq!(a.roots(), b.roots());
        assert_eq!(a.lines(), b.lines());
    }

    #[test]
    fn test_empty_mesh() {
        let (mut fur, log) = fur(Arc::new(BaseMesh::default()), settings(0.1, 3), 9);
        assert!(fur.lines().is_empty());
        fur.set_orientation(Orientation::Shared);
        fur.set_density(5).unwrap();
        assert!(fur.lines().is_empty());
        assert_eq!(log.borrow().live.len(), 1);
    }
}

//! In-memory scene that stands in for GPU-resident line models

use furview_core::{LineModel, LineSink};
use hashbrown::HashMap;

/// Handle for a model registered with an [`ExportScene`].
///
/// Not `Clone`: the only way to give it up is [`LineSink::remove_lines`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ModelId(u64);

/// Holds every registered line model until it is removed.
#[derive(Debug, Default)]
pub struct ExportScene {
    models: HashMap<u64, LineModel>,
    next_id: u64,
    released: usize,
}

impl ExportScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of models currently registered
    pub fn live_models(&self) -> usize {
        self.models.len()
    }

    /// Number of models released so far
    pub fn released_count(&self) -> usize {
        self.released
    }

    /// Most recently registered model that is still live
    pub fn latest(&self) -> Option<&LineModel> {
        self.models
            .iter()
            .max_by_key(|(id, _)| **id)
            .map(|(_, model)| model)
    }
}

impl LineSink for ExportScene {
    type Handle = ModelId;

    fn add_lines(&mut self, model: &LineModel) -> ModelId {
        let id = self.next_id;
        self.next_id += 1;
        self.models.insert(id, model.clone());
        tracing::debug!("Registered line model {} ({} vertices)", id, model.buffer.len());
        ModelId(id)
    }

    fn remove_lines(&mut self, handle: ModelId) {
        if self.models.remove(&handle.0).is_some() {
            self.released += 1;
            tracing::debug!("Released line model {}", handle.0);
        } else {
            tracing::warn!("Line model {} was not registered", handle.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furview_core::{LineBuffer, Material};
    use glam::Vec3;

    fn model(hairs: usize) -> LineModel {
        LineModel {
            buffer: LineBuffer {
                positions: vec![Vec3::ZERO; hairs * 2],
                normals: vec![Vec3::Z; hairs * 2],
            },
            material: Material::default(),
        }
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = ExportScene::new();
        let a = scene.add_lines(&model(1));
        let b = scene.add_lines(&model(2));
        assert_eq!(scene.live_models(), 2);
        assert_eq!(scene.latest().map(|m| m.buffer.segment_count()), Some(2));

        scene.remove_lines(b);
        assert_eq!(scene.live_models(), 1);
        assert_eq!(scene.latest().map(|m| m.buffer.segment_count()), Some(1));

        scene.remove_lines(a);
        assert_eq!(scene.live_models(), 0);
        assert_eq!(scene.released_count(), 2);
        assert!(scene.latest().is_none());
    }
}

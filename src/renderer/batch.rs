//! Render batches: the meshes, transforms and build plate a pass draws.

use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::scene::{MeshData, Scene};

/// One drawable: geometry plus the transform placing it in the world.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Local-to-world transform.
    pub transform: Mat4,
    /// Geometry in local space.
    pub mesh: Arc<MeshData>,
}

/// The synthetic build-plate surface drawn under every pick.
///
/// The plate is shifted along the up-axis by `offset` so it does not
/// z-fight with object faces resting at `y = 0`.
#[derive(Debug, Clone)]
pub struct BuildPlate {
    /// Plate geometry at `y = 0`.
    pub mesh: Arc<MeshData>,
    /// Translation along world Y applied when drawing.
    pub offset: f32,
}

impl BuildPlate {
    /// A `width` x `depth` plate shifted by `offset` along Y.
    #[must_use]
    pub fn new(width: f32, depth: f32, offset: f32) -> Self {
        Self {
            mesh: Arc::new(MeshData::plane(width, depth)),
            offset,
        }
    }

    /// World transform the plate is drawn with.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.offset, 0.0))
    }
}

/// A list of (transform, geometry) pairs drawn together.
#[derive(Debug, Clone, Default)]
pub struct RenderBatch {
    items: Vec<BatchItem>,
}

impl RenderBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch holding every pickable node of `scene` followed by the build
    /// plate, if any. Read fresh on each call; nothing is cached.
    #[must_use]
    pub fn from_scene(scene: &Scene, plate: Option<&BuildPlate>) -> Self {
        let mut batch = Self::new();
        for node in scene.pickable_nodes() {
            if let Some(mesh) = &node.mesh {
                batch.push(node.transform, Arc::clone(mesh));
            }
        }
        if let Some(plate) = plate {
            batch.push(plate.transform(), Arc::clone(&plate.mesh));
        }
        batch
    }

    /// Append an item.
    pub fn push(&mut self, transform: Mat4, mesh: Arc<MeshData>) {
        self.items.push(BatchItem { transform, mesh });
    }

    /// Items in draw order.
    #[must_use]
    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the batch has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every triangle of every item, transformed into world space.
    pub fn world_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.items
            .iter()
            .flat_map(|item| item.mesh.transformed_triangles(item.transform))
    }
}

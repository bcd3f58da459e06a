//! Minimal scene graph feeding the picking passes.
//!
//! The scene is a flat, insertion-ordered list of nodes plus the active
//! camera. Only what a pick needs is modelled: each node's world transform,
//! geometry, visibility and whether it may be measured.

mod mesh;

use std::sync::Arc;

use glam::Mat4;
pub use mesh::MeshData;

use crate::camera::Camera;

/// Stable identifier of a node within one [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Who caused a scene change, as reported to the measure tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Scene content changed (objects moved, added, removed, re-meshed).
    Content,
    /// The measure tool's own handle marker moved; never invalidates picks.
    ToolHandle,
}

/// A node in the scene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Human-readable name, used in logs.
    pub name: String,
    /// Local-to-world transform.
    pub transform: Mat4,
    /// Geometry, shared with whatever else renders it.
    pub mesh: Option<Arc<MeshData>>,
    /// Whether the node is currently shown.
    pub visible: bool,
    /// Whether the node takes part in measuring (printable objects do; helper
    /// geometry does not).
    pub measurable: bool,
}

impl SceneNode {
    /// A visible, measurable node with the given geometry.
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: Arc<MeshData>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            mesh: Some(mesh),
            visible: true,
            measurable: true,
        }
    }

    /// Builder-style transform override.
    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Whether this node belongs to the pickable object set: visible,
    /// measurable and carrying at least one triangle.
    #[must_use]
    pub fn is_pickable(&self) -> bool {
        self.visible
            && self.measurable
            && self.mesh.as_ref().is_some_and(|mesh| !mesh.is_empty())
    }
}

/// The scene: nodes in insertion order and the active camera.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<(NodeId, SceneNode)>,
    next_node_id: u32,
    camera: Option<Camera>,
}

impl Scene {
    /// Create an empty scene without a camera.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push((id, node));
        id
    }

    /// Remove a node, returning it if it existed.
    pub fn remove_node(&mut self, id: NodeId) -> Option<SceneNode> {
        let index = self.nodes.iter().position(|(nid, _)| *nid == id)?;
        Some(self.nodes.remove(index).1)
    }

    /// Shared access to a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes
            .iter()
            .find_map(|(nid, node)| (*nid == id).then_some(node))
    }

    /// Mutable access to a node. Hosts report edits through
    /// `MeasureTool::on_scene_changed`.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes
            .iter_mut()
            .find_map(|(nid, node)| (*nid == id).then_some(node))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Nodes in the pickable object set, in insertion order.
    pub fn pickable_nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes
            .iter()
            .map(|(_, node)| node)
            .filter(|node| node.is_pickable())
    }

    /// Replace the active camera. Camera changes are not content changes.
    pub fn set_active_camera(&mut self, camera: Option<Camera>) {
        self.camera = camera;
    }

    /// The active camera, if the host has one.
    #[must_use]
    pub fn active_camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Mutable access to the active camera.
    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }
}

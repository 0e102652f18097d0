//! Scene graph node types

use std::sync::Arc;

use glam::Mat4;

use crate::scene::mesh::MeshData;

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Local transform relative to the parent node.
    pub local_transform: Mat4,
    /// Mesh attached to this node, shared between instances.
    pub mesh: Option<Arc<MeshData>>,
    /// Index into the scene's material list.
    pub material: Option<usize>,
    /// Host selection flag, honored by selection-only exports.
    pub selected: bool,
}

impl SceneNode {
    /// Create a new node with an identity transform and no content.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: Mat4::IDENTITY,
            mesh: None,
            material: None,
            selected: false,
        }
    }
}

//! Scene graph storage and mutation.
//!
//! The graph owns node storage plus the scene-wide material and
//! animation lists. Parent/child references are ids, never live object
//! references, so back-references stay weak and the tree invariant is
//! easy to check during export.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Mat4;

use crate::scene::animation::AnimationTrack;
use crate::scene::material::Material;
use crate::scene::mesh::MeshData;
use crate::scene::node::{NodeId, SceneNode};

/// Hierarchy of scene nodes with attached meshes, materials, and
/// animation tracks.
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    next_id: u64,
    materials: Vec<Material>,
    animations: Vec<AnimationTrack>,
}

impl SceneGraph {
    /// Create a new scene graph with an empty root node.
    pub fn new() -> Self {
        let root_id = NodeId(0);
        let root_node = SceneNode::new(root_id, "root");

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
            materials: Vec::new(),
            animations: Vec::new(),
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        // Register as child of parent
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    /// Remove a node and its entire subtree. Cannot remove the root.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }

        // Collect subtree IDs (BFS)
        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            let current = to_remove[i];
            if let Some(node) = self.nodes.get(&current) {
                to_remove.extend_from_slice(&node.children);
            }
            i += 1;
        }

        // Detach from parent
        if let Some(node) = self.nodes.get(&id) {
            if let Some(parent_id) = node.parent {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|c| *c != id);
                }
            }
        }

        // Remove all nodes in subtree
        for nid in to_remove {
            self.nodes.remove(&nid);
        }
    }

    /// Move a node to a new parent. Cannot reparent the root.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) {
        if id == self.root {
            return;
        }

        // Detach from old parent
        if let Some(node) = self.nodes.get(&id) {
            if let Some(old_parent_id) = node.parent {
                if let Some(old_parent) = self.nodes.get_mut(&old_parent_id) {
                    old_parent.children.retain(|c| *c != id);
                }
            }
        }

        // Attach to new parent
        if let Some(new_parent_node) = self.nodes.get_mut(&new_parent) {
            new_parent_node.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: NodeId, transform: Mat4) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Set the host selection flag of a node.
    pub fn set_selected(&mut self, id: NodeId, selected: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.selected = selected;
        }
    }

    /// Attach a mesh to a node. Instances share the same `Arc`.
    pub fn attach_mesh(&mut self, id: NodeId, mesh: Arc<MeshData>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.mesh = Some(mesh);
        }
    }

    /// Assign a material (by index into the material list) to a node.
    pub fn set_material(&mut self, id: NodeId, material: usize) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.material = Some(material);
        }
    }

    /// Register a material. Returns its index for `set_material`.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Register an animation track.
    pub fn add_animation(&mut self, track: AnimationTrack) {
        self.animations.push(track);
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Scene-wide material list.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Scene-wide animation tracks.
    pub fn animations(&self) -> &[AnimationTrack] {
        &self.animations
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

//! JSON scene description for host hand-off.
//!
//! A `SceneDocument` is the flat, serializable form of a scene: node
//! records reference their parents by array index (parents always come
//! first), meshes live in a shared pool so instancing is expressible,
//! and animation tracks reference node records by index. `build`
//! assembles the corresponding `SceneGraph`.

use std::io;
use std::path::Path;
use std::sync::Arc;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::scene::animation::{AnimationTrack, TransformKeyframe};
use crate::scene::graph::SceneGraph;
use crate::scene::material::Material;
use crate::scene::mesh::MeshData;

/// Current version of the scene document format
pub const DOCUMENT_VERSION: u32 = 1;

fn identity_matrix() -> [f32; 16] {
    Mat4::IDENTITY.to_cols_array()
}

/// Serialized scene description (JSON for easy inspection)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneDocument {
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub meshes: Vec<MeshData>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub animations: Vec<TrackRecord>,
}

/// One node in document order. Parents precede their children.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    /// Index of the parent record; root-level nodes have none.
    #[serde(default)]
    pub parent: Option<usize>,
    /// Column-major 4x4 local transform.
    #[serde(default = "identity_matrix")]
    pub transform: [f32; 16],
    /// Index into the document's mesh pool.
    #[serde(default)]
    pub mesh: Option<usize>,
    /// Index into the document's material list.
    #[serde(default)]
    pub material: Option<usize>,
    #[serde(default)]
    pub selected: bool,
}

/// Animation track record targeting a node by record index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackRecord {
    pub node: usize,
    pub keys: Vec<KeyRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyRecord {
    pub time: f32,
    pub transform: [f32; 16],
}

impl SceneDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> io::Result<Self> {
        let document: SceneDocument = serde_json::from_str(json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if document.version != DOCUMENT_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "scene document version mismatch: expected {}, got {}",
                    DOCUMENT_VERSION, document.version
                ),
            ));
        }

        Ok(document)
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Assemble the scene graph this document describes.
    pub fn build(&self) -> Result<SceneGraph, String> {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        for material in &self.materials {
            graph.add_material(material.clone());
        }

        // Shared pool: instances of the same record share one allocation
        let mesh_pool: Vec<Arc<MeshData>> =
            self.meshes.iter().cloned().map(Arc::new).collect();

        let mut ids = Vec::with_capacity(self.nodes.len());
        for (i, record) in self.nodes.iter().enumerate() {
            let parent_id = match record.parent {
                None => root,
                Some(p) if p < i => ids[p],
                Some(p) => {
                    return Err(format!(
                        "node {} ('{}') references parent {} which does not precede it",
                        i, record.name, p
                    ));
                }
            };

            let id = graph.add_child(parent_id, record.name.clone());
            graph.set_transform(id, Mat4::from_cols_array(&record.transform));
            graph.set_selected(id, record.selected);

            if let Some(m) = record.mesh {
                let mesh = mesh_pool
                    .get(m)
                    .ok_or_else(|| {
                        format!("node '{}' references mesh {} of {}", record.name, m, mesh_pool.len())
                    })?
                    .clone();
                graph.attach_mesh(id, mesh);
            }

            if let Some(m) = record.material {
                if m >= self.materials.len() {
                    return Err(format!(
                        "node '{}' references material {} of {}",
                        record.name,
                        m,
                        self.materials.len()
                    ));
                }
                graph.set_material(id, m);
            }

            ids.push(id);
        }

        for (i, track_record) in self.animations.iter().enumerate() {
            let target = *ids.get(track_record.node).ok_or_else(|| {
                format!(
                    "animation {} references node {} of {}",
                    i,
                    track_record.node,
                    ids.len()
                )
            })?;

            let mut track = AnimationTrack::new(target);
            for key in &track_record.keys {
                track.add_keyframe(TransformKeyframe::new(
                    key.time,
                    Mat4::from_cols_array(&key.transform),
                ));
            }
            graph.add_animation(track);
        }

        Ok(graph)
    }
}

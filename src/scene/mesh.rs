//! Mesh geometry data and content identity.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

/// Triangle mesh geometry.
///
/// Normals and UVs are optional per-vertex attributes: either empty, or
/// exactly one entry per position. Two meshes are the same content when
/// all four arrays are equal by value, regardless of how the host
/// authored them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
    pub triangles: Vec<[u32; 3]>,
}

impl MeshData {
    /// A mesh with no vertices or no triangles has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.triangles.is_empty()
    }

    /// Check the structural invariants: triangle indices in range,
    /// attribute arrays either empty or matching the vertex count.
    pub fn validate(&self) -> Result<(), String> {
        let vertex_count = self.positions.len();

        if !self.normals.is_empty() && self.normals.len() != vertex_count {
            return Err(format!(
                "{} normals for {} vertices",
                self.normals.len(),
                vertex_count
            ));
        }
        if !self.uvs.is_empty() && self.uvs.len() != vertex_count {
            return Err(format!(
                "{} UVs for {} vertices",
                self.uvs.len(),
                vertex_count
            ));
        }

        for (i, tri) in self.triangles.iter().enumerate() {
            for &index in tri {
                if index as usize >= vertex_count {
                    return Err(format!(
                        "triangle {} references vertex {} of {}",
                        i, index, vertex_count
                    ));
                }
            }
        }

        Ok(())
    }

    /// Content hash over the canonical little-endian byte image.
    ///
    /// Array lengths are mixed in ahead of the data so differently
    /// shaped meshes cannot collide by concatenation.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();

        hasher.update(&(self.positions.len() as u64).to_le_bytes());
        hasher.update(&(self.normals.len() as u64).to_le_bytes());
        hasher.update(&(self.uvs.len() as u64).to_le_bytes());
        hasher.update(&(self.triangles.len() as u64).to_le_bytes());

        for p in &self.positions {
            for c in p {
                hasher.update(&c.to_le_bytes());
            }
        }
        for n in &self.normals {
            for c in n {
                hasher.update(&c.to_le_bytes());
            }
        }
        for uv in &self.uvs {
            for c in uv {
                hasher.update(&c.to_le_bytes());
            }
        }
        for tri in &self.triangles {
            for i in tri {
                hasher.update(&i.to_le_bytes());
            }
        }

        hasher.digest()
    }
}

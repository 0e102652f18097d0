//! Export outcome reporting.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Non-fatal conditions collected during an export. These never abort
/// the run; the caller decides what to surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportWarning {
    /// A material references a texture that does not exist under the
    /// filesystem root.
    MissingTexture { material: String, path: PathBuf },
    /// A node's mesh had no vertices or no triangles and was skipped.
    EmptyMeshSkipped { node: String },
    /// A node's mesh failed validation and was skipped.
    InvalidMeshSkipped { node: String, reason: String },
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportWarning::MissingTexture { material, path } => {
                write!(
                    f,
                    "material '{}' references missing texture '{}'",
                    material,
                    path.display()
                )
            }
            ExportWarning::EmptyMeshSkipped { node } => {
                write!(f, "node '{}' has an empty mesh, skipped", node)
            }
            ExportWarning::InvalidMeshSkipped { node, reason } => {
                write!(f, "node '{}' has an invalid mesh ({}), skipped", node, reason)
            }
        }
    }
}

/// Summary of a completed export.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExportReport {
    pub nodes_written: u32,
    pub meshes_written: u32,
    pub materials_written: u32,
    pub animations_written: u32,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub warnings: Vec<ExportWarning>,
}

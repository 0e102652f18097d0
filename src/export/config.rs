//! Export configuration and validation.

use std::path::{Path, PathBuf};

use crate::core::ExportError;
use crate::math::axis::AxisSystem;

/// Expected destination file extension.
pub const SCENE_EXTENSION: &str = "tsc";

/// Configuration for one export call. Immutable once handed to
/// `export`; validation happens upfront so the traversal never starts
/// against a bad destination.
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Destination `.tsc` path.
    pub destination: PathBuf,
    /// Existing, writable directory that relative texture paths
    /// resolve against.
    pub filesystem_root: PathBuf,
    /// Export only the selected subtrees.
    pub selection_only: bool,
    /// Source axis convention; output is always Z-forward, Y-up.
    pub source_axes: AxisSystem,
}

impl ExportConfig {
    /// Config with the default Blender source convention and full-scene
    /// export.
    pub fn new(destination: impl Into<PathBuf>, filesystem_root: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            filesystem_root: filesystem_root.into(),
            selection_only: false,
            source_axes: AxisSystem::BLENDER,
        }
    }

    /// Check destination extension, filesystem root, and axis system.
    pub fn validate(&self) -> Result<(), ExportError> {
        match self.destination.extension() {
            Some(ext) if ext == SCENE_EXTENSION => {}
            _ => {
                return Err(ExportError::InvalidConfig(format!(
                    "destination '{}' must have the .{} extension",
                    self.destination.display(),
                    SCENE_EXTENSION
                )));
            }
        }

        if !self.filesystem_root.is_dir() {
            return Err(ExportError::InvalidConfig(format!(
                "filesystem root '{}' is not an existing directory",
                self.filesystem_root.display()
            )));
        }

        if is_read_only(&self.filesystem_root) {
            return Err(ExportError::InvalidConfig(format!(
                "filesystem root '{}' is not writable",
                self.filesystem_root.display()
            )));
        }

        if !self.source_axes.is_valid() {
            return Err(ExportError::InvalidConfig(
                "source forward and up axes are collinear".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_read_only(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.permissions().readonly())
        .unwrap_or(true)
}

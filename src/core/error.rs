//! Error types for the exporter

use thiserror::Error;

/// Terminal failures of an export call.
///
/// Recoverable conditions (missing textures, skipped meshes) are not
/// errors; they are collected as warnings in the export report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cycle detected in scene graph at node '{0}'")]
    CyclicGraph(String),
}

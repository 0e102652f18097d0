//! Scene export: serializing a scene graph to a .tsc file.
//!
//! `export` walks the scene graph depth-first, deduplicates meshes by
//! content, converts everything to the Z-forward/Y-up convention, and
//! writes the binary container atomically (temp file + rename).

pub mod config;
pub mod exporter;
pub mod format;
pub mod reader;
pub mod report;
pub mod writer;

pub use config::ExportConfig;
pub use exporter::export;
pub use reader::TscFile;
pub use report::{ExportReport, ExportWarning};

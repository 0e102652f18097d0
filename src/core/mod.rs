//! Core error and logging utilities

pub mod error;
pub mod logging;

pub use error::ExportError;

//! Mathematical utilities

pub mod axis;

pub use axis::{Axis, AxisSystem, conversion_matrix};

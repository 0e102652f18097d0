//! tscex - Scene graph exporter for the Tamy .tsc binary scene format

pub mod core;
pub mod export;
pub mod math;
pub mod scene;

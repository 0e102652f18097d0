//! Axis conventions and coordinate conversion.
//!
//! Authoring tools disagree on which world axes mean "forward" and "up".
//! The exporter writes everything in a Z-forward, Y-up convention;
//! `conversion_matrix` builds the change-of-basis matrix from one
//! convention to another.

use glam::{Mat3, Mat4, Vec3};

/// A signed principal axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

impl Axis {
    /// Unit vector for this axis.
    pub fn to_vec3(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
            Axis::NegX => Vec3::NEG_X,
            Axis::NegY => Vec3::NEG_Y,
            Axis::NegZ => Vec3::NEG_Z,
        }
    }

    /// Parse an axis name such as `"Z"` or `"-y"` (case-insensitive).
    pub fn parse(s: &str) -> Option<Axis> {
        match s.to_ascii_uppercase().as_str() {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            "-X" => Some(Axis::NegX),
            "-Y" => Some(Axis::NegY),
            "-Z" => Some(Axis::NegZ),
            _ => None,
        }
    }
}

/// A forward/up axis pair describing a tool's world convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisSystem {
    pub forward: Axis,
    pub up: Axis,
}

impl AxisSystem {
    /// Blender's convention: -Y forward, +Z up.
    pub const BLENDER: AxisSystem = AxisSystem {
        forward: Axis::NegY,
        up: Axis::Z,
    };

    /// The .tsc convention: +Z forward, +Y up.
    pub const TSC: AxisSystem = AxisSystem {
        forward: Axis::Z,
        up: Axis::Y,
    };

    /// Forward and up must not lie on the same line.
    pub fn is_valid(&self) -> bool {
        self.up
            .to_vec3()
            .cross(self.forward.to_vec3())
            .length_squared()
            > 0.0
    }

    /// Orthonormal basis with columns (right, up, forward).
    fn basis(&self) -> Mat3 {
        let forward = self.forward.to_vec3();
        let up = self.up.to_vec3();
        let right = up.cross(forward);
        Mat3::from_cols(right, up, forward)
    }
}

/// Change-of-basis matrix taking vectors expressed in `src` to `dst`.
///
/// The result is an orthonormal sign-permutation matrix, so it can be
/// applied to normals as-is. Callers must hand in valid systems
/// (`AxisSystem::is_valid`); the export config checks this upfront.
pub fn conversion_matrix(src: AxisSystem, dst: AxisSystem) -> Mat4 {
    Mat4::from_mat3(dst.basis() * src.basis().transpose())
}

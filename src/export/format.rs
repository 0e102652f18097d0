//! The .tsc binary container layout.
//!
//! All multi-byte fields are little-endian; the header carries an
//! endian tag so readers can verify before trusting any count.
//! Version 1 layout:
//!
//! ```text
//! header     magic "TSCN" | version u32 | endian tag u32
//!            | node count u32 | mesh count u32
//!            | material count u32 | animation count u32
//! nodes      name (u32 len + UTF-8) | parent u32 (sentinel = none)
//!            | local transform 16 x f32, column-major
//!            | mesh u32 (sentinel) | material u32 (sentinel)
//! meshes     vertex count u32 | triangle count u32 | flags u8
//!            | positions | normals | uvs | index triples u32 x 3
//! materials  name | texture count u32 | texture paths ('/' separators)
//! animations target node u32 | key count u32
//!            | per key: time f32 | transform 16 x f32
//! ```
//!
//! Parent references always point at earlier node entries, so a reader
//! can build the hierarchy in one pass.

/// Magic bytes at the start of every .tsc file.
pub const MAGIC: &[u8; 4] = b"TSCN";

/// Current format version.
pub const VERSION: u32 = 1;

/// Byte-order tag; reads back as this value only when the file and the
/// reader agree on little-endian order.
pub const ENDIAN_TAG: u32 = 0x0403_0201;

/// Sentinel for "no parent" / "no mesh" / "no material".
pub const NO_INDEX: u32 = u32::MAX;

/// Mesh flag bit: block carries per-vertex normals.
pub const MESH_HAS_NORMALS: u8 = 1 << 0;

/// Mesh flag bit: block carries per-vertex UVs.
pub const MESH_HAS_UVS: u8 = 1 << 1;

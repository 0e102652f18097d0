//! Little-endian primitive writers for the .tsc container.

use std::io::{self, Write};

use glam::Mat4;

use crate::scene::mesh::MeshData;

use super::format::{MESH_HAS_NORMALS, MESH_HAS_UVS};

/// Wraps a writer and counts the bytes that pass through.
pub struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

pub fn put_u8(w: &mut impl Write, value: u8) -> io::Result<()> {
    w.write_all(&[value])
}

pub fn put_u32(w: &mut impl Write, value: u32) -> io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

pub fn put_f32(w: &mut impl Write, value: f32) -> io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

/// Length-prefixed UTF-8 string.
pub fn put_str(w: &mut impl Write, value: &str) -> io::Result<()> {
    put_u32(w, value.len() as u32)?;
    w.write_all(value.as_bytes())
}

/// 16 floats, column-major.
pub fn put_mat4(w: &mut impl Write, value: &Mat4) -> io::Result<()> {
    for c in value.to_cols_array() {
        put_f32(w, c)?;
    }
    Ok(())
}

/// Encode one mesh table block. Meshes are encoded independently so the
/// exporter can fan the work out across threads and still emit blocks
/// in table order.
pub fn encode_mesh(mesh: &MeshData) -> io::Result<Vec<u8>> {
    let mut block = Vec::new();

    put_u32(&mut block, mesh.positions.len() as u32)?;
    put_u32(&mut block, mesh.triangles.len() as u32)?;

    let mut flags = 0u8;
    if !mesh.normals.is_empty() {
        flags |= MESH_HAS_NORMALS;
    }
    if !mesh.uvs.is_empty() {
        flags |= MESH_HAS_UVS;
    }
    put_u8(&mut block, flags)?;

    for p in &mesh.positions {
        for &c in p {
            put_f32(&mut block, c)?;
        }
    }
    for n in &mesh.normals {
        for &c in n {
            put_f32(&mut block, c)?;
        }
    }
    for uv in &mesh.uvs {
        for &c in uv {
            put_f32(&mut block, c)?;
        }
    }
    for tri in &mesh.triangles {
        for &i in tri {
            put_u32(&mut block, i)?;
        }
    }

    Ok(block)
}

//! Reading .tsc files back into tables.
//!
//! Backs the inspect tool and the round-trip tests; the tables mirror
//! the on-disk layout rather than the live scene graph.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use glam::Mat4;

use crate::scene::mesh::MeshData;

use super::format::{ENDIAN_TAG, MAGIC, MESH_HAS_NORMALS, MESH_HAS_UVS, NO_INDEX, VERSION};

/// Parsed .tsc header.
#[derive(Clone, Copy, Debug)]
pub struct TscHeader {
    pub version: u32,
    pub node_count: u32,
    pub mesh_count: u32,
    pub material_count: u32,
    pub animation_count: u32,
}

/// One node table entry. Indices refer to the file's own tables.
#[derive(Clone, Debug)]
pub struct TscNode {
    pub name: String,
    pub parent: Option<u32>,
    pub transform: Mat4,
    pub mesh: Option<u32>,
    pub material: Option<u32>,
}

/// One material table entry with destination-relative texture paths.
#[derive(Clone, Debug)]
pub struct TscMaterial {
    pub name: String,
    pub textures: Vec<String>,
}

/// One animation table entry, keyed by node table index.
#[derive(Clone, Debug)]
pub struct TscTrack {
    pub node: u32,
    pub keys: Vec<(f32, Mat4)>,
}

/// A fully parsed scene file.
#[derive(Clone, Debug)]
pub struct TscFile {
    pub header: TscHeader,
    pub nodes: Vec<TscNode>,
    pub meshes: Vec<MeshData>,
    pub materials: Vec<TscMaterial>,
    pub animations: Vec<TscTrack>,
}

impl TscFile {
    /// Open and parse a .tsc file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }

    /// Parse a .tsc stream.
    pub fn read(reader: &mut impl Read) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "invalid magic bytes",
            ));
        }

        let version = get_u32(reader)?;
        if version != VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported version: {}", version),
            ));
        }

        let endian = get_u32(reader)?;
        if endian != ENDIAN_TAG {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unexpected byte-order tag: {:#010x}", endian),
            ));
        }

        let header = TscHeader {
            version,
            node_count: get_u32(reader)?,
            mesh_count: get_u32(reader)?,
            material_count: get_u32(reader)?,
            animation_count: get_u32(reader)?,
        };

        let mut nodes = Vec::with_capacity(header.node_count as usize);
        for _ in 0..header.node_count {
            nodes.push(TscNode {
                name: get_str(reader)?,
                parent: get_index(reader)?,
                transform: get_mat4(reader)?,
                mesh: get_index(reader)?,
                material: get_index(reader)?,
            });
        }

        let mut meshes = Vec::with_capacity(header.mesh_count as usize);
        for _ in 0..header.mesh_count {
            meshes.push(read_mesh(reader)?);
        }

        let mut materials = Vec::with_capacity(header.material_count as usize);
        for _ in 0..header.material_count {
            let name = get_str(reader)?;
            let texture_count = get_u32(reader)?;
            let mut textures = Vec::with_capacity(texture_count as usize);
            for _ in 0..texture_count {
                textures.push(get_str(reader)?);
            }
            materials.push(TscMaterial { name, textures });
        }

        let mut animations = Vec::with_capacity(header.animation_count as usize);
        for _ in 0..header.animation_count {
            let node = get_u32(reader)?;
            let key_count = get_u32(reader)?;
            let mut keys = Vec::with_capacity(key_count as usize);
            for _ in 0..key_count {
                let time = get_f32(reader)?;
                let transform = get_mat4(reader)?;
                keys.push((time, transform));
            }
            animations.push(TscTrack { node, keys });
        }

        Ok(Self {
            header,
            nodes,
            meshes,
            materials,
            animations,
        })
    }
}

fn read_mesh(reader: &mut impl Read) -> io::Result<MeshData> {
    let vertex_count = get_u32(reader)? as usize;
    let triangle_count = get_u32(reader)? as usize;
    let flags = get_u8(reader)?;

    let mut positions = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        positions.push([get_f32(reader)?, get_f32(reader)?, get_f32(reader)?]);
    }

    let mut normals = Vec::new();
    if flags & MESH_HAS_NORMALS != 0 {
        normals.reserve(vertex_count);
        for _ in 0..vertex_count {
            normals.push([get_f32(reader)?, get_f32(reader)?, get_f32(reader)?]);
        }
    }

    let mut uvs = Vec::new();
    if flags & MESH_HAS_UVS != 0 {
        uvs.reserve(vertex_count);
        for _ in 0..vertex_count {
            uvs.push([get_f32(reader)?, get_f32(reader)?]);
        }
    }

    let mut triangles = Vec::with_capacity(triangle_count);
    for _ in 0..triangle_count {
        triangles.push([get_u32(reader)?, get_u32(reader)?, get_u32(reader)?]);
    }

    Ok(MeshData {
        positions,
        normals,
        uvs,
        triangles,
    })
}

fn get_u8(reader: &mut impl Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn get_u32(reader: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn get_f32(reader: &mut impl Read) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn get_index(reader: &mut impl Read) -> io::Result<Option<u32>> {
    let value = get_u32(reader)?;
    Ok(if value == NO_INDEX { None } else { Some(value) })
}

fn get_str(reader: &mut impl Read) -> io::Result<String> {
    let len = get_u32(reader)? as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn get_mat4(reader: &mut impl Read) -> io::Result<Mat4> {
    let mut cols = [0f32; 16];
    for c in &mut cols {
        *c = get_f32(reader)?;
    }
    Ok(Mat4::from_cols_array(&cols))
}

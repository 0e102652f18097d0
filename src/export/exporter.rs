//! Scene export: traversal, deduplication, conversion, file assembly.
//!
//! The walk assigns each exported node a sequential id in depth-first
//! order, so parent references always point backwards and the file can
//! be consumed in one pass. The graph's root is an internal anchor and
//! is not written; its children become the file's parentless entries.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;
use log::{debug, info};
use rayon::prelude::*;

use crate::core::ExportError;
use crate::math::axis::{self, AxisSystem};
use crate::scene::graph::SceneGraph;
use crate::scene::mesh::MeshData;
use crate::scene::node::NodeId;

use super::config::ExportConfig;
use super::format::{ENDIAN_TAG, MAGIC, NO_INDEX, VERSION};
use super::report::{ExportReport, ExportWarning};
use super::writer::{self, CountingWriter};

struct NodeEntry {
    name: String,
    parent: Option<u32>,
    transform: Mat4,
    mesh: Option<u32>,
    material: Option<u32>,
}

struct MaterialEntry {
    name: String,
    textures: Vec<String>,
}

struct TrackEntry {
    node: u32,
    keys: Vec<(f32, Mat4)>,
}

/// Everything assembled in memory before any byte reaches the disk.
struct SceneTables {
    nodes: Vec<NodeEntry>,
    mesh_blocks: Vec<Vec<u8>>,
    materials: Vec<MaterialEntry>,
    tracks: Vec<TrackEntry>,
    /// (absolute source, destination-relative target) per texture.
    texture_copies: Vec<(PathBuf, PathBuf)>,
    warnings: Vec<ExportWarning>,
}

/// Serialize the scene graph to `config.destination`.
///
/// The input graph is never mutated. The destination file is written to
/// a temporary sibling path and renamed into place on success; on
/// failure the temporary file is removed and no destination is left
/// behind.
pub fn export(graph: &SceneGraph, config: &ExportConfig) -> Result<ExportReport, ExportError> {
    let started = Instant::now();
    config.validate()?;

    let conversion = axis::conversion_matrix(config.source_axes, AxisSystem::TSC);
    let tables = assemble_tables(graph, config, conversion)?;

    copy_textures(&config.destination, &tables.texture_copies)?;
    let bytes_written = write_scene_file(&config.destination, &tables)?;

    let report = ExportReport {
        nodes_written: tables.nodes.len() as u32,
        meshes_written: tables.mesh_blocks.len() as u32,
        materials_written: tables.materials.len() as u32,
        animations_written: tables.tracks.len() as u32,
        bytes_written,
        duration_ms: started.elapsed().as_millis() as u64,
        warnings: tables.warnings,
    };

    info!(
        "exported {} nodes, {} meshes, {} materials, {} tracks ({} bytes) to {}",
        report.nodes_written,
        report.meshes_written,
        report.materials_written,
        report.animations_written,
        report.bytes_written,
        config.destination.display()
    );

    Ok(report)
}

/// Subtree roots for the walk: the root's children, or the maximal
/// selected subtrees when exporting a selection.
fn traversal_roots(graph: &SceneGraph, selection_only: bool) -> Vec<NodeId> {
    if !selection_only {
        return graph.children(graph.root()).collect();
    }

    // Selected nodes with no selected ancestor
    let mut roots = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(NodeId, bool)> = graph
        .children(graph.root())
        .map(|c| (c, false))
        .collect();
    stack.reverse();

    while let Some((id, ancestor_selected)) = stack.pop() {
        if !visited.insert(id) {
            continue; // revisits are reported by the main walk
        }
        let Some(node) = graph.get(id) else { continue };

        if node.selected && !ancestor_selected {
            roots.push(id);
        }
        let selected = ancestor_selected || node.selected;
        for &child in node.children.iter().rev() {
            stack.push((child, selected));
        }
    }

    roots
}

fn assemble_tables(
    graph: &SceneGraph,
    config: &ExportConfig,
    conversion: Mat4,
) -> Result<SceneTables, ExportError> {
    let conversion_inv = conversion.inverse();
    let mut warnings = Vec::new();

    let mut nodes: Vec<NodeEntry> = Vec::new();
    let mut assigned: HashMap<NodeId, u32> = HashMap::new();

    let mut source_meshes: Vec<Arc<MeshData>> = Vec::new();
    let mut mesh_lookup: HashMap<u64, Vec<u32>> = HashMap::new();

    let mut materials: Vec<MaterialEntry> = Vec::new();
    let mut material_lookup: HashMap<usize, u32> = HashMap::new();
    let mut texture_copies: Vec<(PathBuf, PathBuf)> = Vec::new();
    let mut seen_textures: HashSet<PathBuf> = HashSet::new();

    let mut stack: Vec<(NodeId, Option<u32>)> = Vec::new();
    for root in traversal_roots(graph, config.selection_only).into_iter().rev() {
        stack.push((root, None));
    }

    while let Some((id, parent_index)) = stack.pop() {
        let Some(node) = graph.get(id) else { continue };

        if assigned.contains_key(&id) {
            return Err(ExportError::CyclicGraph(node.name.clone()));
        }
        let index = nodes.len() as u32;
        assigned.insert(id, index);

        let mesh = match &node.mesh {
            None => None,
            Some(mesh) if mesh.is_empty() => {
                warnings.push(ExportWarning::EmptyMeshSkipped {
                    node: node.name.clone(),
                });
                None
            }
            Some(mesh) => match mesh.validate() {
                Err(reason) => {
                    warnings.push(ExportWarning::InvalidMeshSkipped {
                        node: node.name.clone(),
                        reason,
                    });
                    None
                }
                Ok(()) => Some(dedup_mesh(mesh, &mut source_meshes, &mut mesh_lookup)),
            },
        };

        let material = node.material.and_then(|m| {
            remap_material(
                m,
                graph,
                config,
                &mut materials,
                &mut material_lookup,
                &mut texture_copies,
                &mut seen_textures,
                &mut warnings,
            )
        });

        nodes.push(NodeEntry {
            name: node.name.clone(),
            parent: parent_index,
            transform: conversion * node.local_transform * conversion_inv,
            mesh,
            material,
        });

        for &child in node.children.iter().rev() {
            stack.push((child, Some(index)));
        }
    }

    let mut tracks = Vec::new();
    for track in graph.animations() {
        if track.is_empty() {
            continue;
        }
        let Some(&node_index) = assigned.get(&track.target) else {
            continue;
        };
        let keys = track
            .keyframes()
            .iter()
            .map(|k| (k.time, conversion * k.transform * conversion_inv))
            .collect();
        tracks.push(TrackEntry {
            node: node_index,
            keys,
        });
    }

    // Independent blocks, encoded across the thread pool; the writer
    // later emits them in table order.
    let mesh_blocks = source_meshes
        .par_iter()
        .map(|mesh| writer::encode_mesh(&convert_mesh(mesh.as_ref(), conversion)))
        .collect::<io::Result<Vec<_>>>()?;

    Ok(SceneTables {
        nodes,
        mesh_blocks,
        materials,
        tracks,
        texture_copies,
        warnings,
    })
}

/// Table index for a mesh, reusing an existing entry when the content
/// matches. Hash collisions fall back to full equality.
fn dedup_mesh(
    mesh: &Arc<MeshData>,
    source_meshes: &mut Vec<Arc<MeshData>>,
    lookup: &mut HashMap<u64, Vec<u32>>,
) -> u32 {
    let hash = mesh.content_hash();
    let candidates = lookup.entry(hash).or_default();

    for &index in candidates.iter() {
        if *source_meshes[index as usize] == **mesh {
            debug!("mesh dedup hit ({} vertices)", mesh.positions.len());
            return index;
        }
    }

    let index = source_meshes.len() as u32;
    source_meshes.push(mesh.clone());
    candidates.push(index);
    index
}

#[allow(clippy::too_many_arguments)]
fn remap_material(
    graph_index: usize,
    graph: &SceneGraph,
    config: &ExportConfig,
    materials: &mut Vec<MaterialEntry>,
    lookup: &mut HashMap<usize, u32>,
    texture_copies: &mut Vec<(PathBuf, PathBuf)>,
    seen_textures: &mut HashSet<PathBuf>,
    warnings: &mut Vec<ExportWarning>,
) -> Option<u32> {
    if let Some(&index) = lookup.get(&graph_index) {
        return Some(index);
    }
    let material = graph.materials().get(graph_index)?;

    let mut textures = Vec::with_capacity(material.textures.len());
    for relative in &material.textures {
        let source = config.filesystem_root.join(relative);
        if source.is_file() {
            let target = Path::new("textures").join(relative);
            textures.push(path_string(&target));
            if seen_textures.insert(target.clone()) {
                texture_copies.push((source, target));
            }
        } else {
            warnings.push(ExportWarning::MissingTexture {
                material: material.name.clone(),
                path: relative.clone(),
            });
            textures.push(path_string(relative));
        }
    }

    let index = materials.len() as u32;
    materials.push(MaterialEntry {
        name: material.name.clone(),
        textures,
    });
    lookup.insert(graph_index, index);
    Some(index)
}

/// Apply the axis conversion to mesh geometry. The conversion matrix is
/// orthonormal, so normals take it directly.
fn convert_mesh(mesh: &MeshData, conversion: Mat4) -> MeshData {
    MeshData {
        positions: mesh
            .positions
            .iter()
            .map(|p| conversion.transform_point3((*p).into()).to_array())
            .collect(),
        normals: mesh
            .normals
            .iter()
            .map(|n| conversion.transform_vector3((*n).into()).to_array())
            .collect(),
        uvs: mesh.uvs.clone(),
        triangles: mesh.triangles.clone(),
    }
}

/// Destination-relative path with '/' separators, as stored in the file.
fn path_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn copy_textures(destination: &Path, copies: &[(PathBuf, PathBuf)]) -> Result<(), ExportError> {
    if copies.is_empty() {
        return Ok(());
    }

    let dest_dir = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    for (source, relative) in copies {
        let target = dest_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &target)?;
        debug!("copied texture {} -> {}", source.display(), target.display());
    }

    Ok(())
}

fn write_scene_file(destination: &Path, tables: &SceneTables) -> Result<u64, ExportError> {
    let temp_path = destination.with_extension("tsc.tmp");

    let result = (|| -> io::Result<u64> {
        let file = File::create(&temp_path)?;
        let mut writer = CountingWriter::new(BufWriter::new(file));
        write_contents(&mut writer, tables)?;
        writer.flush()?;
        Ok(writer.written())
    })();

    match result {
        Ok(bytes) => match fs::rename(&temp_path, destination) {
            Ok(()) => Ok(bytes),
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(e.into())
            }
        },
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            Err(e.into())
        }
    }
}

/// Header and fixed-order sections: nodes, meshes, materials, tracks.
fn write_contents(w: &mut impl Write, tables: &SceneTables) -> io::Result<()> {
    w.write_all(MAGIC)?;
    writer::put_u32(w, VERSION)?;
    writer::put_u32(w, ENDIAN_TAG)?;
    writer::put_u32(w, tables.nodes.len() as u32)?;
    writer::put_u32(w, tables.mesh_blocks.len() as u32)?;
    writer::put_u32(w, tables.materials.len() as u32)?;
    writer::put_u32(w, tables.tracks.len() as u32)?;

    for node in &tables.nodes {
        writer::put_str(w, &node.name)?;
        writer::put_u32(w, node.parent.unwrap_or(NO_INDEX))?;
        writer::put_mat4(w, &node.transform)?;
        writer::put_u32(w, node.mesh.unwrap_or(NO_INDEX))?;
        writer::put_u32(w, node.material.unwrap_or(NO_INDEX))?;
    }

    for block in &tables.mesh_blocks {
        w.write_all(block)?;
    }

    for material in &tables.materials {
        writer::put_str(w, &material.name)?;
        writer::put_u32(w, material.textures.len() as u32)?;
        for texture in &material.textures {
            writer::put_str(w, texture)?;
        }
    }

    for track in &tables.tracks {
        writer::put_u32(w, track.node)?;
        writer::put_u32(w, track.keys.len() as u32)?;
        for (time, transform) in &track.keys {
            writer::put_f32(w, *time)?;
            writer::put_mat4(w, transform)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::reader::TscFile;
    use crate::scene::animation::{AnimationTrack, TransformKeyframe};
    use crate::scene::material::Material;
    use glam::Vec3;
    use tempfile::TempDir;

    fn triangle_mesh() -> MeshData {
        MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            triangles: vec![[0, 1, 2]],
        }
    }

    /// Config with identity axis conversion for exact round trips.
    fn identity_config(dir: &TempDir, name: &str) -> ExportConfig {
        let mut config = ExportConfig::new(dir.path().join(name), dir.path());
        config.source_axes = AxisSystem::TSC;
        config
    }

    #[test]
    fn test_empty_scene_zero_counts() {
        let dir = TempDir::new().unwrap();
        let graph = SceneGraph::new();
        let config = identity_config(&dir, "empty.tsc");

        let report = export(&graph, &config).unwrap();
        assert_eq!(report.nodes_written, 0);
        assert_eq!(report.meshes_written, 0);
        assert!(report.warnings.is_empty());

        let file = TscFile::open(&config.destination).unwrap();
        assert_eq!(file.header.node_count, 0);
        assert_eq!(file.header.mesh_count, 0);
        assert_eq!(file.header.material_count, 0);
        assert_eq!(file.header.animation_count, 0);
    }

    #[test]
    fn test_node_table_order_and_parents() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, "a");
        let _c = graph.add_child(a, "c");
        let _b = graph.add_child(root, "b");

        let config = identity_config(&dir, "tree.tsc");
        let report = export(&graph, &config).unwrap();
        assert_eq!(report.nodes_written, 3);

        let file = TscFile::open(&config.destination).unwrap();
        let names: Vec<&str> = file.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);

        assert_eq!(file.nodes[0].parent, None);
        assert_eq!(file.nodes[1].parent, Some(0));
        assert_eq!(file.nodes[2].parent, None);

        // No forward references
        for (i, node) in file.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                assert!((parent as usize) < i);
            }
        }
    }

    #[test]
    fn test_determinism_byte_identical() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let mesh = Arc::new(triangle_mesh());
        let material = graph.add_material(Material {
            name: "wood".to_string(),
            textures: vec!["wood.png".into()],
        });
        for i in 0..5 {
            let id = graph.add_child(root, format!("node_{}", i));
            graph.attach_mesh(id, mesh.clone());
            graph.set_material(id, material);
        }
        let mut track = AnimationTrack::new(graph.children(root).next().unwrap());
        track.add_keyframe(TransformKeyframe::new(0.0, Mat4::IDENTITY));
        track.add_keyframe(TransformKeyframe::new(
            1.0,
            Mat4::from_translation(Vec3::X),
        ));
        graph.add_animation(track);

        let config_a = identity_config(&dir, "first.tsc");
        let config_b = identity_config(&dir, "second.tsc");
        export(&graph, &config_a).unwrap();
        export(&graph, &config_b).unwrap();

        let bytes_a = fs::read(&config_a.destination).unwrap();
        let bytes_b = fs::read(&config_b.destination).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn test_mesh_dedup_by_content() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();

        // Separate allocations, identical content
        let a = graph.add_child(root, "a");
        graph.attach_mesh(a, Arc::new(triangle_mesh()));
        let b = graph.add_child(root, "b");
        graph.attach_mesh(b, Arc::new(triangle_mesh()));

        let c = graph.add_child(root, "c");
        let mut other = triangle_mesh();
        other.positions[0] = [5.0, 0.0, 0.0];
        graph.attach_mesh(c, Arc::new(other));

        let config = identity_config(&dir, "dedup.tsc");
        let report = export(&graph, &config).unwrap();
        assert_eq!(report.nodes_written, 3);
        assert_eq!(report.meshes_written, 2);

        let file = TscFile::open(&config.destination).unwrap();
        assert_eq!(file.header.mesh_count, 2);
        assert_eq!(file.nodes[0].mesh, Some(0));
        assert_eq!(file.nodes[1].mesh, Some(0));
        assert_eq!(file.nodes[2].mesh, Some(1));
    }

    #[test]
    fn test_mesh_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.add_child(root, "tri");
        graph.attach_mesh(node, Arc::new(triangle_mesh()));

        let config = identity_config(&dir, "tri.tsc");
        export(&graph, &config).unwrap();

        let file = TscFile::open(&config.destination).unwrap();
        assert_eq!(file.meshes.len(), 1);
        assert_eq!(file.meshes[0], triangle_mesh());
    }

    #[test]
    fn test_axis_conversion_applied() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.add_child(root, "up");
        // One unit along Blender's +Y, one vertex along Blender's +Z
        graph.set_transform(node, Mat4::from_translation(Vec3::Y));
        graph.attach_mesh(
            node,
            Arc::new(MeshData {
                positions: vec![[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]],
                normals: vec![],
                uvs: vec![],
                triangles: vec![[0, 1, 2]],
            }),
        );

        let mut config = ExportConfig::new(dir.path().join("axes.tsc"), dir.path());
        config.source_axes = AxisSystem::BLENDER;
        export(&graph, &config).unwrap();

        let file = TscFile::open(&config.destination).unwrap();

        // Blender +Y becomes -Z in the exported convention
        let translation = file.nodes[0].transform.w_axis;
        assert!((translation.truncate() - Vec3::NEG_Z).length() < 1e-6);

        // Blender +Z becomes +Y
        let p = Vec3::from(file.meshes[0].positions[0]);
        assert!((p - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_missing_texture_warning() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.add_child(root, "chair");
        let material = graph.add_material(Material {
            name: "fabric".to_string(),
            textures: vec!["missing.png".into()],
        });
        graph.set_material(node, material);

        let config = identity_config(&dir, "warn.tsc");
        let report = export(&graph, &config).unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.warnings[0],
            ExportWarning::MissingTexture {
                material: "fabric".to_string(),
                path: "missing.png".into(),
            }
        );

        // The material entry is still written
        let file = TscFile::open(&config.destination).unwrap();
        assert_eq!(file.materials.len(), 1);
        assert_eq!(file.materials[0].name, "fabric");
        assert_eq!(file.materials[0].textures, vec!["missing.png"]);
    }

    #[test]
    fn test_texture_copied_next_to_destination() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("tex")).unwrap();
        fs::write(dir.path().join("tex/wood.png"), b"png bytes").unwrap();

        let out_dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.add_child(root, "table");
        let material = graph.add_material(Material {
            name: "wood".to_string(),
            textures: vec!["tex/wood.png".into()],
        });
        graph.set_material(node, material);

        let mut config = ExportConfig::new(out_dir.path().join("scene.tsc"), dir.path());
        config.source_axes = AxisSystem::TSC;
        let report = export(&graph, &config).unwrap();
        assert!(report.warnings.is_empty());

        let copied = out_dir.path().join("textures/tex/wood.png");
        assert_eq!(fs::read(copied).unwrap(), b"png bytes");

        let file = TscFile::open(&config.destination).unwrap();
        assert_eq!(file.materials[0].textures, vec!["textures/tex/wood.png"]);
    }

    #[test]
    fn test_selection_only_subtrees() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, "a");
        let _c = graph.add_child(a, "c");
        let b = graph.add_child(root, "b");
        let d = graph.add_child(b, "d");
        graph.set_selected(a, true);
        graph.set_selected(d, true);

        let mut config = identity_config(&dir, "selection.tsc");
        config.selection_only = true;
        export(&graph, &config).unwrap();

        let file = TscFile::open(&config.destination).unwrap();
        let names: Vec<&str> = file.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d"]);

        // Subtree roots are written parentless
        assert_eq!(file.nodes[0].parent, None);
        assert_eq!(file.nodes[1].parent, Some(0));
        assert_eq!(file.nodes[2].parent, None);
    }

    #[test]
    fn test_empty_mesh_skipped_with_warning() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.add_child(root, "ghost");
        graph.attach_mesh(node, Arc::new(MeshData::default()));

        let config = identity_config(&dir, "ghost.tsc");
        let report = export(&graph, &config).unwrap();

        assert_eq!(report.meshes_written, 0);
        assert_eq!(
            report.warnings,
            vec![ExportWarning::EmptyMeshSkipped {
                node: "ghost".to_string(),
            }]
        );

        let file = TscFile::open(&config.destination).unwrap();
        assert_eq!(file.nodes[0].mesh, None);
    }

    #[test]
    fn test_invalid_mesh_skipped_with_warning() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.add_child(root, "broken");
        let mut mesh = triangle_mesh();
        mesh.triangles.push([0, 1, 9]);
        graph.attach_mesh(node, Arc::new(mesh));

        let config = identity_config(&dir, "broken.tsc");
        let report = export(&graph, &config).unwrap();

        assert_eq!(report.meshes_written, 0);
        assert!(matches!(
            report.warnings[0],
            ExportWarning::InvalidMeshSkipped { .. }
        ));
    }

    #[test]
    fn test_animations_keyed_by_assigned_id() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, "a");
        let b = graph.add_child(root, "b");

        let mut track = AnimationTrack::new(b);
        track.add_keyframe(TransformKeyframe::new(0.0, Mat4::IDENTITY));
        track.add_keyframe(TransformKeyframe::new(
            2.0,
            Mat4::from_translation(Vec3::X),
        ));
        graph.add_animation(track);

        // Empty track is omitted
        graph.add_animation(AnimationTrack::new(a));

        let config = identity_config(&dir, "anim.tsc");
        let report = export(&graph, &config).unwrap();
        assert_eq!(report.animations_written, 1);

        let file = TscFile::open(&config.destination).unwrap();
        assert_eq!(file.animations.len(), 1);
        assert_eq!(file.animations[0].node, 1); // "b" is the second entry
        assert_eq!(file.animations[0].keys.len(), 2);
        assert_eq!(file.animations[0].keys[0].0, 0.0);
        assert_eq!(file.animations[0].keys[1].0, 2.0);
    }

    #[test]
    fn test_track_for_unexported_node_omitted() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, "a");
        let b = graph.add_child(root, "b");
        graph.set_selected(a, true);

        let mut track = AnimationTrack::new(b);
        track.add_keyframe(TransformKeyframe::new(0.0, Mat4::IDENTITY));
        graph.add_animation(track);

        let mut config = identity_config(&dir, "filtered.tsc");
        config.selection_only = true;
        let report = export(&graph, &config).unwrap();
        assert_eq!(report.animations_written, 0);
    }

    #[test]
    fn test_cycle_detected() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, "a");
        let b = graph.add_child(a, "b");

        // Corrupt the graph directly; the public API cannot produce this
        graph.get_mut(b).unwrap().children.push(a);

        let config = identity_config(&dir, "cycle.tsc");
        let err = export(&graph, &config).unwrap_err();
        assert!(matches!(err, ExportError::CyclicGraph(_)));
        assert!(!config.destination.exists());
    }

    #[test]
    fn test_failed_write_leaves_no_destination() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add_child(root, "a");

        // Destination parent is a regular file, so file creation fails
        let mut config = ExportConfig::new(blocker.join("out.tsc"), dir.path());
        config.source_axes = AxisSystem::TSC;

        let err = export(&graph, &config).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(!config.destination.exists());
    }

    #[test]
    fn test_partial_write_failure_propagates() {
        struct FailingWriter {
            remaining: usize,
        }

        impl Write for FailingWriter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                if buf.len() > self.remaining {
                    return Err(io::Error::other("disk full"));
                }
                self.remaining -= buf.len();
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.add_child(root, "a");
        graph.attach_mesh(node, Arc::new(triangle_mesh()));

        let config = identity_config(&dir, "unused.tsc");
        let conversion = axis::conversion_matrix(config.source_axes, AxisSystem::TSC);
        let tables = assemble_tables(&graph, &config, conversion).unwrap();

        let mut failing = FailingWriter { remaining: 40 };
        assert!(write_contents(&mut failing, &tables).is_err());
    }

    #[test]
    fn test_no_temp_file_after_success() {
        let dir = TempDir::new().unwrap();
        let graph = SceneGraph::new();
        let config = identity_config(&dir, "clean.tsc");

        export(&graph, &config).unwrap();

        assert!(config.destination.exists());
        assert!(!config.destination.with_extension("tsc.tmp").exists());
    }

    #[test]
    fn test_input_graph_not_mutated() {
        let dir = TempDir::new().unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.add_child(root, "a");
        let local = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        graph.set_transform(node, local);

        let mut config = ExportConfig::new(dir.path().join("keep.tsc"), dir.path());
        config.source_axes = AxisSystem::BLENDER;
        export(&graph, &config).unwrap();

        assert_eq!(graph.get(node).unwrap().local_transform, local);
        assert_eq!(graph.node_count(), 2);
    }
}

//! Print a summary of a .tsc scene file
//!
//! Usage:
//!     inspect_tsc <FILE>

use std::env;
use std::process;

use tscex::export::TscFile;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.len() != 1 || args[0] == "-h" || args[0] == "--help" {
        eprintln!("Usage: inspect_tsc <FILE>");
        process::exit(if args.len() == 1 { 0 } else { 1 });
    }

    let file = match TscFile::open(&args[0]) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error reading {}: {}", args[0], e);
            process::exit(1);
        }
    };

    println!("{}", args[0]);
    println!("  Format version: {}", file.header.version);
    println!(
        "  {} nodes, {} meshes, {} materials, {} animation tracks",
        file.header.node_count,
        file.header.mesh_count,
        file.header.material_count,
        file.header.animation_count
    );

    if !file.nodes.is_empty() {
        println!();
        println!("Nodes:");
        for (i, node) in file.nodes.iter().enumerate() {
            let parent = node
                .parent
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            let mesh = node
                .mesh
                .map(|m| format!(" mesh={}", m))
                .unwrap_or_default();
            let material = node
                .material
                .map(|m| format!(" material={}", m))
                .unwrap_or_default();
            println!("  [{}] '{}' parent={}{}{}", i, node.name, parent, mesh, material);
        }
    }

    if !file.meshes.is_empty() {
        println!();
        println!("Meshes:");
        for (i, mesh) in file.meshes.iter().enumerate() {
            println!(
                "  [{}] {} vertices, {} triangles{}{}",
                i,
                mesh.positions.len(),
                mesh.triangles.len(),
                if mesh.normals.is_empty() { "" } else { ", normals" },
                if mesh.uvs.is_empty() { "" } else { ", uvs" },
            );
        }
    }

    if !file.materials.is_empty() {
        println!();
        println!("Materials:");
        for (i, material) in file.materials.iter().enumerate() {
            println!("  [{}] '{}'", i, material.name);
            for texture in &material.textures {
                println!("      {}", texture);
            }
        }
    }

    if !file.animations.is_empty() {
        println!();
        println!("Animation tracks:");
        for track in &file.animations {
            println!("  node {}: {} keyframes", track.node, track.keys.len());
        }
    }
}

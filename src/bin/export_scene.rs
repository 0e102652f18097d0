//! Scene export utility
//!
//! Serializes a JSON scene document to a .tsc binary scene file.
//!
//! Usage:
//!     export_scene [OPTIONS] <SCENE_JSON> <OUTPUT_TSC>
//!
//! Options:
//!     -r, --root <DIR>        Filesystem root for texture paths
//!                             (default: $ASSETS_ROOT, else current dir)
//!     -s, --selection-only    Export selected subtrees only
//!     --forward <AXIS>        Source forward axis: X, Y, Z, -X, -Y, -Z (default: -Y)
//!     --up <AXIS>             Source up axis (default: Z)
//!     --json                  Print the export report as JSON
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use tscex::core::logging;
use tscex::export::{self, ExportConfig};
use tscex::math::axis::{Axis, AxisSystem};
use tscex::scene::SceneDocument;

fn print_help() {
    eprintln!("export_scene - Serialize a JSON scene document to a .tsc file");
    eprintln!();
    eprintln!("Usage: export_scene [OPTIONS] <SCENE_JSON> <OUTPUT_TSC>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -r, --root <DIR>        Filesystem root for texture paths");
    eprintln!("                            (default: $ASSETS_ROOT, else current dir)");
    eprintln!("    -s, --selection-only    Export selected subtrees only");
    eprintln!("    --forward <AXIS>        Source forward axis: X, Y, Z, -X, -Y, -Z (default: -Y)");
    eprintln!("    --up <AXIS>             Source up axis (default: Z)");
    eprintln!("    --json                  Print the export report as JSON");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    export_scene -r ./assets scene.json scene.tsc");
}

#[derive(Debug)]
struct Args {
    scene_path: PathBuf,
    output_path: PathBuf,
    root: PathBuf,
    selection_only: bool,
    forward: Axis,
    up: Axis,
    json: bool,
}

fn default_root() -> PathBuf {
    env::var_os("ASSETS_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        return Err("Missing scene document and output path".to_string());
    }

    let mut root = default_root();
    let mut selection_only = false;
    let mut forward = Axis::NegY;
    let mut up = Axis::Z;
    let mut json = false;
    let mut positional: Vec<PathBuf> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-r" | "--root" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --root".to_string());
                }
                root = PathBuf::from(&args[i]);
            }
            "-s" | "--selection-only" => {
                selection_only = true;
            }
            "--forward" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --forward".to_string());
                }
                forward = Axis::parse(&args[i])
                    .ok_or_else(|| format!("Invalid axis: {}", args[i]))?;
            }
            "--up" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --up".to_string());
                }
                up = Axis::parse(&args[i])
                    .ok_or_else(|| format!("Invalid axis: {}", args[i]))?;
            }
            "--json" => {
                json = true;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            path => {
                positional.push(PathBuf::from(path));
            }
        }
        i += 1;
    }

    if positional.len() != 2 {
        return Err(format!(
            "Expected <SCENE_JSON> and <OUTPUT_TSC>, got {} paths",
            positional.len()
        ));
    }
    let output_path = positional.pop().unwrap_or_default();
    let scene_path = positional.pop().unwrap_or_default();

    Ok(Args {
        scene_path,
        output_path,
        root,
        selection_only,
        forward,
        up,
        json,
    })
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    let start = Instant::now();

    let document = match SceneDocument::load(&args.scene_path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.scene_path.display(), e);
            std::process::exit(1);
        }
    };

    let graph = match document.build() {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error in scene document: {}", e);
            std::process::exit(1);
        }
    };

    let mut config = ExportConfig::new(args.output_path.clone(), args.root.clone());
    config.selection_only = args.selection_only;
    config.source_axes = AxisSystem {
        forward: args.forward,
        up: args.up,
    };

    let report = match export::export(&graph, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Export failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Export complete:");
    println!("  Nodes: {}", report.nodes_written);
    println!("  Meshes: {}", report.meshes_written);
    println!("  Materials: {}", report.materials_written);
    println!("  Animation tracks: {}", report.animations_written);
    println!("  Bytes written: {}", report.bytes_written);
    println!("  Time: {:.2}s", start.elapsed().as_secs_f64());
    println!("  Output: {}", args.output_path.display());

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  {}", warning);
        }
    }
}

//! gcviewer CLI - inspect and export extrusion traces

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gcviewer::{
    init_logging, init_logging_with_level, Bounds, Config, Error, FilamentSettings, TraceScene,
    BUILD_DATE, VERSION,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "gcviewer")]
#[command(about = "Inspect 3D printer G-Code as layers, paths and tube meshes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Options {
    /// Settings file (.json or .toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Level of detail of the tube cross-section (0-15)
    #[arg(short, long, global = true)]
    lod: Option<u8>,

    /// Filament diameter in mm
    #[arg(long, global = true)]
    diameter: Option<f64>,

    /// Filament packing density (0-1]
    #[arg(long, global = true)]
    density: Option<f64>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display layer, path and mesh statistics for a G-Code file
    Info {
        /// G-Code file
        file: PathBuf,
    },
    /// Write vertex, index and layer range buffers for a G-Code file
    Export {
        /// G-Code file
        file: PathBuf,
        /// Output directory
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.options.verbose {
        init_logging_with_level(tracing::Level::DEBUG)?;
    } else {
        init_logging()?;
    }
    info!("gcviewer {} (built {})", VERSION, BUILD_DATE);

    let config = resolve_config(&cli.options)?;

    match cli.command {
        Commands::Info { file } => {
            let scene = load_scene(&file, &config)?;
            show_info(&file, &scene);
        }
        Commands::Export { file, out_dir } => {
            let scene = load_scene(&file, &config)?;
            export_buffers(&scene, &out_dir)?;
        }
    }

    Ok(())
}

/// Settings file first, then command-line overrides
fn resolve_config(options: &Options) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(lod) = options.lod {
        config.view.lod = lod;
    }
    if let Some(diameter) = options.diameter {
        config.filament.filament_diameter = diameter;
    }
    if let Some(density) = options.density {
        config.filament.packing_density = density;
    }

    config.validate()?;
    Ok(config)
}

fn load_scene(file: &Path, config: &Config) -> Result<TraceScene> {
    let mut scene = TraceScene::new(config.view);
    let loaded = scene
        .load_file(file, &config.filament)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if !loaded {
        return Err(Error::other(format!(
            "Invalid filament settings: diameter {} mm, packing {}",
            config.filament.filament_diameter, config.filament.packing_density
        ))
        .into());
    }
    Ok(scene)
}

fn show_info(file: &Path, scene: &TraceScene) {
    let trace = scene.trace();
    let mesh = scene.mesh();
    let filament: FilamentSettings = scene.model().filament();
    let extrusions = trace.extrusion_command_count();
    let travel_paths = trace
        .layers()
        .flat_map(|(id, _)| trace.paths_of(id))
        .filter(|(_, p)| p.travel)
        .count();

    println!("File: {}", file.display());
    println!(
        "Filament: {:.2} mm, packing {:.2} ({:.4} mm²)",
        filament.filament_diameter,
        filament.packing_density,
        filament.cross_section_area()
    );
    println!("Layers: {}", trace.layer_count());
    println!(
        "Paths: {} ({} extrusion, {} travel)",
        trace.path_count(),
        trace.path_count() - travel_paths,
        travel_paths
    );
    println!(
        "Commands: {} ({} extrusion, {} other)",
        trace.command_count(),
        extrusions,
        trace.command_count() - extrusions
    );
    print_bounds(scene.bounds());
    println!(
        "Mesh (lod {}): {} vertices, {} triangles",
        scene.ring_table().lod(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
}

fn print_bounds(bounds: &Bounds) {
    if !bounds.is_valid() {
        println!("Bounds: none");
        return;
    }
    println!(
        "Bounds: X {:.2}..{:.2}  Y {:.2}..{:.2}  Z {:.2}..{:.2}",
        bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y, bounds.min_z, bounds.max_z
    );
}

#[derive(Serialize)]
struct LayerRange {
    layer: usize,
    z: f64,
    start: u32,
    end: u32,
}

#[derive(Serialize)]
struct ExportManifest {
    lod: u32,
    vertex_count: usize,
    index_count: usize,
    layers: Vec<LayerRange>,
}

fn export_buffers(scene: &TraceScene, out_dir: &Path) -> Result<()> {
    use std::fs;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let trace = scene.trace();
    let mesh = scene.mesh();

    fs::write(out_dir.join("vertices.bin"), mesh.vertex_bytes())?;
    fs::write(out_dir.join("indices.bin"), mesh.index_bytes())?;

    let layers = trace
        .layers()
        .map(|(id, layer)| {
            let (start, end) = mesh.range_for(id.into());
            LayerRange {
                layer: id.0,
                z: layer.z,
                start,
                end,
            }
        })
        .collect();
    let manifest = ExportManifest {
        lod: scene.ring_table().lod(),
        vertex_count: mesh.vertices.len(),
        index_count: mesh.index_count(),
        layers,
    };
    fs::write(
        out_dir.join("ranges.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;

    println!(
        "Exported {} vertices and {} indices to {}",
        mesh.vertices.len(),
        mesh.index_count(),
        out_dir.display()
    );
    Ok(())
}

//! Library-level load and buffer export through the root crate

use gcviewer::{Config, LayerId, TraceScene, Vertex};
use tempfile::TempDir;

const CUBE_LAYERS: &str = "\
G1 Z0.2
G1 X0 Y0
G1 X20 Y0 E1
G1 X20 Y20 E1
G1 X0 Y20 E1
G1 X0 Y0 E1
G1 Z0.4
G1 X20 Y0 E1
G1 X20 Y20 E1
";

#[test]
fn test_scene_buffers_match_mesh() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cube.gcode");
    std::fs::write(&path, CUBE_LAYERS).unwrap();

    let config = Config::default();
    let mut scene = TraceScene::new(config.view);
    assert!(scene.load_file(&path, &config.filament).unwrap());

    let mesh = scene.mesh();
    assert_eq!(
        mesh.vertex_bytes().len(),
        mesh.vertices.len() * std::mem::size_of::<Vertex>()
    );
    assert_eq!(std::mem::size_of::<Vertex>(), 24);
    assert_eq!(mesh.index_bytes().len(), mesh.index_count() * 4);

    let (_, first_end) = mesh.range_for(LayerId(0).into());
    let (second_start, second_end) = mesh.range_for(LayerId(1).into());
    assert_eq!(first_end, second_start);
    assert_eq!(second_end as usize, mesh.index_count());
}

#[test]
fn test_config_file_drives_scene() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("gcviewer.toml");

    let mut config = Config::default();
    config.view.lod = 0;
    config.filament.filament_diameter = 2.85;
    config.save_to_file(&config_path).unwrap();

    let loaded = Config::load_from_file(&config_path).unwrap();
    let mut scene = TraceScene::new(loaded.view);
    assert!(scene.load_trace(
        CUBE_LAYERS.lines(),
        loaded.filament.filament_diameter,
        loaded.filament.packing_density,
    ));

    assert_eq!(scene.ring_table().ring_size(), 4);
    assert_eq!(scene.model().filament().filament_diameter, 2.85);
}

//! Settings file round-trips

use gcviewer_core::{Config, FilamentSettings, ViewSettings};
use tempfile::TempDir;

fn sample_config() -> Config {
    Config {
        filament: FilamentSettings::new(2.85, 0.97),
        view: ViewSettings {
            lod: 7,
            hide_upper_layers: true,
            ..ViewSettings::default()
        },
    }
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gcviewer.json");

    let config = sample_config();
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gcviewer.toml");

    let config = sample_config();
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_sections_use_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    std::fs::write(
        &path,
        "[filament]\nfilament_diameter = 1.75\npacking_density = 0.9\n",
    )
    .unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.filament.packing_density, 0.9);
    assert_eq!(loaded.view, ViewSettings::default());
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"filament":{"filament_diameter":1.75,"packing_density":1.0},"view":{"lod":40}}"#,
    )
    .unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(err.is_settings_error());
}

#[test]
fn test_saving_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never.json");

    let mut config = Config::default();
    config.filament.filament_diameter = -1.0;

    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.is_io_error());
}

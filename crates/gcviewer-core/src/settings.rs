//! Filament and view settings for gcviewer
//!
//! Settings are grouped into two sections:
//! - Filament settings (diameter, packing density) used when parsing a trace
//! - View settings (level of detail, layer visibility, highlight colors)
//!
//! A [`Config`] can be stored as JSON or TOML; the format is picked from the
//! file extension.

use crate::constants::{DEFAULT_FILAMENT_DIAMETER, DEFAULT_LOD, DEFAULT_PACKING_DENSITY, MAX_LOD};
use crate::error::{Error, Result, SettingsError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;
use tracing::debug;

/// Filament parameters applied to a whole load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilamentSettings {
    /// Filament diameter in mm
    pub filament_diameter: f64,
    /// Fraction of the filament volume that ends up in the bead
    pub packing_density: f64,
}

impl Default for FilamentSettings {
    fn default() -> Self {
        Self {
            filament_diameter: DEFAULT_FILAMENT_DIAMETER,
            packing_density: DEFAULT_PACKING_DENSITY,
        }
    }
}

impl FilamentSettings {
    /// Create filament settings from a diameter and packing density
    pub fn new(filament_diameter: f64, packing_density: f64) -> Self {
        Self {
            filament_diameter,
            packing_density,
        }
    }

    /// Effective cross-section area of the filament in mm²
    pub fn cross_section_area(&self) -> f64 {
        cross_section_area(self.filament_diameter, self.packing_density)
    }

    /// Check that both parameters are usable
    pub fn validate(&self) -> std::result::Result<(), SettingsError> {
        if !self.filament_diameter.is_finite() || self.filament_diameter <= 0.0 {
            return Err(SettingsError::invalid(
                "filament_diameter",
                format!("must be > 0, got {}", self.filament_diameter),
            ));
        }
        if !self.packing_density.is_finite()
            || self.packing_density <= 0.0
            || self.packing_density > 1.0
        {
            return Err(SettingsError::invalid(
                "packing_density",
                format!("must be in (0, 1], got {}", self.packing_density),
            ));
        }
        Ok(())
    }
}

/// Cross-section area of a filament, scaled by its packing density
///
/// The result is always non-negative.
pub fn cross_section_area(filament_diameter: f64, packing_density: f64) -> f64 {
    (PI * filament_diameter * filament_diameter / 4.0 * packing_density).abs()
}

/// Colors used when drawing a trace with a highlighted selection (RGBA)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Layers below the selected layer
    pub lower_layers: [f32; 4],
    /// The selected layer
    pub selected_layer: [f32; 4],
    /// The selected command inside the selected layer
    pub selected_command: [f32; 4],
    /// Layers above the selected layer
    pub upper_layers: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            lower_layers: [0.55, 0.55, 0.6, 1.0],
            selected_layer: [0.1, 0.6, 1.0, 1.0],
            selected_command: [1.0, 0.25, 0.1, 1.0],
            upper_layers: [0.8, 0.8, 0.8, 1.0],
        }
    }
}

/// 3D view settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Level of detail of the tube cross-section (0..=15)
    pub lod: u8,
    /// Skip drawing layers above the selected one
    #[serde(default)]
    pub hide_upper_layers: bool,
    /// Highlight colors
    #[serde(default)]
    pub palette: Palette,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            lod: DEFAULT_LOD,
            hide_upper_layers: false,
            palette: Palette::default(),
        }
    }
}

impl ViewSettings {
    /// Check that the level of detail is within range
    pub fn validate(&self) -> std::result::Result<(), SettingsError> {
        if self.lod > MAX_LOD {
            return Err(SettingsError::invalid(
                "lod",
                format!("must be <= {}, got {}", MAX_LOD, self.lod),
            ));
        }
        Ok(())
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Filament settings
    #[serde(default)]
    pub filament: FilamentSettings,
    /// 3D view settings
    #[serde(default)]
    pub view: ViewSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content).map_err(SettingsError::from)?,
            ConfigFormat::Toml => toml::from_str(&content).map_err(SettingsError::from)?,
        };

        config.validate()?;
        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(SettingsError::from)?,
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(SettingsError::from)?,
        };

        std::fs::write(path, content)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.filament.validate()?;
        self.view.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(Error::from(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            ))),
        }
    }
}

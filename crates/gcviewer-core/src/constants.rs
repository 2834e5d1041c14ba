//! Shared numeric constants.

/// Thread width above which a command counts as depositing material (mm).
pub const EXTRUSION_EPSILON: f64 = 0.001;

/// Segments shorter than this are treated as zero-length (mm).
pub const NULL_SEGMENT_LENGTH: f64 = 1e-12;

/// Level of detail used when no setting is available.
pub const DEFAULT_LOD: u8 = 3;

/// Highest level of detail accepted by the settings layer.
pub const MAX_LOD: u8 = 15;

/// Default filament diameter (mm).
pub const DEFAULT_FILAMENT_DIAMETER: f64 = 1.75;

/// Default packing density (dimensionless, 1.0 = solid filament).
pub const DEFAULT_PACKING_DENSITY: f64 = 1.0;

/// Fraction of the print extents added on each side of the bed plane.
pub const BED_PADDING: f64 = 0.1;

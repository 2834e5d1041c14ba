//! Shared viewport helpers
//!
//! Extents of the deposited material and the bed plane drawn under it.

use crate::gcode::Trace;
use serde::Serialize;

/// Axis-aligned extents of the deposited material
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
            min_z: f64::MAX,
            max_z: f64::MIN,
        }
    }

    /// Extents of every extrusion command of `trace`
    ///
    /// Z runs from the bottom of the lowest bead to the top of the highest.
    pub fn from_trace(trace: &Trace) -> Self {
        let mut bounds = Self::new();
        for (_, command) in trace.commands().filter(|(_, c)| c.is_extrusion()) {
            let bottom = command.z - command.thread_height;
            for p in [command.thread.start, command.thread.end] {
                bounds.update(p.x, p.y, bottom);
                bounds.update(p.x, p.y, command.z);
            }
        }
        bounds
    }

    pub fn update(&mut self, x: f64, y: f64, z: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
            && self.min_z.is_finite()
            && self.max_z.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
            // A single layer is a flat slab
            && self.min_z <= self.max_z
    }

    /// Bed plane under the print, grown by `padding` of the extents per side
    pub fn bed_plane(&self, padding: f64) -> BedPlane {
        if !self.is_valid() {
            return BedPlane {
                min_x: 0.0,
                max_x: 100.0,
                min_y: 0.0,
                max_y: 100.0,
                z: 0.0,
            };
        }

        let padding_x = (self.max_x - self.min_x) * padding;
        let padding_y = (self.max_y - self.min_y) * padding;
        BedPlane {
            min_x: self.min_x - padding_x,
            max_x: self.max_x + padding_x,
            min_y: self.min_y - padding_y,
            max_y: self.max_y + padding_y,
            z: self.min_z,
        }
    }
}

/// Rectangle the print sits on
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BedPlane {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub z: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcode::TraceParser;
    use gcviewer_core::constants::BED_PADDING;

    #[test]
    fn test_bounds_skip_travel() {
        let trace = TraceParser::default()
            .with_initial_z_rise(0.2)
            .parse_str("G1 X-50 Y-50\nG1 X10 Y0\nG1 X20 Y10 E1\n");
        let bounds = Bounds::from_trace(&trace);

        assert!(bounds.is_valid());
        assert_eq!((bounds.min_x, bounds.max_x), (10.0, 20.0));
        assert_eq!((bounds.min_y, bounds.max_y), (0.0, 10.0));
        assert!((bounds.min_z + 0.2).abs() < 1e-12);
        assert_eq!(bounds.max_z, 0.0);
    }

    #[test]
    fn test_bed_plane_padding() {
        let mut bounds = Bounds::new();
        bounds.update(0.0, 0.0, 0.0);
        bounds.update(100.0, 50.0, 2.0);

        let bed = bounds.bed_plane(BED_PADDING);
        assert_eq!(bed.min_x, -10.0);
        assert_eq!(bed.max_x, 110.0);
        assert_eq!(bed.min_y, -5.0);
        assert_eq!(bed.max_y, 55.0);
        assert_eq!(bed.z, 0.0);
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = Bounds::from_trace(&TraceParser::default().parse_str(""));
        assert!(!bounds.is_valid());
        assert_eq!(bounds.bed_plane(BED_PADDING).max_x, 100.0);
    }
}

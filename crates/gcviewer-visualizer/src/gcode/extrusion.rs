//! Deposited bead geometry
//!
//! Converts the filament fed over one segment into the width and height
//! of the bead it leaves behind. The bead is modelled as a rectangle of
//! height `z_rise` with half-circle ends; when that shape cannot hold the
//! fed volume it falls back to a circular section (bridging).

use super::trace::Segment;
use glam::DVec2;
use std::f64::consts::PI;

/// Cross-section of one deposited thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreadGeometry {
    pub segment: Segment,
    pub width: f64,
    pub height: f64,
}

impl ThreadGeometry {
    /// Geometry of a move that deposits nothing
    pub fn travel(segment: Segment) -> Self {
        Self {
            segment,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_travel(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Compute the bead left by feeding `feed` mm of filament from `begin` to `end`
///
/// `z_rise` is the height gained by the last layer change and
/// `filament_area` the effective filament cross-section. A non-positive
/// feed or a null segment is a travel move. A non-positive `z_rise`
/// leaves no flat bead to fit, so the section is circular.
pub fn thread_geometry(
    begin: DVec2,
    end: DVec2,
    feed: f64,
    z_rise: f64,
    filament_area: f64,
) -> ThreadGeometry {
    let segment = Segment::new(begin, end);
    if feed.is_nan() || feed <= 0.0 || segment.is_null() {
        return ThreadGeometry::travel(segment);
    }

    let thread_area = filament_area * feed / segment.length();
    if !thread_area.is_finite() || thread_area <= 0.0 {
        return ThreadGeometry::travel(segment);
    }

    let flat = (z_rise > 0.0 && z_rise.is_finite())
        .then(|| (thread_area / z_rise - PI * z_rise / 4.0 + z_rise, z_rise))
        .filter(|(width, height)| width >= height);

    let (width, height) = flat.unwrap_or_else(|| {
        let diameter = (thread_area / PI).sqrt();
        (diameter, diameter)
    });

    ThreadGeometry {
        segment,
        width,
        height,
    }
}

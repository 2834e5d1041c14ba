//! Cross-section ring tables
//!
//! A tube cross-section is a stadium: a rectangle capped by two half
//! circles of radius `height / 2`. Each half circle is sampled at
//! `lod + 2` angles over `[0, π]`, giving rings of `2 · (lod + 2)` points.
//! The first half runs down the `+side` flank from the top, the second
//! half runs back up the `-side` flank.

use super::tube_mesh::Vertex;
use glam::DVec2;
use std::f64::consts::PI;

/// Sine and cosine samples for one level of detail
///
/// Immutable once built; a new level of detail needs a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct RingTable {
    lod: u32,
    half: usize,
    sin: Vec<f64>,
    cos: Vec<f64>,
}

impl RingTable {
    pub fn new(lod: u32) -> Self {
        // Two samples per half ring at the very least
        let half = (lod as usize).saturating_add(2).max(2);
        let step = PI / (half - 1) as f64;

        let mut sin = Vec::with_capacity(2 * half);
        let mut cos = Vec::with_capacity(2 * half);
        for i in 0..2 * half {
            // The second half restarts at π so both flanks share their ends
            let k = if i < half { i } else { i - 1 };
            let angle = k as f64 * step;
            sin.push(angle.sin());
            cos.push(angle.cos());
        }

        Self {
            lod,
            half,
            sin,
            cos,
        }
    }

    pub fn lod(&self) -> u32 {
        self.lod
    }

    /// Number of points in one ring
    pub fn ring_size(&self) -> usize {
        2 * self.half
    }

    /// Number of points on one flank
    pub fn half_size(&self) -> usize {
        self.half
    }

    /// `(sin, cos)` of ring point `i`
    pub fn sample(&self, i: usize) -> (f64, f64) {
        (self.sin[i], self.cos[i])
    }

    /// Distance from the bead axis to the center of either half circle
    ///
    /// With an even flank count no sample sits at π/2, so the flanks are
    /// pushed out until the widest samples reach `width / 2`.
    pub fn center_offset(&self, width: f64, height: f64) -> f64 {
        let width = width.max(height);
        let radius = height / 2.0;
        let mut offset = width / 2.0 - radius;
        if self.half % 2 == 0 {
            offset += radius - radius * self.sin[self.half / 2];
        }
        offset
    }

    /// Append one ring centred on `center`
    ///
    /// `side` is the unit in-plane normal of the segment and `z` the top
    /// of the bead. Normals point away from the bead axis.
    pub fn push_ring(
        &self,
        out: &mut Vec<Vertex>,
        center: DVec2,
        side: DVec2,
        z: f64,
        width: f64,
        height: f64,
    ) {
        let radius = height / 2.0;
        let offset = self.center_offset(width, height);
        let axis_z = z - radius;

        out.reserve(self.ring_size());
        for i in 0..self.ring_size() {
            let (s, c) = self.sample(i);
            let shift = if i < self.half { offset } else { -offset };
            let p = center + side * (s * radius + shift);
            out.push(Vertex::new(
                [p.x, p.y, axis_z + c * radius],
                [s * side.x, s * side.y, c],
            ));
        }
    }
}

//! Tube mesh generation
//!
//! Every extrusion path becomes one closed tube: a start cap, a hull
//! between the rings at both ends of each segment, a mitered hull joining
//! consecutive segments and an end cap. Triangles are wound
//! counter-clockwise when seen from outside the tube (right-handed, Z up).
//!
//! Index ranges for each layer, path and command are recorded into a
//! [`RangeIndex`] while the buffers are written.

use super::range_index::RangeIndex;
use super::ring::RingTable;
use crate::gcode::{Command, CommandId, Trace, TraceNode};
use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::{debug, warn};

/// Largest vertex or index count addressable by `u32` indices
const MAX_BUFFER_LEN: usize = u32::MAX as usize;

/// Vertex layout uploaded to the graphics buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f64; 3], normal: [f64; 3]) -> Self {
        Self {
            position: position.map(|v| v as f32),
            normal: normal.map(|v| v as f32),
        }
    }

    /// Copy with the normal turned by `angle` radians around +Z
    fn rotated(&self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let [x, y, z] = self.normal.map(f64::from);
        Self {
            position: self.position,
            normal: [(x * c - y * s) as f32, (x * s + y * c) as f32, z as f32],
        }
    }

    /// Copy with the normal replaced
    fn with_normal(&self, normal: [f64; 3]) -> Self {
        Self {
            position: self.position,
            normal: normal.map(|v| v as f32),
        }
    }
}

/// Vertex and index buffers of a built trace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TubeMesh {
    pub vertices: Vec<Vertex>,
    /// Triangle list
    pub indices: Vec<u32>,
    pub ranges: RangeIndex,
}

impl TubeMesh {
    /// Build the mesh of every extrusion path in `trace`
    pub fn build(trace: &Trace, table: &RingTable) -> Self {
        let ranges = RangeIndex::for_trace(trace);
        let mut builder = TubeMeshBuilder::new(table, ranges, MAX_BUFFER_LEN);
        builder.build(trace);
        let mesh = builder.finish();

        debug!(
            lod = table.lod(),
            vertices = mesh.vertices.len(),
            triangles = mesh.triangle_count(),
            "Built tube mesh"
        );
        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer as raw bytes, ready for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes, ready for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Half-open index range of `node`, `(0, 0)` when unknown
    pub fn range_for(&self, node: TraceNode) -> (u32, u32) {
        self.ranges.range_for(node)
    }
}

/// End of the last segment of the tube being built
#[derive(Debug, Clone, Copy)]
struct TubeEnd {
    command: CommandId,
    point: DVec2,
    direction: DVec2,
    angle: f64,
    z: f64,
    height: f64,
}

#[derive(Debug, Clone, Copy)]
enum TubeState {
    /// No segment emitted since the last cap
    Empty,
    /// Start cap written; further segments are mitered onto `TubeEnd`
    Open(TubeEnd),
}

struct TubeMeshBuilder<'a> {
    table: &'a RingTable,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    ranges: RangeIndex,
    state: TubeState,
    /// Buffer length neither vertices nor indices may exceed
    limit: usize,
    full: bool,
}

impl<'a> TubeMeshBuilder<'a> {
    fn new(table: &'a RingTable, ranges: RangeIndex, limit: usize) -> Self {
        Self {
            table,
            vertices: Vec::new(),
            indices: Vec::new(),
            ranges,
            state: TubeState::Empty,
            limit: limit.min(MAX_BUFFER_LEN),
            full: false,
        }
    }

    /// Current index count; never above `limit`, so it fits in `u32`
    fn offset(&self) -> u32 {
        u32::try_from(self.indices.len()).unwrap_or(u32::MAX)
    }

    /// Whether one more segment and the cap closing it still fit
    ///
    /// A segment adds at most `4n` ring vertices and `12n` indices; its end
    /// cap adds `n + 1` vertices and `3n` indices. Once a segment is refused
    /// the mesh stops growing.
    fn has_room(&mut self) -> bool {
        if self.full {
            return false;
        }
        let n = self.table.ring_size();
        let limit = self.limit;
        let fits = |len: usize, extra: usize| len.checked_add(extra).is_some_and(|t| t <= limit);
        if fits(self.vertices.len(), 5 * n + 1) && fits(self.indices.len(), 15 * n) {
            return true;
        }

        warn!(
            vertices = self.vertices.len(),
            indices = self.indices.len(),
            "Mesh buffers full, remaining extrusions are not drawn"
        );
        self.full = true;
        false
    }

    fn build(&mut self, trace: &Trace) {
        for (layer_id, _) in trace.layers() {
            let layer_start = self.offset();
            for (path_id, _) in trace.paths_of(layer_id) {
                let path_start = self.offset();
                for (command_id, command) in trace.commands_of(path_id) {
                    let direction = command
                        .is_extrusion()
                        .then(|| command.thread.direction())
                        .flatten()
                        .filter(|_| self.has_room());
                    let Some(direction) = direction else {
                        // The cap belongs to the previous command
                        self.close_tube();
                        let at = self.offset();
                        self.ranges.set(command_id.into(), at..at);
                        continue;
                    };
                    let start = self.offset();
                    self.add_segment(command_id, command, direction);
                    self.ranges.set(command_id.into(), start..self.offset());
                }
                self.close_tube();
                self.ranges.set(path_id.into(), path_start..self.offset());
            }
            self.ranges.set(layer_id.into(), layer_start..self.offset());
        }
    }

    fn finish(mut self) -> TubeMesh {
        self.close_tube();
        TubeMesh {
            vertices: self.vertices,
            indices: self.indices,
            ranges: self.ranges,
        }
    }

    fn add_segment(&mut self, id: CommandId, command: &Command, direction: DVec2) {
        let side = DVec2::new(direction.y, -direction.x);
        let start = command.thread.start;
        let end = command.thread.end;
        let angle = command.thread.angle();
        let n = self.table.ring_size();

        match self.state {
            TubeState::Empty => self.start_cap(start, direction, side, command),
            TubeState::Open(previous) => {
                let delta = miter_half_angle(previous.angle, angle);
                let base = self.vertices.len();
                self.vertices.extend_from_within(base - n..base);
                for v in &mut self.vertices[base..] {
                    *v = v.rotated(delta);
                }
                let ring_start = self.vertices.len();
                self.push_ring(start, side, command);
                for v in &mut self.vertices[ring_start..] {
                    *v = v.rotated(-delta);
                }
                self.hull(base, ring_start);
            }
        }

        let ring0 = self.vertices.len();
        self.push_ring(start, side, command);
        let ring1 = self.vertices.len();
        self.push_ring(end, side, command);
        self.hull(ring0, ring1);

        self.state = TubeState::Open(TubeEnd {
            command: id,
            point: end,
            direction,
            angle,
            z: command.z,
            height: command.thread_height,
        });
    }

    fn start_cap(&mut self, point: DVec2, direction: DVec2, side: DVec2, command: &Command) {
        let n = self.table.ring_size();
        let base = self.vertices.len();
        let normal = [-direction.x, -direction.y, 0.0];

        self.push_ring(point, side, command);
        for v in &mut self.vertices[base..] {
            *v = v.with_normal(normal);
        }
        let center = vertex_index(self.vertices.len());
        self.vertices.push(Vertex::new(
            [point.x, point.y, command.z - command.thread_height / 2.0],
            normal,
        ));

        for i in 0..n {
            self.indices.extend_from_slice(&[
                center,
                vertex_index(base + (i + 1) % n),
                vertex_index(base + i),
            ]);
        }
    }

    /// Cap the open tube, if any, and charge the cap to its last command
    fn close_tube(&mut self) {
        let TubeState::Open(end) = self.state else {
            return;
        };
        self.state = TubeState::Empty;

        let n = self.table.ring_size();
        let ring = self.vertices.len() - n;
        let normal = [end.direction.x, end.direction.y, 0.0];

        self.vertices.extend_from_within(ring..ring + n);
        let base = ring + n;
        for v in &mut self.vertices[base..] {
            *v = v.with_normal(normal);
        }
        let center = vertex_index(self.vertices.len());
        self.vertices.push(Vertex::new(
            [end.point.x, end.point.y, end.z - end.height / 2.0],
            normal,
        ));

        for i in 0..n {
            self.indices.extend_from_slice(&[
                vertex_index(base + i),
                vertex_index(base + (i + 1) % n),
                center,
            ]);
        }
        self.ranges.extend_end(end.command.into(), self.offset());
    }

    fn push_ring(&mut self, center: DVec2, side: DVec2, command: &Command) {
        self.table.push_ring(
            &mut self.vertices,
            center,
            side,
            command.z,
            command.thread_width,
            command.thread_height,
        );
    }

    /// Stitch the ring at `ring0` to the ring at `ring1`
    fn hull(&mut self, ring0: usize, ring1: usize) {
        let n = self.table.ring_size();
        self.indices.reserve(6 * n);
        for i in 0..n {
            let j = (i + 1) % n;
            let (a0, a1) = (vertex_index(ring0 + i), vertex_index(ring0 + j));
            let (b0, b1) = (vertex_index(ring1 + i), vertex_index(ring1 + j));
            self.indices.extend_from_slice(&[a0, a1, b0, a1, b1, b0]);
        }
    }
}

/// `u32` index of a vertex; `has_room` keeps every vertex below the limit
fn vertex_index(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}

/// Half the turn from `previous` to `current`, in `(-π/2, π/2]`
///
/// A full reversal resolves to `+π/2`.
pub fn miter_half_angle(previous: f64, current: f64) -> f64 {
    let delta = (current - previous).rem_euclid(TAU) / 2.0;
    if delta > FRAC_PI_2 {
        delta - PI
    } else {
        delta
    }
}

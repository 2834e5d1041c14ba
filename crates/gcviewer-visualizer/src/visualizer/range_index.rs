//! Index ranges per trace node
//!
//! Lookup table from layer, path and command ids to the half-open slice
//! of the index buffer they produced. Highlighting recolors these slices
//! instead of rebuilding the mesh.

use crate::gcode::{Trace, TraceNode};
use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeIndex {
    layers: Vec<Range<u32>>,
    paths: Vec<Range<u32>>,
    commands: Vec<Range<u32>>,
}

impl RangeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty ranges for every node of `trace`
    pub fn for_trace(trace: &Trace) -> Self {
        Self {
            layers: vec![0..0; trace.layer_count()],
            paths: vec![0..0; trace.path_count()],
            commands: vec![0..0; trace.command_count()],
        }
    }

    fn slot(&self, node: TraceNode) -> Option<&Range<u32>> {
        match node {
            TraceNode::Layer(id) => self.layers.get(id.0),
            TraceNode::Path(id) => self.paths.get(id.0),
            TraceNode::Command(id) => self.commands.get(id.0),
        }
    }

    fn slot_mut(&mut self, node: TraceNode) -> Option<&mut Range<u32>> {
        match node {
            TraceNode::Layer(id) => self.layers.get_mut(id.0),
            TraceNode::Path(id) => self.paths.get_mut(id.0),
            TraceNode::Command(id) => self.commands.get_mut(id.0),
        }
    }

    /// Record the range of `node`; unknown nodes are ignored
    pub fn set(&mut self, node: TraceNode, range: Range<u32>) {
        if let Some(slot) = self.slot_mut(node) {
            *slot = range;
        }
    }

    /// Grow the range of `node` up to `end`
    pub fn extend_end(&mut self, node: TraceNode, end: u32) {
        if let Some(slot) = self.slot_mut(node) {
            slot.end = slot.end.max(end);
        }
    }

    /// Range of `node`, if it was recorded
    pub fn get(&self, node: TraceNode) -> Option<Range<u32>> {
        self.slot(node).cloned()
    }

    /// `(start, end)` of `node`; `(0, 0)` for a node this index never saw
    pub fn range_for(&self, node: TraceNode) -> (u32, u32) {
        self.slot(node).map(|r| (r.start, r.end)).unwrap_or((0, 0))
    }

    /// Per-layer ranges in layer order
    pub fn layer_ranges(&self) -> &[Range<u32>] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.paths.is_empty() && self.commands.is_empty()
    }
}

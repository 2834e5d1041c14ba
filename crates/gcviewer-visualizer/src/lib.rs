//! # gcviewer Visualizer
//!
//! Extrusion trace parsing and tube mesh generation for gcviewer.
//! Turns G-Code lines into a Layer → Path → Command trace and the trace
//! into vertex and index buffers ready for upload.

pub mod gcode;
pub mod visualizer;

pub use gcode::{
    read_trace_lines, thread_geometry, Command, CommandId, Layer, LayerId, LinearMove, Path,
    PathId, Segment, ThreadGeometry, Trace, TraceModel, TraceNode, TraceParser,
};

pub use visualizer::{
    highlight_batches, miter_half_angle, BedPlane, Bounds, DrawBatch, RangeIndex, RingTable,
    TraceScene, TubeMesh, Vertex,
};

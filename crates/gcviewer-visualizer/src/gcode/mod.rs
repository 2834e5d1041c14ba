//! G-Code trace interpretation
//!
//! This module provides:
//! - The Layer → Path → Command trace hierarchy
//! - Linear move parsing with modal positioning
//! - Deposited bead geometry
//! - The trace model with reload notifications

pub mod extrusion;
pub mod model;
pub mod parser;
pub mod trace;

pub use extrusion::{thread_geometry, ThreadGeometry};
pub use model::{read_trace_lines, TraceModel};
pub use parser::{LinearMove, TraceParser};
pub use trace::{Command, CommandId, Layer, LayerId, Path, PathId, Segment, Trace, TraceNode};

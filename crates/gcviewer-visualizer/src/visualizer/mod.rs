//! Tube mesh visualization
//!
//! This module provides:
//! - Cross-section ring tables per level of detail
//! - Tube mesh generation with mitered joints and end caps
//! - Index ranges per layer, path and command
//! - Highlight draw batches for a selection
//! - Print bounds and bed plane
//! - The scene tying a trace model to its mesh

pub mod highlight;
pub mod range_index;
pub mod ring;
pub mod scene;
pub mod tube_mesh;
pub mod viewport;

pub use highlight::{highlight_batches, DrawBatch};
pub use range_index::RangeIndex;
pub use ring::RingTable;
pub use scene::TraceScene;
pub use tube_mesh::{miter_half_angle, TubeMesh, Vertex};
pub use viewport::{BedPlane, Bounds};

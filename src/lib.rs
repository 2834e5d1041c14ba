//! # gcviewer
//!
//! Extrusion trace viewer core for 3D printer G-Code:
//! - Layer → Path → Command trace built from linear moves
//! - Deposited bead width and height from a simplified flow model
//! - Tube meshes with mitered joints, end caps and level of detail
//! - Index ranges per node for highlighting without a rebuild
//!
//! ## Architecture
//!
//! gcviewer is organized as a workspace with multiple crates:
//!
//! 1. **gcviewer-core** - Error types, constants, settings, listener trait
//! 2. **gcviewer-visualizer** - Trace parser, bead geometry, tube meshes, scene
//! 3. **gcviewer** - Logging setup and the command-line front end

pub use gcviewer_core::{
    constants, Config, Error, FilamentSettings, NoOpTraceListener, Palette, Result,
    SettingsError, TraceListener, TraceListenerHandle, ViewSettings,
};

pub use gcviewer_visualizer::{
    highlight_batches, read_trace_lines, thread_geometry, BedPlane, Bounds, Command, CommandId,
    DrawBatch, Layer, LayerId, LinearMove, Path, PathId, RangeIndex, RingTable, Segment,
    ThreadGeometry, Trace, TraceModel, TraceNode, TraceParser, TraceScene, TubeMesh, Vertex,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging at INFO
///
/// See [`init_logging_with_level`].
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with_level(tracing::Level::INFO)
}

/// Initialize logging with `level` as the default directive
///
/// Sets up structured logging with:
/// - Pretty console output on stderr
/// - RUST_LOG environment variable support
pub fn init_logging_with_level(level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

//! Trace model
//!
//! Owns the current trace and the source lines it was parsed from, and
//! announces every reload to registered [`TraceListener`]s.
//!
//! [`TraceListener`]: gcviewer_core::TraceListener

use super::parser::TraceParser;
use super::trace::Trace;
use gcviewer_core::{FilamentSettings, Result, TraceListenerHandle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Buffer size for reading trace files (256 KB)
const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Current trace plus its reload notifications
#[derive(Default)]
pub struct TraceModel {
    trace: Trace,
    source: Vec<String>,
    filament: FilamentSettings,
    listeners: Vec<TraceListenerHandle>,
}

impl std::fmt::Debug for TraceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceModel")
            .field("layers", &self.trace.layer_count())
            .field("lines", &self.source.len())
            .field("filament", &self.filament)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TraceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for layer count changes
    pub fn add_listener(&mut self, listener: TraceListenerHandle) {
        self.listeners.push(listener);
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Source lines of the current trace
    pub fn source(&self) -> &[String] {
        &self.source
    }

    /// Filament the current trace was parsed with
    pub fn filament(&self) -> FilamentSettings {
        self.filament
    }

    /// Replace the trace with one parsed from `lines`
    ///
    /// Returns false and keeps the current trace when the filament
    /// parameters are unusable.
    pub fn load_trace<I, S>(&mut self, lines: I, filament_diameter: f64, packing_density: f64) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filament = FilamentSettings::new(filament_diameter, packing_density);
        if let Err(e) = filament.validate() {
            warn!("Trace not loaded: {}", e);
            return false;
        }

        self.source = lines.into_iter().map(|l| l.as_ref().to_string()).collect();
        self.reparse(filament);
        true
    }

    /// Read `path` line by line and load it
    pub fn load_file(&mut self, path: &Path, filament: &FilamentSettings) -> Result<bool> {
        let lines = read_trace_lines(path)?;
        debug!("Read {} lines from {}", lines.len(), path.display());
        Ok(self.load_trace(
            lines,
            filament.filament_diameter,
            filament.packing_density,
        ))
    }

    /// Reparse the retained source with a new filament
    pub fn set_filament(&mut self, filament: FilamentSettings) -> bool {
        if let Err(e) = filament.validate() {
            warn!("Filament not applied: {}", e);
            return false;
        }
        self.reparse(filament);
        true
    }

    /// Drop the trace and its source
    pub fn clear(&mut self) {
        self.source.clear();
        self.trace = Trace::new();
        self.notify();
    }

    fn reparse(&mut self, filament: FilamentSettings) {
        self.filament = filament;
        self.trace = TraceParser::from_settings(&filament).parse_lines(&self.source);
        self.notify();
    }

    fn notify(&self) {
        let layer_count = self.trace.layer_count();
        for listener in &self.listeners {
            listener.on_layer_count_changed(layer_count);
        }
    }
}

/// Read every line of a trace file
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// stray Latin-1 comment does not fail the whole file.
pub fn read_trace_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

    let mut lines = Vec::new();
    for raw in reader.split(b'\n') {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        lines.push(String::from_utf8_lossy(&raw).into_owned());
    }
    Ok(lines)
}

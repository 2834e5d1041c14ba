//! Trace scene
//!
//! Ties the trace model to its mesh: every load, filament change or level
//! of detail change rebuilds the mesh in full, then the current selection
//! is reapplied. All rebuilds take `&mut self`, so two can never overlap.

use super::highlight::{highlight_batches, DrawBatch};
use super::ring::RingTable;
use super::tube_mesh::TubeMesh;
use super::viewport::Bounds;
use crate::gcode::{Trace, TraceModel, TraceNode};
use gcviewer_core::{FilamentSettings, Result, TraceListenerHandle, ViewSettings};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug)]
pub struct TraceScene {
    model: TraceModel,
    table: RingTable,
    mesh: TubeMesh,
    bounds: Bounds,
    view: ViewSettings,
    selection: Option<TraceNode>,
    batches: Vec<DrawBatch>,
}

impl Default for TraceScene {
    fn default() -> Self {
        Self::new(ViewSettings::default())
    }
}

impl TraceScene {
    pub fn new(view: ViewSettings) -> Self {
        Self {
            model: TraceModel::new(),
            table: RingTable::new(u32::from(view.lod)),
            mesh: TubeMesh::default(),
            bounds: Bounds::new(),
            view,
            selection: None,
            batches: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: TraceListenerHandle) {
        self.model.add_listener(listener);
    }

    pub fn model(&self) -> &TraceModel {
        &self.model
    }

    pub fn trace(&self) -> &Trace {
        self.model.trace()
    }

    pub fn mesh(&self) -> &TubeMesh {
        &self.mesh
    }

    pub fn ring_table(&self) -> &RingTable {
        &self.table
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn selection(&self) -> Option<TraceNode> {
        self.selection
    }

    /// Draw batches for the current selection
    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// Load a new trace and clear the selection
    pub fn load_trace<I, S>(&mut self, lines: I, filament_diameter: f64, packing_density: f64) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self
            .model
            .load_trace(lines, filament_diameter, packing_density)
        {
            return false;
        }
        self.selection = None;
        self.rebuild();
        true
    }

    /// Read and load a trace file
    pub fn load_file(&mut self, path: &Path, filament: &FilamentSettings) -> Result<bool> {
        if !self.model.load_file(path, filament)? {
            return Ok(false);
        }
        info!(
            "Loaded {} ({} layers)",
            path.display(),
            self.trace().layer_count()
        );
        self.selection = None;
        self.rebuild();
        Ok(true)
    }

    /// Reparse the current source with another filament
    pub fn set_filament(&mut self, filament: FilamentSettings) -> bool {
        if !self.model.set_filament(filament) {
            return false;
        }
        self.rebuild();
        true
    }

    /// Switch level of detail; returns false when nothing changed
    pub fn set_lod(&mut self, lod: u32) -> bool {
        if self.table.lod() == lod {
            return false;
        }
        debug!("Level of detail {} -> {}", self.table.lod(), lod);
        self.table = RingTable::new(lod);
        self.view.lod = u8::try_from(lod).unwrap_or(u8::MAX);
        self.rebuild();
        true
    }

    pub fn set_hide_upper_layers(&mut self, hide: bool) {
        self.view.hide_upper_layers = hide;
        self.refresh_batches();
    }

    /// Select a node, or clear the selection with `None`
    ///
    /// Nodes that are not part of the trace clear the selection.
    pub fn select(&mut self, node: Option<TraceNode>) {
        self.selection = node.filter(|n| self.model.trace().contains(*n));
        self.refresh_batches();
    }

    fn rebuild(&mut self) {
        self.mesh = TubeMesh::build(self.model.trace(), &self.table);
        self.bounds = Bounds::from_trace(self.model.trace());
        // Ids survive a reparse of the same source
        self.select(self.selection);
    }

    fn refresh_batches(&mut self) {
        self.batches = highlight_batches(
            self.model.trace(),
            &self.mesh.ranges,
            self.mesh.index_count() as u32,
            self.selection,
            &self.view.palette,
            self.view.hide_upper_layers,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcode::{CommandId, LayerId};

    const SOURCE: &[&str] = &["G1 X10 E1", "G1 Z0.2", "G1 X0 E1", "G1 X0 Y10 E1"];

    fn loaded_scene() -> TraceScene {
        let mut scene = TraceScene::default();
        assert!(scene.load_trace(SOURCE, 1.75, 1.0));
        scene
    }

    #[test]
    fn test_load_builds_mesh() {
        let scene = loaded_scene();
        assert_eq!(scene.trace().layer_count(), 2);
        assert!(!scene.mesh().is_empty());
        assert!(scene.bounds().is_valid());
        assert_eq!(scene.batches().len(), 1);
    }

    #[test]
    fn test_same_lod_is_noop() {
        let mut scene = loaded_scene();
        let lod = scene.ring_table().lod();
        assert!(!scene.set_lod(lod));
    }

    #[test]
    fn test_lod_change_rebuilds_and_keeps_selection() {
        let mut scene = loaded_scene();
        let node = TraceNode::Command(CommandId(3));
        scene.select(Some(node));
        let before = scene.mesh().index_count();

        assert!(scene.set_lod(8));
        assert_eq!(scene.ring_table().ring_size(), 20);
        assert_eq!(scene.view().lod, 8);
        assert!(scene.mesh().index_count() > before);
        assert_eq!(scene.selection(), Some(node));

        let (_, end) = scene.mesh().range_for(node);
        assert!(scene.batches().iter().any(|b| b.end == end));
    }

    #[test]
    fn test_set_filament_rebuilds() {
        let mut scene = loaded_scene();
        let before = scene.bounds().max_z - scene.bounds().min_z;
        assert!(scene.set_filament(FilamentSettings::new(0.5, 1.0)));
        assert_eq!(scene.model().filament().filament_diameter, 0.5);
        assert_eq!(scene.trace().layer_count(), 2);
        assert_ne!(scene.bounds().max_z - scene.bounds().min_z, before);
        assert!(!scene.set_filament(FilamentSettings::new(-1.0, 1.0)));
    }

    #[test]
    fn test_reload_clears_selection() {
        let mut scene = loaded_scene();
        scene.select(Some(LayerId(1).into()));
        assert!(scene.selection().is_some());

        assert!(scene.load_trace(["G1 X1 E1"], 1.75, 1.0));
        assert_eq!(scene.selection(), None);
    }

    #[test]
    fn test_unknown_selection_is_dropped() {
        let mut scene = loaded_scene();
        scene.select(Some(LayerId(42).into()));
        assert_eq!(scene.selection(), None);
    }

    #[test]
    fn test_hide_upper_layers() {
        let mut scene = loaded_scene();
        scene.select(Some(LayerId(0).into()));
        let shown = scene.batches().len();
        scene.set_hide_upper_layers(true);
        assert_eq!(scene.batches().len(), shown - 1);
    }
}

//! Trace hierarchy: layers, paths and commands
//!
//! A [`Trace`] stores its nodes in three flat arenas, one per kind. Parents
//! refer to their children as contiguous index ranges and children refer
//! back to their parent by id, so the whole hierarchy is plain data that is
//! rebuilt on every load and never mutated afterwards.

use gcviewer_core::constants::{EXTRUSION_EPSILON, NULL_SEGMENT_LENGTH};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Index of a layer in [`Trace::layers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub usize);

/// Index of a path in the trace's path arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(pub usize);

/// Index of a command in the trace's command arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandId(pub usize);

/// Stable identifier of any node in a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TraceNode {
    Layer(LayerId),
    Path(PathId),
    Command(CommandId),
}

impl From<LayerId> for TraceNode {
    fn from(id: LayerId) -> Self {
        TraceNode::Layer(id)
    }
}

impl From<PathId> for TraceNode {
    fn from(id: PathId) -> Self {
        TraceNode::Path(id)
    }
}

impl From<CommandId> for TraceNode {
    fn from(id: CommandId) -> Self {
        TraceNode::Command(id)
    }
}

/// Directed planar segment travelled by one command
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Zero-length segment sitting at `point`
    pub fn point(point: DVec2) -> Self {
        Self::new(point, point)
    }

    /// Vector from start to end
    pub fn delta(&self) -> DVec2 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.delta().length()
    }

    /// True when start and end coincide
    pub fn is_null(&self) -> bool {
        self.length() <= NULL_SEGMENT_LENGTH
    }

    /// Unit direction, or `None` for a null segment
    pub fn direction(&self) -> Option<DVec2> {
        if self.is_null() {
            None
        } else {
            Some(self.delta() / self.length())
        }
    }

    /// Angle of the direction against +X, counter-clockwise, in radians
    pub fn angle(&self) -> f64 {
        let d = self.delta();
        d.y.atan2(d.x)
    }
}

/// One Z plateau of the trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Top of the deposited material in this layer
    pub z: f64,
    /// Child paths, as indices into the path arena
    pub paths: Range<usize>,
}

/// Maximal run of commands sharing one deposition state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub layer: LayerId,
    /// True for a run of travel moves, false for extrusion
    pub travel: bool,
    /// Child commands, as indices into the command arena
    pub commands: Range<usize>,
}

/// One source line with its interpreted motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub path: PathId,
    /// Z height the command was issued at
    pub z: f64,
    /// Raw source text
    pub text: String,
    /// 0-based line number in the source stream
    pub line_number: usize,
    /// Planar motion of the command
    pub thread: Segment,
    /// Deposited bead width; zero for travel
    pub thread_width: f64,
    /// Deposited bead height; zero for travel
    pub thread_height: f64,
}

impl Command {
    /// Whether this command deposits material
    pub fn is_extrusion(&self) -> bool {
        self.thread_width > EXTRUSION_EPSILON
    }
}

/// The complete Layer → Path → Command hierarchy of one load
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trace {
    layers: Vec<Layer>,
    paths: Vec<Path>,
    commands: Vec<Command>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(id.0)
    }

    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0)
    }

    /// Layers in traversal order
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &Layer)> + '_ {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (LayerId(i), layer))
    }

    /// Paths of `layer` in stream order
    pub fn paths_of(&self, layer: LayerId) -> impl Iterator<Item = (PathId, &Path)> + '_ {
        let range = self
            .layers
            .get(layer.0)
            .map(|l| l.paths.clone())
            .unwrap_or(0..0);
        let start = range.start;
        self.paths[range]
            .iter()
            .enumerate()
            .map(move |(i, path)| (PathId(start + i), path))
    }

    /// Commands of `path` in stream order
    pub fn commands_of(&self, path: PathId) -> impl Iterator<Item = (CommandId, &Command)> + '_ {
        let range = self
            .paths
            .get(path.0)
            .map(|p| p.commands.clone())
            .unwrap_or(0..0);
        let start = range.start;
        self.commands[range]
            .iter()
            .enumerate()
            .map(move |(i, command)| (CommandId(start + i), command))
    }

    /// All commands of `layer`, across its paths, in stream order
    pub fn commands_in_layer(
        &self,
        layer: LayerId,
    ) -> impl Iterator<Item = (CommandId, &Command)> + '_ {
        self.paths_of(layer)
            .flat_map(move |(path_id, _)| self.commands_of(path_id))
    }

    /// Every command of the trace in stream order
    pub fn commands(&self) -> impl Iterator<Item = (CommandId, &Command)> + '_ {
        self.commands
            .iter()
            .enumerate()
            .map(|(i, command)| (CommandId(i), command))
    }

    pub fn extrusion_command_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_extrusion()).count()
    }

    /// Whether `node` refers to an existing element
    pub fn contains(&self, node: TraceNode) -> bool {
        match node {
            TraceNode::Layer(id) => id.0 < self.layers.len(),
            TraceNode::Path(id) => id.0 < self.paths.len(),
            TraceNode::Command(id) => id.0 < self.commands.len(),
        }
    }

    /// Parent of `node`; layers have none
    pub fn parent(&self, node: TraceNode) -> Option<TraceNode> {
        match node {
            TraceNode::Layer(_) => None,
            TraceNode::Path(id) => self.path(id).map(|p| TraceNode::Layer(p.layer)),
            TraceNode::Command(id) => self.command(id).map(|c| TraceNode::Path(c.path)),
        }
    }

    /// Direct children of `node`, or the layers when `node` is `None`
    pub fn children(&self, node: Option<TraceNode>) -> Vec<TraceNode> {
        match node {
            None => (0..self.layers.len())
                .map(|i| TraceNode::Layer(LayerId(i)))
                .collect(),
            Some(TraceNode::Layer(id)) => self
                .layer(id)
                .map(|l| l.paths.clone().map(|i| TraceNode::Path(PathId(i))).collect())
                .unwrap_or_default(),
            Some(TraceNode::Path(id)) => self
                .path(id)
                .map(|p| {
                    p.commands
                        .clone()
                        .map(|i| TraceNode::Command(CommandId(i)))
                        .collect()
                })
                .unwrap_or_default(),
            Some(TraceNode::Command(_)) => Vec::new(),
        }
    }

    /// Position of `node` among its siblings
    pub fn child_index(&self, node: TraceNode) -> Option<usize> {
        match node {
            TraceNode::Layer(id) => self.layer(id).map(|_| id.0),
            TraceNode::Path(id) => {
                let path = self.path(id)?;
                let layer = self.layer(path.layer)?;
                Some(id.0 - layer.paths.start)
            }
            TraceNode::Command(id) => {
                let command = self.command(id)?;
                let path = self.path(command.path)?;
                Some(id.0 - path.commands.start)
            }
        }
    }

    /// Layer containing `node` (a layer contains itself)
    pub fn layer_of(&self, node: TraceNode) -> Option<LayerId> {
        match node {
            TraceNode::Layer(id) => self.layer(id).map(|_| id),
            TraceNode::Path(id) => self.path(id).map(|p| p.layer),
            TraceNode::Command(id) => {
                let command = self.command(id)?;
                self.path(command.path).map(|p| p.layer)
            }
        }
    }

    /// Command referenced by `node`, if it is one
    pub fn command_of(&self, node: TraceNode) -> Option<CommandId> {
        match node {
            TraceNode::Command(id) if self.command(id).is_some() => Some(id),
            _ => None,
        }
    }

    /// Short label for list and tree views
    pub fn display_text(&self, node: TraceNode) -> Option<String> {
        match node {
            TraceNode::Layer(id) => self.layer(id).map(|l| format!("Layer: {}", l.z)),
            TraceNode::Path(id) => self.path(id).map(|p| path_label(p.travel).to_string()),
            TraceNode::Command(id) => self.command(id).map(|c| c.text.clone()),
        }
    }

    /// Longer description shown on hover
    pub fn tool_tip(&self, node: TraceNode) -> Option<String> {
        match node {
            TraceNode::Command(id) => self.command(id).map(|c| {
                format!(
                    "Segment length: {:.2}\nSegment width: {:.2}",
                    c.thread.length(),
                    c.thread_width
                )
            }),
            _ => self.display_text(node),
        }
    }
}

fn path_label(travel: bool) -> &'static str {
    if travel {
        "Travel path:"
    } else {
        "Extrusion path:"
    }
}

#[derive(Debug)]
struct OpenLayer {
    z: f64,
    first_path: usize,
}

#[derive(Debug)]
struct OpenPath {
    travel: bool,
    first_command: usize,
}

/// Append-only builder used by the parser
///
/// Empty paths and layers are dropped when closed, so every stored node
/// has at least one child.
#[derive(Debug, Default)]
pub(crate) struct TraceBuilder {
    trace: Trace,
    layer: Option<OpenLayer>,
    path: Option<OpenPath>,
}

impl TraceBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Close the current layer and start a new one at `z` with a travel path
    pub(crate) fn open_layer(&mut self, z: f64) {
        self.close_layer();
        self.layer = Some(OpenLayer {
            z,
            first_path: self.trace.paths.len(),
        });
        self.open_path(true);
    }

    /// Close the current path and start a new one
    pub(crate) fn open_path(&mut self, travel: bool) {
        self.close_path();
        self.path = Some(OpenPath {
            travel,
            first_command: self.trace.commands.len(),
        });
    }

    /// Deposition flag of the open path
    pub(crate) fn path_is_travel(&self) -> Option<bool> {
        self.path.as_ref().map(|p| p.travel)
    }

    /// Append `command` to the open path, opening one if needed
    pub(crate) fn push_command(&mut self, mut command: Command) {
        if self.layer.is_none() {
            self.open_layer(command.z);
        }
        if self.path.is_none() {
            self.open_path(!command.is_extrusion());
        }
        // The open path is stored at the next free slot once it closes
        command.path = PathId(self.trace.paths.len());
        self.trace.commands.push(command);
    }

    pub(crate) fn close_path(&mut self) {
        if let Some(open) = self.path.take() {
            let end = self.trace.commands.len();
            if end > open.first_command {
                self.trace.paths.push(Path {
                    layer: LayerId(self.trace.layers.len()),
                    travel: open.travel,
                    commands: open.first_command..end,
                });
            }
        }
    }

    pub(crate) fn close_layer(&mut self) {
        self.close_path();
        if let Some(open) = self.layer.take() {
            let end = self.trace.paths.len();
            if end > open.first_path {
                self.trace.layers.push(Layer {
                    z: open.z,
                    paths: open.first_path..end,
                });
            }
        }
    }

    pub(crate) fn finish(mut self) -> Trace {
        self.close_layer();
        self.trace
    }
}

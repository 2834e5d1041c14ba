//! G-Code trace parser
//!
//! Turns a line stream into a [`Trace`]. Only linear moves (`G1`) are
//! interpreted; every other line is kept as an opaque travel command so
//! the trace mirrors the source line for line.

use super::extrusion::thread_geometry;
use super::trace::{Command, PathId, Segment, Trace, TraceBuilder};
use gcviewer_core::constants::EXTRUSION_EPSILON;
use gcviewer_core::settings::cross_section_area;
use gcviewer_core::FilamentSettings;
use glam::DVec2;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Parameters of one linear move; `None` keeps the modal value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearMove {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub e: Option<f64>,
}

impl LinearMove {
    /// Parse `line` as a `G1` move
    ///
    /// Returns `None` when the first token is not a move type equal to 1.
    /// Comments are stripped first and letters are matched without regard
    /// to case. A parameter whose value does not parse is left unset.
    pub fn parse(line: &str) -> Option<Self> {
        let cleaned = remove_comments(line).to_ascii_uppercase();
        let mut tokens = cleaned.split_whitespace();

        let code = tokens.next()?.strip_prefix('G')?;
        if code.parse::<u32>().ok()? != 1 {
            return None;
        }

        let mut params = Self::default();
        for token in tokens {
            let Some(letter) = token.chars().next() else {
                continue;
            };
            let slot = match letter {
                'X' => &mut params.x,
                'Y' => &mut params.y,
                'Z' => &mut params.z,
                'E' => &mut params.e,
                _ => continue,
            };
            if slot.is_none() {
                *slot = token[1..].parse::<f64>().ok().filter(|v| v.is_finite());
            }
        }
        Some(params)
    }
}

fn remove_comments(line: &str) -> std::borrow::Cow<'_, str> {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = COMMENT_REGEX.get_or_init(|| Regex::new(r"[;(].*").expect("invalid regex pattern"));
    regex.replace(line, "")
}

/// Parser turning G-Code lines into a trace
///
/// The filament cross-section is fixed for the parser's lifetime; a new
/// filament needs a new parser and a full reparse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceParser {
    filament_area: f64,
    initial_z_rise: f64,
}

impl Default for TraceParser {
    fn default() -> Self {
        Self::from_settings(&FilamentSettings::default())
    }
}

impl TraceParser {
    /// Create a parser for a filament of `filament_diameter` mm
    pub fn new(filament_diameter: f64, packing_density: f64) -> Self {
        Self {
            filament_area: cross_section_area(filament_diameter, packing_density),
            initial_z_rise: 0.0,
        }
    }

    pub fn from_settings(filament: &FilamentSettings) -> Self {
        Self::new(filament.filament_diameter, filament.packing_density)
    }

    /// Layer height assumed before the first Z change
    ///
    /// Without it, beads laid before any Z move are circular.
    pub fn with_initial_z_rise(mut self, z_rise: f64) -> Self {
        self.initial_z_rise = z_rise;
        self
    }

    /// Effective filament cross-section in mm²
    pub fn filament_area(&self) -> f64 {
        self.filament_area
    }

    /// Parse every line of `text`
    pub fn parse_str(&self, text: &str) -> Trace {
        self.parse_lines(text.lines())
    }

    /// Parse a line stream into a fresh trace
    ///
    /// Never fails: malformed lines become opaque travel commands.
    pub fn parse_lines<I, S>(&self, lines: I) -> Trace
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = ParseState::new(self.filament_area, self.initial_z_rise);
        for (line_number, line) in lines.into_iter().enumerate() {
            state.process_line(line_number, line.as_ref());
        }
        let trace = state.builder.finish();

        debug!(
            layers = trace.layer_count(),
            paths = trace.path_count(),
            commands = trace.command_count(),
            "Parsed trace"
        );
        trace
    }
}

struct ParseState {
    filament_area: f64,
    position: DVec2,
    z: f64,
    z_rise: f64,
    builder: TraceBuilder,
}

impl ParseState {
    fn new(filament_area: f64, z_rise: f64) -> Self {
        let mut builder = TraceBuilder::new();
        builder.open_layer(0.0);
        Self {
            filament_area,
            position: DVec2::ZERO,
            z: 0.0,
            z_rise,
            builder,
        }
    }

    fn process_line(&mut self, line_number: usize, line: &str) {
        let text = line.trim_end().to_string();

        let Some(params) = LinearMove::parse(line) else {
            self.push(line_number, text, Segment::point(self.position), 0.0, 0.0);
            return;
        };

        let target = DVec2::new(
            params.x.unwrap_or(self.position.x),
            params.y.unwrap_or(self.position.y),
        );
        let z = params.z.unwrap_or(self.z);

        if z != self.z {
            let previous = self.z;
            self.z_rise = z - previous;
            self.z = z;
            trace!(line = line_number, z, z_rise = self.z_rise, "Layer change");

            self.builder.open_layer(z);
            self.push_at(
                previous,
                line_number,
                text,
                Segment::point(self.position),
                0.0,
                0.0,
            );
            self.position = target;
            return;
        }

        let geometry = thread_geometry(
            self.position,
            target,
            params.e.unwrap_or(0.0),
            self.z_rise,
            self.filament_area,
        );
        self.push(
            line_number,
            text,
            geometry.segment,
            geometry.width,
            geometry.height,
        );
        self.position = target;
    }

    fn push(&mut self, line_number: usize, text: String, thread: Segment, width: f64, height: f64) {
        self.push_at(self.z, line_number, text, thread, width, height);
    }

    fn push_at(
        &mut self,
        z: f64,
        line_number: usize,
        text: String,
        thread: Segment,
        width: f64,
        height: f64,
    ) {
        let travel = width <= EXTRUSION_EPSILON;
        let (thread_width, thread_height) = if travel { (0.0, 0.0) } else { (width, height) };

        if self.builder.path_is_travel() != Some(travel) {
            self.builder.open_path(travel);
        }
        self.builder.push_command(Command {
            path: PathId(0),
            z,
            text,
            line_number,
            thread,
            thread_width,
            thread_height,
        });
    }
}

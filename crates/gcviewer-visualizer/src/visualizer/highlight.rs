//! Highlight draw batches
//!
//! A selection splits the index buffer into consecutive slices, each drawn
//! in one color: layers below the selection, the selected layer up to the
//! selected command, the command itself, the rest of the layer and the
//! layers above.

use super::range_index::RangeIndex;
use crate::gcode::{Trace, TraceNode};
use gcviewer_core::Palette;

/// Draw `[previous end, end)` of the index buffer in `color`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawBatch {
    pub end: u32,
    pub color: [f32; 4],
}

/// Split `[0, index_count)` into colored batches around `selection`
///
/// Without a selection the whole buffer is one batch. Empty batches are
/// skipped. With `hide_upper_layers` nothing above the selected layer is
/// drawn.
pub fn highlight_batches(
    trace: &Trace,
    ranges: &RangeIndex,
    index_count: u32,
    selection: Option<TraceNode>,
    palette: &Palette,
    hide_upper_layers: bool,
) -> Vec<DrawBatch> {
    let layer = selection.and_then(|node| trace.layer_of(node));
    let (Some(node), Some(layer)) = (selection, layer) else {
        return single_batch(index_count, palette.lower_layers);
    };

    let (layer_start, layer_end) = ranges.range_for(layer.into());
    let layer_end = layer_end.min(index_count);
    let layer_start = layer_start.min(layer_end);

    // A selected layer highlights no command
    let (command_start, command_end) = match node {
        TraceNode::Layer(_) => (layer_start, layer_start),
        _ => ranges.range_for(node),
    };
    let command_start = command_start.clamp(layer_start, layer_end);
    let command_end = command_end.clamp(command_start, layer_end);

    let mut batches = Vec::with_capacity(5);
    let mut drawn = 0;
    let mut push = |end: u32, color: [f32; 4]| {
        if end > drawn {
            batches.push(DrawBatch { end, color });
            drawn = end;
        }
    };

    push(layer_start, palette.lower_layers);
    push(command_start, palette.selected_layer);
    push(command_end, palette.selected_command);
    push(layer_end, palette.selected_layer);
    if !hide_upper_layers {
        push(index_count, palette.upper_layers);
    }
    batches
}

fn single_batch(index_count: u32, color: [f32; 4]) -> Vec<DrawBatch> {
    if index_count == 0 {
        Vec::new()
    } else {
        vec![DrawBatch {
            end: index_count,
            color,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcode::{CommandId, LayerId, TraceParser};
    use crate::visualizer::{RingTable, TubeMesh};

    fn three_layers() -> (Trace, TubeMesh) {
        let trace = TraceParser::default().with_initial_z_rise(0.2).parse_str(
            "G1 X10 E1\nG1 Z0.4\nG1 X0 E1\nG1 X10 Y5 E1\nG1 Z0.6\nG1 X0 E1\n",
        );
        let mesh = TubeMesh::build(&trace, &RingTable::new(1));
        (trace, mesh)
    }

    fn ends(batches: &[DrawBatch]) -> Vec<u32> {
        batches.iter().map(|b| b.end).collect()
    }

    #[test]
    fn test_no_selection() {
        let (trace, mesh) = three_layers();
        let palette = Palette::default();
        let count = mesh.index_count() as u32;

        let batches = highlight_batches(&trace, &mesh.ranges, count, None, &palette, true);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].end, count);

        assert!(highlight_batches(&trace, &RangeIndex::new(), 0, None, &palette, false).is_empty());
    }

    #[test]
    fn test_command_selection() {
        let (trace, mesh) = three_layers();
        let palette = Palette::default();
        let count = mesh.index_count() as u32;

        // First extrusion of the middle layer
        let node = TraceNode::Command(CommandId(2));
        let (layer_start, layer_end) = mesh.range_for(LayerId(1).into());
        let (cmd_start, cmd_end) = mesh.range_for(node);
        assert_eq!(cmd_start, layer_start);

        let batches = highlight_batches(&trace, &mesh.ranges, count, Some(node), &palette, false);
        // The empty slice before the command is skipped
        assert_eq!(ends(&batches), vec![layer_start, cmd_end, layer_end, count]);
        assert_eq!(batches[0].color, palette.lower_layers);
        assert_eq!(batches[1].color, palette.selected_command);
        assert_eq!(batches[2].color, palette.selected_layer);
        assert_eq!(batches[3].color, palette.upper_layers);
    }

    #[test]
    fn test_hide_upper_layers() {
        let (trace, mesh) = three_layers();
        let palette = Palette::default();
        let count = mesh.index_count() as u32;

        let node = TraceNode::Layer(LayerId(1));
        let (layer_start, layer_end) = mesh.range_for(node);
        let batches = highlight_batches(&trace, &mesh.ranges, count, Some(node), &palette, true);

        assert_eq!(ends(&batches), vec![layer_start, layer_end]);
        assert_eq!(batches[1].color, palette.selected_layer);
    }

    #[test]
    fn test_travel_selection_highlights_layer_only() {
        let (trace, mesh) = three_layers();
        let palette = Palette::default();
        let count = mesh.index_count() as u32;

        // Layer transition line of the top layer
        let node = TraceNode::Command(CommandId(4));
        let batches = highlight_batches(&trace, &mesh.ranges, count, Some(node), &palette, false);
        assert!(batches.iter().all(|b| b.color != palette.selected_command));
        assert_eq!(batches.last().map(|b| b.end), Some(count));
    }

    #[test]
    fn test_batches_are_increasing() {
        let (trace, mesh) = three_layers();
        let palette = Palette::default();
        let count = mesh.index_count() as u32;

        for (id, _) in trace.commands() {
            let batches =
                highlight_batches(&trace, &mesh.ranges, count, Some(id.into()), &palette, false);
            assert!(batches.windows(2).all(|w| w[0].end < w[1].end));
            assert_eq!(batches.last().map(|b| b.end), Some(count));
        }
    }
}

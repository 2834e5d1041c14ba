//! Property-based tests for bead geometry and tube mesh sizes

use proptest::prelude::*;

use gcviewer_core::settings::cross_section_area;
use gcviewer_visualizer::{thread_geometry, RingTable, TraceParser, TubeMesh};
use glam::DVec2;
use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_filament_area() -> impl Strategy<Value = f64> {
    (0.5f64..3.0, 0.5f64..=1.0).prop_map(|(d, density)| cross_section_area(d, density))
}

fn arb_point() -> impl Strategy<Value = (f64, f64)> {
    (-200.0f64..200.0, -200.0f64..200.0)
}

/// Displacement long enough to never be a null segment
fn arb_step() -> impl Strategy<Value = (f64, f64)> {
    (0.5f64..20.0, -PI..PI).prop_map(|(len, angle)| (len * angle.cos(), len * angle.sin()))
}

fn path_source(steps: &[(f64, f64)]) -> String {
    let mut position = DVec2::ZERO;
    let mut source = String::new();
    for &(dx, dy) in steps {
        position += DVec2::new(dx, dy);
        source.push_str(&format!("G1 X{} Y{} E1\n", position.x, position.y));
    }
    source
}

// ---------------------------------------------------------------------------
// Bead geometry
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn extrusion_is_at_least_as_wide_as_high(
        area in arb_filament_area(),
        (bx, by) in arb_point(),
        (dx, dy) in arb_step(),
        feed in 0.001f64..10.0,
        z_rise in 0.05f64..1.0,
    ) {
        let begin = DVec2::new(bx, by);
        let g = thread_geometry(begin, begin + DVec2::new(dx, dy), feed, z_rise, area);
        prop_assert!(g.height > 0.0);
        prop_assert!(g.width >= g.height, "width {} < height {}", g.width, g.height);
    }

    #[test]
    fn zero_feed_or_null_segment_is_travel(
        area in arb_filament_area(),
        (bx, by) in arb_point(),
        (dx, dy) in arb_step(),
        feed in 0.001f64..10.0,
        z_rise in 0.05f64..1.0,
    ) {
        let begin = DVec2::new(bx, by);
        let end = begin + DVec2::new(dx, dy);

        let no_feed = thread_geometry(begin, end, 0.0, z_rise, area);
        prop_assert_eq!((no_feed.width, no_feed.height), (0.0, 0.0));

        let null = thread_geometry(begin, begin, feed, z_rise, area);
        prop_assert_eq!((null.width, null.height), (0.0, 0.0));
    }

    #[test]
    fn bridging_uses_circular_section(
        area in arb_filament_area(),
        (dx, dy) in arb_step(),
        feed in 0.001f64..10.0,
        z_rise in 0.05f64..1.0,
    ) {
        let end = DVec2::new(dx, dy);
        let g = thread_geometry(DVec2::ZERO, end, feed, z_rise, area);

        let thread_area = area * feed / end.length();
        let flat_width = thread_area / z_rise - PI * z_rise / 4.0 + z_rise;
        if flat_width < z_rise {
            let diameter = (thread_area / PI).sqrt();
            prop_assert_eq!(g.width, diameter);
            prop_assert_eq!(g.height, diameter);
        } else {
            prop_assert_eq!(g.height, z_rise);
        }
    }

    #[test]
    fn geometry_is_deterministic(
        area in arb_filament_area(),
        (dx, dy) in arb_step(),
        feed in 0.0f64..10.0,
        z_rise in -1.0f64..1.0,
    ) {
        let end = DVec2::new(dx, dy);
        prop_assert_eq!(
            thread_geometry(DVec2::ZERO, end, feed, z_rise, area),
            thread_geometry(DVec2::ZERO, end, feed, z_rise, area)
        );
    }
}

// ---------------------------------------------------------------------------
// Mesh sizes
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn ring_has_two_points_per_flank_sample(lod in 0u32..64) {
        prop_assert_eq!(RingTable::new(lod).ring_size(), 2 * (lod as usize + 2));
    }

    #[test]
    fn tube_size_follows_segment_count(
        lod in 0u32..16,
        steps in prop::collection::vec(arb_step(), 1..12),
    ) {
        let trace = TraceParser::new(1.75, 1.0)
            .with_initial_z_rise(0.2)
            .parse_str(&path_source(&steps));
        prop_assert_eq!(trace.path_count(), 1);

        let table = RingTable::new(lod);
        let n = table.ring_size();
        let k = steps.len();
        let mesh = TubeMesh::build(&trace, &table);

        // Two caps of n triangles, 2n hull triangles per segment and per joint
        prop_assert_eq!(mesh.indices.len(), 12 * n * k);
        prop_assert_eq!(mesh.vertices.len(), 4 * n * k + 2);
        prop_assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn rebuild_is_byte_identical(
        lod in 0u32..8,
        steps in prop::collection::vec(arb_step(), 1..8),
    ) {
        let parser = TraceParser::new(1.75, 0.95).with_initial_z_rise(0.2);
        let trace = parser.parse_str(&path_source(&steps));
        let table = RingTable::new(lod);

        let a = TubeMesh::build(&trace, &table);
        let b = TubeMesh::build(&trace, &table);
        prop_assert_eq!(a.vertex_bytes(), b.vertex_bytes());
        prop_assert_eq!(a.index_bytes(), b.index_bytes());
    }
}

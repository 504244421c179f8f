//! Concentric-ring placement.
//!
//! Level L sits on a ring whose base radius is the running sum of the
//! maximum node extent plus the level padding over every level below L. The
//! ring is widened beyond its base radius whenever the chord between
//! adjacent nodes would be shorter than the nodes themselves — sibling
//! overlap is structurally impossible, not merely discouraged.

use std::f32::consts::{PI, TAU};

use trellis_core::geometry::{Point, Size};

use super::{Engine, levels::Levels};

/// Positions for every node, indexed by insertion order.
pub(super) fn positions(engine: &Engine, levels: &Levels, sizes: &[Size]) -> Vec<Point> {
    let mut positions = vec![engine.origin; sizes.len()];
    let mut base_radius = 0.0f32;

    for group in &levels.groups {
        let radius = ring_radius(base_radius, group, sizes);

        let count = group.len();
        for (index, &node_idx) in group.iter().enumerate() {
            let angle = TAU * index as f32 / count as f32;
            positions[node_idx] = Point::new(
                engine.origin.x() + radius * angle.cos(),
                engine.origin.y() + radius * angle.sin(),
            );
        }

        let ring_extent = group
            .iter()
            .map(|&idx| sizes[idx].max_extent())
            .fold(0.0f32, f32::max);
        base_radius = radius + ring_extent + engine.level_padding;
    }

    positions
}

/// The ring radius: the base running-sum radius, raised until every pair of
/// adjacent nodes fits along its chord.
fn ring_radius(base: f32, group: &[usize], sizes: &[Size]) -> f32 {
    let count = group.len();
    if count <= 1 {
        return base;
    }

    let mut needed_chord = 0.0f32;
    for k in 0..count {
        let a = sizes[group[k]].max_extent();
        let b = sizes[group[(k + 1) % count]].max_extent();
        needed_chord = needed_chord.max((a + b) / 2.0);
    }

    // Adjacent nodes are separated by 2·r·sin(π/n); distance only grows with
    // angular separation, so satisfying adjacent pairs satisfies all pairs.
    let min_radius = needed_chord / (2.0 * (PI / count as f32).sin());
    base.max(min_radius)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_ring_radius_single_node_keeps_base() {
        let sizes = [Size::new(50.0, 20.0)];
        assert_approx_eq!(f32, ring_radius(70.0, &[0], &sizes), 70.0);
    }

    #[test]
    fn test_ring_radius_grows_for_wide_pairs() {
        let sizes = [Size::new(100.0, 20.0), Size::new(100.0, 20.0)];
        // Chord for n=2 is the diameter: 2r ≥ 100 → r ≥ 50.
        assert_approx_eq!(f32, ring_radius(0.0, &[0, 1], &sizes), 50.0);
    }

    #[test]
    fn test_ring_radius_respects_larger_base() {
        let sizes = [Size::new(10.0, 10.0), Size::new(10.0, 10.0)];
        assert_approx_eq!(f32, ring_radius(200.0, &[0, 1], &sizes), 200.0);
    }
}

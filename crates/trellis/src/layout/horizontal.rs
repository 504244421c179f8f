//! Left-to-right column placement.
//!
//! Level L's column starts at the running sum of maximum column widths plus
//! the horizontal spacing over every level below L. Vertically, each node
//! reserves its subtree's full extent — its own height, or the stacked
//! extents of its children, whichever is larger — and children are recentred
//! on their parent. Sibling subtrees occupy disjoint vertical bands, so
//! same-level overlap cannot occur.

use trellis_core::geometry::{Point, Size};

use super::{Engine, levels::Levels};

/// Positions for every node, indexed by insertion order.
pub(super) fn positions(engine: &Engine, levels: &Levels, sizes: &[Size]) -> Vec<Point> {
    let column_lefts = column_lefts(engine, levels, sizes);

    let mut extents = vec![0.0f32; sizes.len()];
    for &root in &levels.roots {
        compute_extent(root, levels, sizes, engine.vertical_spacing, &mut extents);
    }

    let mut positions = vec![engine.origin; sizes.len()];
    let mut top = engine.origin.y();
    for &root in &levels.roots {
        place(
            root,
            top,
            engine,
            levels,
            sizes,
            &extents,
            &column_lefts,
            &mut positions,
        );
        top += extents[root] + engine.vertical_spacing;
    }

    positions
}

/// Left edge of each level's column.
fn column_lefts(engine: &Engine, levels: &Levels, sizes: &[Size]) -> Vec<f32> {
    let mut lefts = Vec::with_capacity(levels.groups.len());
    let mut x = engine.origin.x();
    for group in &levels.groups {
        lefts.push(x);
        let width = group
            .iter()
            .map(|&idx| sizes[idx].width())
            .fold(0.0f32, f32::max);
        x += width + engine.horizontal_spacing;
    }
    lefts
}

/// Post-order subtree extent: own height, or stacked child extents.
fn compute_extent(
    idx: usize,
    levels: &Levels,
    sizes: &[Size],
    spacing: f32,
    extents: &mut Vec<f32>,
) -> f32 {
    let mut stacked = 0.0f32;
    for (k, &child) in levels.children[idx].iter().enumerate() {
        if k > 0 {
            stacked += spacing;
        }
        stacked += compute_extent(child, levels, sizes, spacing, extents);
    }

    let extent = sizes[idx].height().max(stacked);
    extents[idx] = extent;
    extent
}

/// Places a subtree inside the vertical band starting at `top`.
#[allow(clippy::too_many_arguments)]
fn place(
    idx: usize,
    top: f32,
    engine: &Engine,
    levels: &Levels,
    sizes: &[Size],
    extents: &[f32],
    column_lefts: &[f32],
    positions: &mut [Point],
) {
    let extent = extents[idx];
    let level = levels.of[idx];
    positions[idx] = Point::new(
        column_lefts[level] + sizes[idx].half_width(),
        top + extent / 2.0,
    );

    let children = &levels.children[idx];
    if children.is_empty() {
        return;
    }

    let stacked: f32 = children.iter().map(|&child| extents[child]).sum::<f32>()
        + engine.vertical_spacing * (children.len() - 1) as f32;

    // Children recentred relative to the parent's band.
    let mut child_top = top + (extent - stacked) / 2.0;
    for &child in children {
        place(
            child, child_top, engine, levels, sizes, extents, column_lefts, positions,
        );
        child_top += extents[child] + engine.vertical_spacing;
    }
}

//! Position assignment for document nodes.
//!
//! The engine assigns a center position to every node from the hierarchy
//! alone: breadth-first levels are computed from the edge graph
//! ([`levels`]), then one of two packing strategies places each level —
//! concentric rings ([`radial`]) or left-to-right columns ([`horizontal`]).
//!
//! Zero overlap between same-level siblings is a hard invariant of both
//! strategies, not a best-effort goal: ring radii grow until adjacent
//! chords fit, and column stacking reserves each subtree's full vertical
//! extent.
//!
//! Layout is a pure function of (nodes, edges, mode, configuration). It
//! reads the measured size the rendering collaborator reported for each
//! node and never measures anything itself.

mod horizontal;
mod levels;
mod radial;

use thiserror::Error;

use trellis_core::{
    Document, LayoutMode, Node,
    geometry::{Point, Size},
    identifier::Id,
};

use crate::config::LayoutConfig;

/// Layout failures. Positions are left unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A node has not been measured by the renderer yet.
    #[error("node {node} has no measured size")]
    MissingMeasuredSize { node: Id },

    /// The edge set is not a forest.
    #[error("hierarchy edges form a cycle")]
    CircularDependency,
}

/// The layout engine, configured builder-style.
///
/// # Examples
///
/// ```
/// use trellis::{Engine, LayoutMode};
/// use trellis_core::geometry::Point;
///
/// let engine = Engine::default()
///     .with_origin(Point::new(400.0, 300.0))
///     .with_level_padding(40.0);
/// # let document = trellis_core::Document::default();
/// let positioned = engine.layout(&document, LayoutMode::Radial).unwrap();
/// assert!(positioned.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    origin: Point,
    level_padding: f32,
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl Engine {
    /// Creates an engine from a configuration section.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            origin: config.origin(),
            level_padding: config.level_padding(),
            horizontal_spacing: config.horizontal_spacing(),
            vertical_spacing: config.vertical_spacing(),
        }
    }

    /// Sets the layout origin: the radial center, or the horizontal
    /// top-left anchor.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the extra ring spacing per level (radial mode).
    pub fn with_level_padding(mut self, padding: f32) -> Self {
        self.level_padding = padding;
        self
    }

    /// Sets the column gap between levels (horizontal mode).
    pub fn with_horizontal_spacing(mut self, spacing: f32) -> Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Sets the vertical gap between stacked siblings (horizontal mode).
    pub fn with_vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Positions every node of the document.
    ///
    /// Returns a new node list with updated positions; the input document is
    /// untouched. Two calls with the same inputs yield identical positions.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::MissingMeasuredSize`] when any node lacks a measured
    ///   bounding box.
    /// - [`LayoutError::CircularDependency`] when the edge set is cyclic.
    pub fn layout(&self, document: &Document, mode: LayoutMode) -> Result<Vec<Node>, LayoutError> {
        let sizes = measured_sizes(document)?;
        let levels = levels::assign(document)?;

        let positions = match mode {
            LayoutMode::Radial => radial::positions(self, &levels, &sizes),
            LayoutMode::Horizontal => horizontal::positions(self, &levels, &sizes),
        };

        Ok(document
            .nodes()
            .iter()
            .zip(positions)
            .map(|(node, position)| node.clone().with_position(position))
            .collect())
    }
}

/// Positions a document with the default engine configuration.
///
/// # Errors
///
/// See [`Engine::layout`].
pub fn layout(document: &Document, mode: LayoutMode) -> Result<Vec<Node>, LayoutError> {
    Engine::default().layout(document, mode)
}

/// Collects every node's measured size, in insertion order.
fn measured_sizes(document: &Document) -> Result<Vec<Size>, LayoutError> {
    document
        .nodes()
        .iter()
        .map(|node| {
            node.measured_size()
                .ok_or(LayoutError::MissingMeasuredSize { node: node.id() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use trellis_core::{Edge, identifier::Id};

    use super::*;

    /// Builds a measured document: (name, size, parent) triples.
    fn measured_doc(spec: &[(&str, f32, f32, Option<&str>)]) -> Document {
        let mut doc = Document::new(LayoutMode::Radial);
        for (name, width, height, _) in spec {
            let node = Node::text(Id::new(name), *name, 1, "")
                .unwrap()
                .with_measured_size(Size::new(*width, *height));
            doc.push_node(node);
        }
        for (name, _, _, parent) in spec {
            if let Some(parent) = parent {
                let edge_id = Id::new(&format!("e-{parent}-{name}"));
                doc.push_edge(Edge::link(edge_id, Id::new(parent), Id::new(name)).unwrap());
            }
        }
        doc
    }

    fn position_of<'a>(nodes: &'a [Node], name: &str) -> Point {
        nodes
            .iter()
            .find(|n| n.id() == Id::new(name))
            .expect("node exists")
            .position()
    }

    #[test]
    fn test_missing_measured_size_is_an_error() {
        let mut doc = Document::new(LayoutMode::Radial);
        doc.push_node(Node::text(Id::new("a"), "a", 1, "").unwrap());

        let err = layout(&doc, LayoutMode::Radial).unwrap_err();
        assert_eq!(err, LayoutError::MissingMeasuredSize { node: Id::new("a") });
    }

    #[test]
    fn test_cycle_is_an_error() {
        let mut doc = measured_doc(&[("a", 10.0, 10.0, None), ("b", 10.0, 10.0, Some("a"))]);
        doc.push_edge(Edge::link(Id::new("back"), Id::new("b"), Id::new("a")).unwrap());

        let err = layout(&doc, LayoutMode::Radial).unwrap_err();
        assert_eq!(err, LayoutError::CircularDependency);
    }

    #[test]
    fn test_single_root_sits_at_radial_origin() {
        let doc = measured_doc(&[("root", 80.0, 30.0, None)]);
        let engine = Engine::default().with_origin(Point::new(100.0, 200.0));

        let nodes = engine.layout(&doc, LayoutMode::Radial).unwrap();
        let p = position_of(&nodes, "root");
        assert_approx_eq!(f32, p.x(), 100.0);
        assert_approx_eq!(f32, p.y(), 200.0);
    }

    #[test]
    fn test_radial_children_share_a_ring() {
        let doc = measured_doc(&[
            ("root", 80.0, 30.0, None),
            ("a", 60.0, 30.0, Some("root")),
            ("b", 60.0, 30.0, Some("root")),
            ("c", 60.0, 30.0, Some("root")),
        ]);
        let nodes = layout(&doc, LayoutMode::Radial).unwrap();

        let origin = position_of(&nodes, "root");
        let radii: Vec<f32> = ["a", "b", "c"]
            .iter()
            .map(|name| origin.distance(position_of(&nodes, name)))
            .collect();
        assert_approx_eq!(f32, radii[0], radii[1], epsilon = 0.01);
        assert_approx_eq!(f32, radii[1], radii[2], epsilon = 0.01);
        assert!(radii[0] > 0.0);
    }

    #[test]
    fn test_radial_siblings_do_not_overlap() {
        // Many wide siblings force the chord constraint to grow the ring.
        let mut spec = vec![("root", 40.0, 40.0, None)];
        let names: Vec<String> = (0..12).map(|i| format!("child-{i}")).collect();
        for name in &names {
            spec.push((name.as_str(), 120.0, 40.0, Some("root")));
        }
        let doc = measured_doc(&spec);

        let nodes = layout(&doc, LayoutMode::Radial).unwrap();
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let a = position_of(&nodes, &names[i]);
                let b = position_of(&nodes, &names[j]);
                let min_distance = (120.0 + 120.0) / 2.0;
                assert!(
                    a.distance(b) + 0.01 >= min_distance,
                    "siblings {i} and {j} overlap: {} < {min_distance}",
                    a.distance(b)
                );
            }
        }
    }

    #[test]
    fn test_multiple_radial_roots_are_spread_apart() {
        let doc = measured_doc(&[
            ("r1", 100.0, 40.0, None),
            ("r2", 100.0, 40.0, None),
        ]);
        let nodes = layout(&doc, LayoutMode::Radial).unwrap();

        let a = position_of(&nodes, "r1");
        let b = position_of(&nodes, "r2");
        assert!(a.distance(b) + 0.01 >= 100.0, "roots must not overlap");
    }

    #[test]
    fn test_horizontal_levels_advance_rightward() {
        let doc = measured_doc(&[
            ("root", 80.0, 30.0, None),
            ("mid", 60.0, 30.0, Some("root")),
            ("leaf", 40.0, 30.0, Some("mid")),
        ]);
        let nodes = layout(&doc, LayoutMode::Horizontal).unwrap();

        let x0 = position_of(&nodes, "root").x();
        let x1 = position_of(&nodes, "mid").x();
        let x2 = position_of(&nodes, "leaf").x();
        assert!(x0 < x1 && x1 < x2);
    }

    #[test]
    fn test_horizontal_children_recentred_on_parent() {
        let doc = measured_doc(&[
            ("root", 80.0, 30.0, None),
            ("a", 60.0, 30.0, Some("root")),
            ("b", 60.0, 30.0, Some("root")),
        ]);
        let nodes = layout(&doc, LayoutMode::Horizontal).unwrap();

        let parent_y = position_of(&nodes, "root").y();
        let mid = (position_of(&nodes, "a").y() + position_of(&nodes, "b").y()) / 2.0;
        assert_approx_eq!(f32, parent_y, mid, epsilon = 0.01);
    }

    #[test]
    fn test_horizontal_siblings_keep_vertical_distance() {
        let doc = measured_doc(&[
            ("root", 80.0, 30.0, None),
            ("a", 60.0, 50.0, Some("root")),
            ("b", 60.0, 70.0, Some("root")),
        ]);
        let nodes = layout(&doc, LayoutMode::Horizontal).unwrap();

        let a = position_of(&nodes, "a");
        let b = position_of(&nodes, "b");
        let gap = (a.y() - b.y()).abs();
        assert!(gap + 0.01 >= (50.0 + 70.0) / 2.0, "half-heights must fit: {gap}");
    }

    #[test]
    fn test_layout_is_idempotent() {
        let doc = measured_doc(&[
            ("root", 80.0, 30.0, None),
            ("a", 60.0, 30.0, Some("root")),
            ("b", 60.0, 30.0, Some("root")),
        ]);

        for mode in [LayoutMode::Radial, LayoutMode::Horizontal] {
            let first = layout(&doc, mode).unwrap();
            let second = layout(&doc, mode).unwrap();
            for (a, b) in first.iter().zip(second.iter()) {
                assert_eq!(a.position(), b.position());
            }
        }
    }

    #[test]
    fn test_layout_leaves_input_untouched() {
        let doc = measured_doc(&[("root", 80.0, 30.0, None)]);
        let engine = Engine::default().with_origin(Point::new(500.0, 500.0));
        let _ = engine.layout(&doc, LayoutMode::Radial).unwrap();

        assert_eq!(doc.nodes()[0].position(), Point::default());
    }

    #[test]
    fn test_empty_document_layout() {
        let doc = Document::default();
        assert!(layout(&doc, LayoutMode::Radial).unwrap().is_empty());
        assert!(layout(&doc, LayoutMode::Horizontal).unwrap().is_empty());
    }
}

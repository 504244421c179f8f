//! Document snapshots: the nodes, edges, and layout mode of one parse.
//!
//! A [`Document`] is an immutable-by-convention snapshot. A successful parse
//! produces an entirely new snapshot that atomically replaces the previous
//! one; canvas-side mutations clone the current snapshot, modify the clone,
//! and commit it wholesale. Nothing patches a published snapshot in place,
//! so observers never see a partially updated (nodes, edges, mode) tuple.
//!
//! Nodes are stored in insertion order — the serializer walks them in this
//! order, so for parser-produced documents it is also document order.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{edge::Edge, identifier::Id, node::Node};

/// Position algorithm selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Concentric rings around a canvas origin.
    #[default]
    Radial,
    /// Left-to-right columns by hierarchy depth.
    Horizontal,
}

impl LayoutMode {
    /// Canonical lowercase name, as written in the layout directive.
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Radial => "radial",
            LayoutMode::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "radial" => Ok(LayoutMode::Radial),
            "horizontal" => Ok(LayoutMode::Horizontal),
            other => Err(format!("unknown layout mode: {other}")),
        }
    }
}

/// One snapshot of a mind-map document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    layout_mode: LayoutMode,
}

impl Document {
    /// Creates an empty document with the given layout mode.
    pub fn new(layout_mode: LayoutMode) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            layout_mode,
        }
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The document's layout mode.
    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    /// Switches the layout mode.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout_mode = mode;
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks if a node with the given id exists.
    pub fn contains_node(&self, id: Id) -> bool {
        self.index_of(id).is_some()
    }

    /// Returns the node with the given id, if any.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Mutable access to the node with the given id.
    pub fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        let idx = self.index_of(id)?;
        Some(&mut self.nodes[idx])
    }

    /// Insertion-order index of a node.
    pub fn index_of(&self, id: Id) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }

    /// Appends a node at the end of insertion order.
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Inserts a node at a specific insertion-order index.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_node(&mut self, index: usize, node: Node) {
        self.nodes.insert(index, node);
    }

    /// Appends an edge.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if either endpoint does not exist. This check is
    /// for internal bug detection; release builds optimize it away.
    pub fn push_edge(&mut self, edge: Edge) {
        #[cfg(debug_assertions)]
        {
            assert!(
                self.contains_node(edge.source()),
                "Adding edge {}: source node {} does not exist",
                edge.id(),
                edge.source(),
            );
            assert!(
                self.contains_node(edge.target()),
                "Adding edge {}: target node {} does not exist",
                edge.id(),
                edge.target(),
            );
        }
        self.edges.push(edge);
    }

    /// Removes an edge by id. Returns whether an edge was removed.
    pub fn remove_edge(&mut self, id: Id) -> bool {
        let before = self.edges.len();
        self.edges.retain(|edge| edge.id() != id);
        self.edges.len() != before
    }

    /// The parent of a node, if it has an incoming edge.
    pub fn parent_of(&self, id: Id) -> Option<Id> {
        self.edges
            .iter()
            .find(|edge| edge.target() == id)
            .map(Edge::source)
    }

    /// Children of a node, in edge insertion order.
    pub fn children_of(&self, id: Id) -> Vec<Id> {
        self.edges
            .iter()
            .filter(|edge| edge.source() == id)
            .map(Edge::target)
            .collect()
    }

    /// Root nodes (no incoming edge), in insertion order.
    pub fn roots(&self) -> Vec<Id> {
        let targets: HashSet<Id> = self.edges.iter().map(Edge::target).collect();
        self.nodes
            .iter()
            .map(Node::id)
            .filter(|id| !targets.contains(id))
            .collect()
    }

    /// The node and every descendant, depth-first in edge order.
    pub fn subtree_of(&self, id: Id) -> Vec<Id> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut children = self.children_of(current);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Removes a set of nodes and every edge touching them.
    pub fn remove_nodes(&mut self, ids: &HashSet<Id>) {
        self.nodes.retain(|node| !ids.contains(&node.id()));
        self.edges
            .retain(|edge| !ids.contains(&edge.source()) && !ids.contains(&edge.target()));
    }

    /// Structural equality: same node kinds, levels, content, style, and
    /// grouping in the same order, and the same parent→child shape.
    ///
    /// Identifiers and positions are not compared — a round-tripped document
    /// re-mints ids, and positions are layout output, not document content.
    pub fn structurally_equal(&self, other: &Document) -> bool {
        if self.nodes.len() != other.nodes.len()
            || self.edges.len() != other.edges.len()
            || self.layout_mode != other.layout_mode
        {
            return false;
        }

        for (a, b) in self.nodes.iter().zip(other.nodes.iter()) {
            if a.kind() != b.kind()
                || a.content() != b.content()
                || a.style() != b.style()
                || a.group_id() != b.group_id()
            {
                return false;
            }
        }

        let edge_indices = |doc: &Document| -> Option<HashSet<(usize, usize)>> {
            doc.edges
                .iter()
                .map(|edge| Some((doc.index_of(edge.source())?, doc.index_of(edge.target())?)))
                .collect()
        };
        match (edge_indices(self), edge_indices(other)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &str, level: u8) -> Node {
        Node::text(Id::new(name), name, level, "").unwrap()
    }

    fn doc_with_chain() -> Document {
        // a → b → c, plus root d
        let mut doc = Document::new(LayoutMode::Radial);
        doc.push_node(text("a", 1));
        doc.push_node(text("b", 2));
        doc.push_node(text("c", 3));
        doc.push_node(text("d", 1));
        doc.push_edge(Edge::link(Id::new("e1"), Id::new("a"), Id::new("b")).unwrap());
        doc.push_edge(Edge::link(Id::new("e2"), Id::new("b"), Id::new("c")).unwrap());
        doc
    }

    #[test]
    fn test_roots_excludes_edge_targets() {
        let doc = doc_with_chain();
        assert_eq!(doc.roots(), vec![Id::new("a"), Id::new("d")]);
    }

    #[test]
    fn test_parent_and_children() {
        let doc = doc_with_chain();
        assert_eq!(doc.parent_of(Id::new("b")), Some(Id::new("a")));
        assert_eq!(doc.parent_of(Id::new("a")), None);
        assert_eq!(doc.children_of(Id::new("a")), vec![Id::new("b")]);
        assert!(doc.children_of(Id::new("d")).is_empty());
    }

    #[test]
    fn test_subtree_depth_first() {
        let doc = doc_with_chain();
        assert_eq!(
            doc.subtree_of(Id::new("a")),
            vec![Id::new("a"), Id::new("b"), Id::new("c")]
        );
        assert_eq!(doc.subtree_of(Id::new("d")), vec![Id::new("d")]);
    }

    #[test]
    fn test_remove_nodes_drops_incident_edges() {
        let mut doc = doc_with_chain();
        let doomed: HashSet<Id> = doc.subtree_of(Id::new("b")).into_iter().collect();
        doc.remove_nodes(&doomed);

        assert_eq!(doc.len(), 2);
        assert!(doc.edges().is_empty());
        assert!(doc.contains_node(Id::new("a")));
        assert!(!doc.contains_node(Id::new("c")));
    }

    #[test]
    fn test_structural_equality_ignores_ids() {
        let doc = doc_with_chain();

        let mut renamed = Document::new(LayoutMode::Radial);
        renamed.push_node(text("w", 1));
        renamed.push_node(text("x", 2));
        renamed.push_node(text("y", 3));
        renamed.push_node(text("z", 1));
        renamed.push_edge(Edge::link(Id::new("p1"), Id::new("w"), Id::new("x")).unwrap());
        renamed.push_edge(Edge::link(Id::new("p2"), Id::new("x"), Id::new("y")).unwrap());

        // Same shape, different ids — but content differs (node names double
        // as content in these fixtures), so rebuild with matching content.
        let mut matching = Document::new(LayoutMode::Radial);
        matching.push_node(Node::text(Id::new("w"), "a", 1, "").unwrap());
        matching.push_node(Node::text(Id::new("x"), "b", 2, "").unwrap());
        matching.push_node(Node::text(Id::new("y"), "c", 3, "").unwrap());
        matching.push_node(Node::text(Id::new("z"), "d", 1, "").unwrap());
        matching.push_edge(Edge::link(Id::new("p1"), Id::new("w"), Id::new("x")).unwrap());
        matching.push_edge(Edge::link(Id::new("p2"), Id::new("x"), Id::new("y")).unwrap());

        assert!(doc.structurally_equal(&matching));
        assert!(!doc.structurally_equal(&renamed));
    }

    #[test]
    fn test_structural_equality_detects_reparenting() {
        let doc = doc_with_chain();

        let mut reparented = doc.clone();
        reparented.remove_edge(Id::new("e2"));
        reparented.push_edge(Edge::link(Id::new("e2"), Id::new("a"), Id::new("c")).unwrap());

        assert!(!doc.structurally_equal(&reparented));
    }
}

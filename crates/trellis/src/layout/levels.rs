//! Breadth-first level assignment over the hierarchy graph.

use std::collections::VecDeque;

use indexmap::IndexMap;
use petgraph::{algo::is_cyclic_directed, graph::DiGraph};

use trellis_core::{Document, identifier::Id};

use super::LayoutError;

/// Hierarchy levels and adjacency, indexed by node insertion order.
#[derive(Debug)]
pub(super) struct Levels {
    /// BFS level of each node; roots are level 0.
    pub(super) of: Vec<usize>,
    /// Node indices grouped by level, in insertion order within each group.
    pub(super) groups: Vec<Vec<usize>>,
    /// Children of each node, in edge insertion order.
    pub(super) children: Vec<Vec<usize>>,
    /// Root node indices (no incoming edge), in insertion order.
    pub(super) roots: Vec<usize>,
}

/// Assigns a level to every node: 0 for roots, n+1 for children of a level-n
/// node. Nodes unreachable from any root default to level 0.
///
/// # Errors
///
/// Returns [`LayoutError::CircularDependency`] when the edge set is cyclic.
pub(super) fn assign(document: &Document) -> Result<Levels, LayoutError> {
    let node_count = document.len();
    let index_of: IndexMap<Id, usize> = document
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id(), idx))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut has_parent = vec![false; node_count];
    let mut graph = DiGraph::<usize, ()>::with_capacity(node_count, document.edges().len());
    let petgraph_indices: Vec<_> = (0..node_count).map(|idx| graph.add_node(idx)).collect();

    for edge in document.edges() {
        let (Some(&source), Some(&target)) =
            (index_of.get(&edge.source()), index_of.get(&edge.target()))
        else {
            // Dangling edges are a serializer-level error; layout just skips
            // them so it cannot be wedged by a broken snapshot.
            continue;
        };
        children[source].push(target);
        has_parent[target] = true;
        graph.add_edge(petgraph_indices[source], petgraph_indices[target], ());
    }

    if is_cyclic_directed(&graph) {
        return Err(LayoutError::CircularDependency);
    }

    let roots: Vec<usize> = (0..node_count).filter(|&idx| !has_parent[idx]).collect();

    let mut of = vec![0usize; node_count];
    let mut visited = vec![false; node_count];
    let mut queue: VecDeque<(usize, usize)> = roots.iter().map(|&idx| (idx, 0)).collect();

    while let Some((idx, level)) = queue.pop_front() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        of[idx] = level;
        for &child in &children[idx] {
            if !visited[child] {
                queue.push_back((child, level + 1));
            }
        }
    }

    let depth = of.iter().copied().max().map_or(0, |max| max + 1);
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); depth];
    for idx in 0..node_count {
        groups[of[idx]].push(idx);
    }
    // Insertion-order indexing within a ring must not depend on BFS
    // discovery order.
    for group in &mut groups {
        group.sort_unstable();
    }

    Ok(Levels {
        of,
        groups,
        children,
        roots,
    })
}

#[cfg(test)]
mod tests {
    use trellis_core::{Edge, LayoutMode, Node};

    use super::*;

    fn doc(edges: &[(&str, &str)], names: &[&str]) -> Document {
        let mut doc = Document::new(LayoutMode::Radial);
        for name in names {
            doc.push_node(Node::text(Id::new(name), *name, 1, "").unwrap());
        }
        for (source, target) in edges {
            let id = Id::new(&format!("e-{source}-{target}"));
            doc.push_edge(Edge::link(id, Id::new(source), Id::new(target)).unwrap());
        }
        doc
    }

    #[test]
    fn test_roots_are_level_zero() {
        let doc = doc(&[("a", "b"), ("b", "c")], &["a", "b", "c", "lone"]);
        let levels = assign(&doc).unwrap();
        assert_eq!(levels.of, vec![0, 1, 2, 0]);
        assert_eq!(levels.roots, vec![0, 3]);
    }

    #[test]
    fn test_groups_follow_insertion_order() {
        let doc = doc(
            &[("a", "x"), ("b", "y")],
            &["a", "b", "x", "y"],
        );
        let levels = assign(&doc).unwrap();
        assert_eq!(levels.groups[0], vec![0, 1]);
        assert_eq!(levels.groups[1], vec![2, 3]);
    }

    #[test]
    fn test_cycle_detected() {
        let doc = doc(&[("a", "b"), ("b", "a")], &["a", "b"]);
        assert_eq!(assign(&doc).unwrap_err(), LayoutError::CircularDependency);
    }

    #[test]
    fn test_empty_document() {
        let levels = assign(&Document::default()).unwrap();
        assert!(levels.groups.is_empty());
        assert!(levels.roots.is_empty());
    }
}

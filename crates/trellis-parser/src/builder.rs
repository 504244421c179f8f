//! Builds a document snapshot from lexed block tokens.
//!
//! Hierarchy bookkeeping is an explicit [`HierarchyStacks`] value threaded
//! through the token pass, keeping the build a pure function of its input.
//! Headers and list items are tracked on independent stacks; list items nest
//! under the nearest enclosing header when no list ancestor survives the
//! level pops. Fenced code and images attach to the last created header or
//! list node. Thematic breaks advance the group counter and nothing else.

use indexmap::IndexMap;
use log::warn;

use trellis_core::{
    Document, Edge, LayoutMode, Node,
    identifier::{Id, IdAllocator},
    style::extract_style_tokens,
};

use crate::{
    error::ParseError,
    lexer::{self, Block},
};

/// Per-track stacks of hierarchy entries.
///
/// An element at level L pops every same-track entry with level ≥ L before
/// attaching, so a child always hangs off the nearest ancestor with a
/// strictly smaller level even when markdown levels skip or regress.
///
/// List entries keep the raw indentation level for popping, but the node
/// stores its normalized chain depth — the serializer re-derives indentation
/// from the edge graph, so storing the same value is what makes a skipped
/// indent (`- a` / `    - b`) survive a round-trip unchanged.
#[derive(Debug, Default)]
struct HierarchyStacks {
    headers: Vec<(u8, Id)>,
    /// `(raw indent level, normalized chain depth, id)`.
    lists: Vec<(u8, u8, Id)>,
}

impl HierarchyStacks {
    /// Registers a header; returns the parent it attaches to, if any.
    ///
    /// A header terminates any open list nesting: subsequent list items
    /// belong to this header, not to lists above it.
    fn enter_header(&mut self, level: u8, id: Id) -> Option<Id> {
        while self.headers.last().is_some_and(|&(l, _)| l >= level) {
            self.headers.pop();
        }
        let parent = self.headers.last().map(|&(_, parent)| parent);
        self.headers.push((level, id));
        self.lists.clear();
        parent
    }

    /// Registers a list item; returns `(normalized depth, parent)`.
    fn enter_list(&mut self, raw_level: u8, id: Id) -> (u8, Option<Id>) {
        while self.lists.last().is_some_and(|&(l, _, _)| l >= raw_level) {
            self.lists.pop();
        }
        let (depth, parent) = match self.lists.last() {
            Some(&(_, parent_depth, parent)) => (parent_depth + 1, Some(parent)),
            None => (1, self.headers.last().map(|&(_, parent)| parent)),
        };
        self.lists.push((raw_level, depth, id));
        (depth, parent)
    }
}

/// Assembles blocks into a fresh [`Document`].
pub(crate) fn build(blocks: Vec<Block>) -> Result<Document, ParseError> {
    let mut ids = IdAllocator::new();
    let mut nodes: IndexMap<Id, Node> = IndexMap::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut stacks = HierarchyStacks::default();
    let mut layout_mode = LayoutMode::default();
    let mut group = 0u32;
    // Group ids must come out as consecutive ordinals for serialization to
    // invert exactly: a break only advances the counter once the current
    // group holds a node, so leading and doubled breaks cannot leave gaps.
    let mut group_populated = false;
    let mut last_container: Option<Id> = None;

    for block in blocks {
        match block {
            Block::Directive(mode) => layout_mode = mode,

            Block::Heading { line, depth, text } => {
                let extracted = extract_style_tokens(&text);
                if extracted.content.trim().is_empty() {
                    warn!(line; "Skipping heading without content");
                    continue;
                }
                let id = ids.node_id();
                let node =
                    Node::header(id, extracted.content, depth, extracted.tokens.join(" "))
                        .map_err(|source| ParseError::Node { line, source })?
                        .with_group_id(group);
                let parent = stacks.enter_header(depth, id);
                attach(&mut nodes, &mut edges, &mut ids, node, parent);
                last_container = Some(id);
                group_populated = true;
            }

            Block::ListItem { line, depth, text } => {
                let extracted = extract_style_tokens(&text);
                if extracted.content.trim().is_empty() {
                    warn!(line; "Skipping list item without content");
                    continue;
                }
                let id = ids.node_id();
                let (depth, parent) = stacks.enter_list(depth, id);
                let node = Node::text(id, extracted.content, depth, extracted.tokens.join(" "))
                    .map_err(|source| ParseError::Node { line, source })?
                    .with_group_id(group);
                attach(&mut nodes, &mut edges, &mut ids, node, parent);
                last_container = Some(id);
                group_populated = true;
            }

            Block::Fence {
                line, info, body, ..
            } => {
                let extracted = extract_style_tokens(&info);
                let id = ids.node_id();
                let node = Node::code(id, body, extracted.content, extracted.tokens.join(" "))
                    .map_err(|source| ParseError::Node { line, source })?
                    .with_group_id(group);
                attach(&mut nodes, &mut edges, &mut ids, node, last_container);
                group_populated = true;
            }

            Block::Image { line, text } => {
                let extracted = extract_style_tokens(&text);
                let Some((alt, url)) = lexer::parse_image(&extracted.content) else {
                    warn!(line; "Skipping malformed image syntax");
                    continue;
                };
                let id = ids.node_id();
                let node = match Node::image(id, alt, url, extracted.tokens.join(" ")) {
                    Ok(node) => node.with_group_id(group),
                    Err(err) => {
                        warn!(line, err:%; "Skipping image with invalid URL");
                        continue;
                    }
                };
                attach(&mut nodes, &mut edges, &mut ids, node, last_container);
                group_populated = true;
            }

            Block::Break { .. } => {
                if group_populated {
                    group += 1;
                    group_populated = false;
                }
            }
        }
    }

    let mut document = Document::new(layout_mode);
    for (_, node) in nodes {
        document.push_node(node);
    }
    for edge in edges {
        document.push_edge(edge);
    }
    Ok(document)
}

/// Records a node and, when it has a parent, the parent → child edge.
fn attach(
    nodes: &mut IndexMap<Id, Node>,
    edges: &mut Vec<Edge>,
    ids: &mut IdAllocator,
    node: Node,
    parent: Option<Id>,
) {
    if let Some(parent) = parent {
        let edge = Edge::link(ids.edge_id(), parent, node.id())
            .expect("parser mints fresh child ids, so no self-loop is possible");
        edges.push(edge);
    }
    nodes.insert(node.id(), node);
}

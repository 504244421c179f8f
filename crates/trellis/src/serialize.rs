//! Document → markdown serialization, the parser's exact inverse.
//!
//! The serializer emits the layout directive first, then every node in
//! insertion order, separating thematic-break groups with `---` lines. List
//! indentation is re-derived from the edge graph rather than the stored
//! level, so structural edits (re-parenting, deletions) serialize
//! consistently with the hierarchy they produced.
//!
//! Output is whitespace-stable: re-parsing emitted text and serializing the
//! result is byte-identical. The only non-CommonMark constructs emitted are
//! the directive comment and the style token braces, both of which ordinary
//! markdown tooling ignores.

use log::warn;
use thiserror::Error;

use trellis_core::{
    Document, Node, NodeKind,
    identifier::Id,
    style::restore_style_tokens,
};

/// Serialization failures. Returned, never panicked; callers leave their
/// existing text untouched when one surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    /// An edge references a node id that is not in the document.
    #[error("edge {edge} references missing node {node}")]
    InvalidEdge { edge: Id, node: Id },

    /// A node's content cannot be expressed in its markdown syntax.
    #[error("node {node} cannot be serialized: {reason}")]
    InvalidNode { node: Id, reason: String },
}

/// Serializes a document snapshot to canonical markdown.
///
/// # Errors
///
/// Returns [`SerializeError::InvalidEdge`] for dangling edges and
/// [`SerializeError::InvalidNode`] for content that cannot survive a
/// round-trip (newlines in inline elements, fence markers inside a code
/// body, delimiter characters inside image syntax).
pub fn serialize(document: &Document) -> Result<String, SerializeError> {
    // A dangling edge means the snapshot violated its own invariant; report
    // it rather than emitting text that silently drops hierarchy.
    for edge in document.edges() {
        for endpoint in [edge.source(), edge.target()] {
            if !document.contains_node(endpoint) {
                return Err(SerializeError::InvalidEdge {
                    edge: edge.id(),
                    node: endpoint,
                });
            }
        }
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("<!-- layout: {} -->", document.layout_mode()));

    let mut previous_group: Option<u32> = None;
    for node in document.nodes() {
        if previous_group.is_some_and(|group| group != node.group_id()) {
            lines.push("---".to_string());
        }
        previous_group = Some(node.group_id());

        match node.kind() {
            NodeKind::Header { level } => {
                let content = inline_content(node)?;
                lines.push(format!("{} {}", "#".repeat(usize::from(*level)), content));
            }
            NodeKind::Text { .. } => {
                let content = inline_content(node)?;
                let depth = list_depth(document, node);
                lines.push(format!("{}- {}", "  ".repeat(depth - 1), content));
            }
            NodeKind::Code { language } => {
                lines.push(format!(
                    "```{}",
                    restore_style_tokens(language, &node.style_tokens())
                ));
                for body_line in node.content().split('\n') {
                    if body_line.trim() == "```" {
                        return Err(SerializeError::InvalidNode {
                            node: node.id(),
                            reason: "code body contains a closing fence".to_string(),
                        });
                    }
                    lines.push(body_line.to_string());
                }
                lines.push("```".to_string());
            }
            NodeKind::Image { url } => {
                let alt = node.content();
                if alt.contains(']') || alt.contains('\n') {
                    return Err(SerializeError::InvalidNode {
                        node: node.id(),
                        reason: "image alt text contains `]` or a newline".to_string(),
                    });
                }
                if url.contains(')') {
                    return Err(SerializeError::InvalidNode {
                        node: node.id(),
                        reason: "image URL contains `)`".to_string(),
                    });
                }
                lines.push(restore_style_tokens(
                    &format!("![{alt}]({url})"),
                    &node.style_tokens(),
                ));
            }
        }
    }

    Ok(lines.join("\n"))
}

/// Single-line content with the node's style suffix restored.
fn inline_content(node: &Node) -> Result<String, SerializeError> {
    if node.content().contains('\n') {
        return Err(SerializeError::InvalidNode {
            node: node.id(),
            reason: "inline content contains a newline".to_string(),
        });
    }
    Ok(restore_style_tokens(node.content(), &node.style_tokens()))
}

/// List nesting depth, re-derived from the edge graph: one plus the length
/// of the unbroken chain of text-node ancestors.
fn list_depth(document: &Document, node: &Node) -> usize {
    let mut depth = 1;
    let mut current = node.id();
    // The chain cannot be longer than the node count in a well-formed
    // forest; the bound keeps a corrupted edge set from looping forever.
    for _ in 0..document.len() {
        let Some(parent) = document.parent_of(current) else {
            return depth;
        };
        let Some(parent_node) = document.node(parent) else {
            return depth;
        };
        if !matches!(parent_node.kind(), NodeKind::Text { .. }) {
            return depth;
        }
        depth += 1;
        current = parent;
    }
    warn!(node:% = node.id(); "Text ancestor chain did not terminate; edge set is not a forest");
    depth
}

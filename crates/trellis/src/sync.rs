//! Bidirectional synchronization between markdown text and the graph.
//!
//! The [`SyncController`] owns the authoritative `(Document, String)` pair
//! and the single-writer state machine that keeps the two representations
//! from echoing updates into each other forever. The rule is explicit as the
//! three-state [`WriteSource`] enum rather than ad hoc boolean flags:
//!
//! - `Idle` — neither side is mid-update.
//! - `TextSource` — a parse was just applied; the next graph-subscription
//!   notification is its echo and is swallowed exactly once.
//! - `GraphSource` — a mutation was just serialized into the text; the next
//!   text-change notification is its echo and is swallowed exactly once.
//!
//! At most one direction is live at any instant, so the opposite direction's
//! resulting update can be consumed deterministically instead of
//! re-triggering the first direction.
//!
//! Text edits are debounced for [`DEBOUNCE_INTERVAL`] before parsing; graph
//! mutations apply immediately and discard any pending parse outright (graph
//! wins, the stale in-flight text interpretation is dropped). Time is
//! injected by the host event loop as [`Instant`] arguments, so the
//! controller is synchronous and fully deterministic under test.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::{debug, warn};
use thiserror::Error;

use trellis_core::{
    Document, Edge, LayoutMode, Node, NodeKind, ValidationError,
    geometry::{Point, Size},
    identifier::{Id, IdAllocator},
};
use trellis_parser::ParseError;

use crate::serialize::SerializeError;

/// How long a text edit settles before it is parsed. Restarted on every
/// keystroke.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

/// Which representation, if any, is currently the live writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteSource {
    /// No update in flight.
    #[default]
    Idle,
    /// Text just rewrote the graph; awaiting the graph-subscription echo.
    TextSource,
    /// The graph just rewrote the text; awaiting the text-change echo.
    GraphSource,
}

/// Errors surfaced by the controller. The current snapshot and text are
/// always left untouched when one is returned.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("unknown node {node}")]
    UnknownNode { node: Id },

    #[error("unknown edge {edge}")]
    UnknownEdge { edge: Id },

    #[error("invalid attachment under {parent}: {reason}")]
    InvalidAttachment { parent: Id, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// What a text-change notification turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEvent {
    /// The echo of a just-applied graph → text update; swallowed.
    EchoConsumed,
    /// A genuine edit; a debounced parse is now pending.
    ParseScheduled,
}

/// What a graph-subscription notification turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    /// The echo of a just-applied text → graph update; swallowed.
    EchoConsumed,
    /// Not an echo; graph changes enter through [`SyncController::apply`].
    Ignored,
}

/// Result of a successfully applied mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Whether the serialized text differed and was committed. A pure move
    /// produces identical text; no echo will arrive for it.
    pub text_replaced: bool,
    /// The id of the node a `CreateNode` mutation added.
    pub created: Option<Id>,
}

/// Kind-specific payload for [`GraphMutation::CreateNode`]. Levels are not
/// part of the payload: a text or header child sits one level below its
/// parent.
#[derive(Debug, Clone)]
pub enum NodeSpec {
    Text { content: String, style: String },
    Header { content: String, style: String },
    Code { body: String, language: String, style: String },
    Image { alt: String, url: String, style: String },
}

/// Canvas-side mutation commands. Each one applies immediately (no
/// debounce), produces a new snapshot, and is serialized into the text.
#[derive(Debug, Clone)]
pub enum GraphMutation {
    CreateNode { parent: Option<Id>, spec: NodeSpec },
    UpdateContent { node: Id, content: String },
    UpdateStyle { node: Id, style: String },
    MoveNode { node: Id, position: Point },
    DeleteNode { node: Id },
    CreateEdge { source: Id, target: Id },
    DeleteEdge { edge: Id },
    SetLayoutMode { mode: LayoutMode },
}

#[derive(Debug, Clone)]
struct PendingParse {
    text: String,
    deadline: Instant,
}

/// The single-writer synchronization controller.
#[derive(Debug)]
pub struct SyncController {
    document: Document,
    text: String,
    state: WriteSource,
    pending: Option<PendingParse>,
    ids: IdAllocator,
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncController {
    /// Creates a controller over an empty document.
    pub fn new() -> Self {
        let document = Document::default();
        let text = crate::serialize::serialize(&document)
            .expect("an empty document always serializes");
        Self {
            document,
            text,
            state: WriteSource::Idle,
            pending: None,
            ids: IdAllocator::new(),
        }
    }

    /// Creates a controller from initial markdown text.
    ///
    /// The text is kept verbatim; it is not rewritten to canonical form
    /// until a graph mutation produces new text.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Parse`] when the initial text is structurally
    /// unrecoverable.
    pub fn from_text(text: impl Into<String>) -> Result<Self, SyncError> {
        let text = text.into();
        let document = trellis_parser::parse(&text)?;
        let mut ids = IdAllocator::new();
        seed_ids(&mut ids, &document);
        Ok(Self {
            document,
            text,
            state: WriteSource::Idle,
            pending: None,
            ids,
        })
    }

    /// The current document snapshot.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current writer state.
    pub fn state(&self) -> WriteSource {
        self.state
    }

    /// Whether a debounced parse is waiting to fire.
    pub fn has_pending_parse(&self) -> bool {
        self.pending.is_some()
    }

    /// Reports a text-editor change.
    ///
    /// In `GraphSource` state this is the echo of the last graph → text
    /// write: it is consumed silently and the controller returns to `Idle`
    /// without re-parsing. Otherwise the debounce timer (re)starts; the text
    /// is parsed when [`poll`](Self::poll) is called past the deadline.
    pub fn notify_text_changed(&mut self, text: impl Into<String>, now: Instant) -> TextEvent {
        if self.state == WriteSource::GraphSource {
            self.state = WriteSource::Idle;
            debug!("Consumed text echo of a graph mutation");
            return TextEvent::EchoConsumed;
        }

        self.pending = Some(PendingParse {
            text: text.into(),
            deadline: now + DEBOUNCE_INTERVAL,
        });
        TextEvent::ParseScheduled
    }

    /// Reports a graph-subscription notification.
    ///
    /// In `TextSource` state this is the echo of the last text → graph
    /// replacement: it is consumed and the controller returns to `Idle`.
    /// Anything else is ignored — graph changes enter through
    /// [`apply`](Self::apply), not through the subscription.
    pub fn notify_graph_changed(&mut self) -> GraphEvent {
        if self.state == WriteSource::TextSource {
            self.state = WriteSource::Idle;
            debug!("Consumed graph echo of a text parse");
            return GraphEvent::EchoConsumed;
        }

        warn!(state:? = self.state; "Ignoring graph notification outside TextSource state");
        GraphEvent::Ignored
    }

    /// Fires the pending parse if its debounce deadline has passed.
    ///
    /// On success the snapshot is replaced atomically and the controller
    /// enters `TextSource` until the graph-subscription echo arrives. On
    /// failure the previous snapshot is kept — state is never cleared on
    /// error — and the error is surfaced to the caller.
    pub fn poll(&mut self, now: Instant) -> Option<Result<(), SyncError>> {
        if now < self.pending.as_ref()?.deadline {
            return None;
        }
        let pending = self.pending.take()?;

        match trellis_parser::parse(&pending.text) {
            Ok(document) => {
                seed_ids(&mut self.ids, &document);
                self.document = document;
                self.text = pending.text;
                self.state = WriteSource::TextSource;
                debug!(nodes = self.document.nodes().len(); "Replaced snapshot from text");
                Some(Ok(()))
            }
            Err(err) => {
                warn!(err:% = err; "Parse failed; keeping previous snapshot");
                Some(Err(err.into()))
            }
        }
    }

    /// Applies a graph mutation immediately.
    ///
    /// Any pending debounced parse is discarded first — graph wins over a
    /// stale in-flight text interpretation. The mutation runs on a clone of
    /// the snapshot which is serialized and committed together with the new
    /// text; on any error both document and text stay untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] for unknown entities, validation failures, and
    /// serialization failures.
    pub fn apply(
        &mut self,
        mutation: GraphMutation,
        _now: Instant,
    ) -> Result<MutationOutcome, SyncError> {
        if self.pending.take().is_some() {
            debug!("Discarded pending parse; graph mutation wins");
        }

        let mut next = self.document.clone();
        let created = apply_mutation(&mut next, &mut self.ids, mutation)?;
        let text = crate::serialize::serialize(&next)?;

        let text_replaced = text != self.text;
        self.document = next;
        if text_replaced {
            self.text = text;
            self.state = WriteSource::GraphSource;
        }

        Ok(MutationOutcome {
            text_replaced,
            created,
        })
    }

    /// Records a renderer-measured node size.
    ///
    /// This is collaborator input, not a document mutation: it does not
    /// serialize, touch the text, or change the writer state.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownNode`] for an unknown id.
    pub fn set_measured_size(&mut self, node: Id, size: Size) -> Result<(), SyncError> {
        let target = self
            .document
            .node_mut(node)
            .ok_or(SyncError::UnknownNode { node })?;
        target.set_measured_size(size);
        Ok(())
    }
}

fn seed_ids(ids: &mut IdAllocator, document: &Document) {
    ids.seed(document.nodes().iter().map(Node::id));
    ids.seed(document.edges().iter().map(Edge::id));
}

/// Applies one mutation to a cloned snapshot. Returns the created node id
/// for `CreateNode`.
fn apply_mutation(
    document: &mut Document,
    ids: &mut IdAllocator,
    mutation: GraphMutation,
) -> Result<Option<Id>, SyncError> {
    match mutation {
        GraphMutation::CreateNode { parent, spec } => {
            create_node(document, ids, parent, spec).map(Some)
        }

        GraphMutation::UpdateContent { node, content } => {
            let target = document
                .node_mut(node)
                .ok_or(SyncError::UnknownNode { node })?;
            target.set_content(content)?;
            Ok(None)
        }

        GraphMutation::UpdateStyle { node, style } => {
            let target = document
                .node_mut(node)
                .ok_or(SyncError::UnknownNode { node })?;
            target.set_style(style);
            Ok(None)
        }

        GraphMutation::MoveNode { node, position } => {
            let target = document
                .node_mut(node)
                .ok_or(SyncError::UnknownNode { node })?;
            target.set_position(position);
            Ok(None)
        }

        GraphMutation::DeleteNode { node } => {
            if !document.contains_node(node) {
                return Err(SyncError::UnknownNode { node });
            }
            let doomed: HashSet<Id> = document.subtree_of(node).into_iter().collect();
            document.remove_nodes(&doomed);
            Ok(None)
        }

        GraphMutation::CreateEdge { source, target } => {
            for endpoint in [source, target] {
                if !document.contains_node(endpoint) {
                    return Err(SyncError::UnknownNode { node: endpoint });
                }
            }
            if document.parent_of(target).is_some() {
                return Err(SyncError::InvalidAttachment {
                    parent: source,
                    reason: format!("{target} already has a parent"),
                });
            }
            if document.subtree_of(target).contains(&source) {
                return Err(SyncError::InvalidAttachment {
                    parent: source,
                    reason: "edge would create a cycle".to_string(),
                });
            }
            let edge = Edge::link(ids.edge_id(), source, target)?;
            document.push_edge(edge);
            Ok(None)
        }

        GraphMutation::DeleteEdge { edge } => {
            if !document.remove_edge(edge) {
                return Err(SyncError::UnknownEdge { edge });
            }
            Ok(None)
        }

        GraphMutation::SetLayoutMode { mode } => {
            document.set_layout_mode(mode);
            Ok(None)
        }
    }
}

/// Builds the node a [`NodeSpec`] describes and splices it into the
/// insertion order where a re-parse of the serialized text will attach it to
/// the same parent.
fn create_node(
    document: &mut Document,
    ids: &mut IdAllocator,
    parent: Option<Id>,
    spec: NodeSpec,
) -> Result<Id, SyncError> {
    if let Some(parent) = parent {
        if !document.contains_node(parent) {
            return Err(SyncError::UnknownNode { node: parent });
        }
    }

    let id = ids.node_id();
    let (node, placement) = match spec {
        NodeSpec::Text { content, style } => {
            let level = match parent.and_then(|p| document.node(p)) {
                Some(node) => match node.kind() {
                    NodeKind::Text { level } => level + 1,
                    _ => 1,
                },
                None => 1,
            };
            (Node::text(id, content, level, style)?, Placement::BeforeSubsections)
        }
        NodeSpec::Header { content, style } => {
            let level = match parent.and_then(|p| document.node(p)) {
                Some(node) => match node.kind() {
                    NodeKind::Header { level } => level + 1,
                    _ => {
                        return Err(SyncError::InvalidAttachment {
                            parent: node.id(),
                            reason: "headers can only nest under headers".to_string(),
                        });
                    }
                },
                None => 1,
            };
            (Node::header(id, content, level, style)?, Placement::AfterSubtree)
        }
        NodeSpec::Code {
            body,
            language,
            style,
        } => (Node::code(id, body, language, style)?, Placement::AfterParent),
        NodeSpec::Image { alt, url, style } => {
            (Node::image(id, alt, url, style)?, Placement::AfterParent)
        }
    };

    let index = match parent {
        Some(parent) => insertion_index(document, parent, placement),
        None => document.len(),
    };

    // Inherit the predecessor's group so group runs stay monotone in
    // insertion order, which serialization depends on.
    let group = index
        .checked_sub(1)
        .and_then(|idx| document.nodes().get(idx))
        .map_or(0, Node::group_id);

    document.insert_node(index, node.with_group_id(group));
    if let Some(parent) = parent {
        let edge = Edge::link(ids.edge_id(), parent, id)?;
        document.push_edge(edge);
    }
    Ok(id)
}

/// Where a created node lands in insertion order. Serialization walks that
/// order, so the spot must be one a re-parse attaches to the same parent.
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// Directly after the parent's line: code and images bind to the last
    /// created container.
    AfterParent,
    /// After the parent's entire subtree: a new header section pops back to
    /// the parent no matter how deep the previous section went.
    AfterSubtree,
    /// After the parent's list/code/image run but before any header
    /// descendant: a header would capture list items serialized after it.
    BeforeSubsections,
}

fn insertion_index(document: &Document, parent: Id, placement: Placement) -> usize {
    let after_parent = document
        .index_of(parent)
        .map_or(document.len(), |idx| idx + 1);

    match placement {
        Placement::AfterParent => after_parent,
        Placement::AfterSubtree => document
            .subtree_of(parent)
            .iter()
            .filter_map(|&member| document.index_of(member))
            .max()
            .map_or(document.len(), |idx| idx + 1),
        Placement::BeforeSubsections => {
            let subtree: HashSet<Id> = document.subtree_of(parent).into_iter().collect();
            let mut idx = after_parent;
            while let Some(node) = document.nodes().get(idx) {
                if !subtree.contains(&node.id())
                    || matches!(node.kind(), NodeKind::Header { .. })
                {
                    break;
                }
                idx += 1;
            }
            idx
        }
    }
}

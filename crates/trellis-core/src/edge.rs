//! Directed parent → child hierarchy links.

use serde::{Deserialize, Serialize};

use crate::{identifier::Id, node::ValidationError};

/// A directed edge from a parent node to a child node.
///
/// Together with the node list, the edge set forms a forest: no cycles,
/// multiple roots allowed. Endpoint existence is a document-level invariant
/// checked where edges enter a [`Document`](crate::Document); the serializer
/// reports dangling endpoints as an error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    id: Id,
    source: Id,
    target: Id,
}

impl Edge {
    /// Creates a parent → child edge.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SelfLoop`] when `source` and `target` are
    /// the same node.
    pub fn link(id: Id, source: Id, target: Id) -> Result<Self, ValidationError> {
        if source == target {
            return Err(ValidationError::SelfLoop { id, node: source });
        }
        Ok(Self { id, source, target })
    }

    /// The edge's identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// The parent node.
    pub fn source(&self) -> Id {
        self.source
    }

    /// The child node.
    pub fn target(&self) -> Id {
        self.target
    }
}

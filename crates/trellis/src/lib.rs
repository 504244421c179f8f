//! Trellis - a markdown ↔ mind-map synchronization engine.
//!
//! Trellis keeps two representations of one document in lockstep: markdown
//! text and a positioned graph of typed nodes. The crate provides the four
//! engine pieces and a facade that wires them together:
//!
//! - parsing (re-exported from [`trellis_parser`]): text → document snapshot
//! - [`serialize`]: document snapshot → text, the parser's exact inverse
//! - [`layout`]: document snapshot → positioned nodes
//! - [`sync::SyncController`]: the single-writer state machine that routes
//!   updates between a live text editor and a live canvas without echo loops
//!
//! # Pipeline
//!
//! ```text
//! Markdown Text
//!     ↓ parse                       ↑ serialize
//! Document (nodes + edges + mode)
//!     ↓ layout (measured sizes in)
//! Positioned nodes → renderer
//! ```
//!
//! Rendering, measuring, and input handling are external collaborators: the
//! engine consumes measured node sizes and mutation commands, and produces
//! snapshots and positions.

pub mod config;
pub mod layout;
pub mod sync;

mod error;
mod serialize;

pub use trellis_core::{Document, Edge, LayoutMode, Node, NodeKind, ValidationError};
pub use trellis_core::{geometry, identifier, style};
pub use trellis_parser::{ParseError, parse};

pub use error::TrellisError;
pub use layout::{Engine, LayoutError, layout};
pub use serialize::{SerializeError, serialize};
pub use sync::SyncController;

use log::{debug, info};

use config::AppConfig;

/// Facade for processing a document through the full pipeline.
///
/// # Examples
///
/// ```
/// use trellis::{MapBuilder, config::AppConfig};
///
/// let source = "# Title\n- child";
/// let builder = MapBuilder::new(AppConfig::default());
///
/// let document = builder.parse(source).expect("valid markdown");
/// let text = builder.serialize(&document).expect("serializable");
/// assert!(text.starts_with("<!-- layout: radial -->"));
/// ```
#[derive(Debug, Default)]
pub struct MapBuilder {
    config: AppConfig,
}

impl MapBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parses markdown into a fresh document snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Parse`] for structurally unrecoverable input.
    pub fn parse(&self, source: &str) -> Result<Document, TrellisError> {
        info!("Parsing document");

        let document =
            trellis_parser::parse(source).map_err(|err| TrellisError::new_parse_error(err, source))?;

        debug!(nodes = document.nodes().len(); "Document parsed successfully");
        Ok(document)
    }

    /// Serializes a document back to canonical markdown.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Serialize`] when the document cannot be
    /// expressed as markdown (dangling edges, multi-line inline content).
    pub fn serialize(&self, document: &Document) -> Result<String, TrellisError> {
        Ok(serialize(document)?)
    }

    /// Positions every node of the document under its own layout mode.
    ///
    /// Every node must carry a measured size (supplied by the rendering
    /// collaborator) before layout runs.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Layout`] for missing measured sizes or a
    /// cyclic edge set.
    pub fn layout(&self, document: &Document) -> Result<Vec<Node>, TrellisError> {
        info!(mode:% = document.layout_mode(); "Calculating layout");

        let engine = Engine::from_config(self.config.layout());
        let positioned = engine.layout(document, document.layout_mode())?;

        debug!(nodes = positioned.len(); "Layout calculated");
        Ok(positioned)
    }
}

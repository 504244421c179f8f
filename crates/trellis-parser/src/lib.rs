//! Parser for Trellis markdown documents.
//!
//! Transforms markdown text into a [`Document`] snapshot: typed nodes, parent
//! → child edges, and the layout mode named by an optional first-line
//! directive comment. The public entry point is [`parse`].
//!
//! # Pipeline Position
//!
//! ```text
//! Markdown Text
//!     ↓ lexer          — block tokens (headings, list items, fences, …)
//!     ↓ builder        — hierarchy stacks, groups, validating factories
//! Document snapshot    — nodes + edges + layout mode
//! ```
//!
//! # Failure Policy
//!
//! The parser is tolerant by design: unterminated fences become literal
//! content, malformed image lines and blank elements are dropped with a
//! warning, over-deep list indentation is clamped. [`ParseError`] is
//! reserved for structurally unrecoverable input; callers keep their
//! previous document when it occurs.

pub mod error;

mod builder;
mod lexer;


pub use error::ParseError;

use log::debug;

use trellis_core::Document;

/// Parses markdown text into a fresh document snapshot.
///
/// Node and edge identifiers are minted per parse; two parses of the same
/// text yield structurally equal documents with unrelated ids.
///
/// # Errors
///
/// Returns [`ParseError`] only for structurally unrecoverable input; see the
/// crate-level failure policy.
///
/// # Examples
///
/// ```
/// let doc = trellis_parser::parse("# Title\n- child").expect("parses");
/// assert_eq!(doc.nodes().len(), 2);
/// assert_eq!(doc.edges().len(), 1);
/// ```
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let blocks = lexer::lex(text);
    debug!(blocks = blocks.len(); "Lexed markdown into block tokens");

    let document = builder::build(blocks)?;
    debug!(
        nodes = document.nodes().len(),
        edges = document.edges().len(),
        layout_mode:% = document.layout_mode();
        "Built document snapshot"
    );

    Ok(document)
}

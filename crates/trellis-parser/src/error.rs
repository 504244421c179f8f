//! Error types for the parsing lifecycle.
//!
//! [`ParseError`] is the single error type returned by
//! [`parse`](crate::parse). The parser degrades gracefully wherever it can
//! (see the crate-level failure policy), so these variants mark input the
//! tokenizer genuinely cannot interpret, not ordinary malformed markdown.

use thiserror::Error;

use trellis_core::ValidationError;

/// Error type for the parsing lifecycle.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The tokenizer could not interpret a line at all.
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A block element produced a node the validating factories rejected.
    #[error("invalid element on line {line}: {source}")]
    Node {
        line: usize,
        #[source]
        source: ValidationError,
    },
}

impl ParseError {
    /// The 1-based source line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. } | ParseError::Node { line, .. } => *line,
        }
    }
}

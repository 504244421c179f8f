//! Error types for Trellis operations.
//!
//! This module provides the main error type [`TrellisError`] which wraps the
//! error values produced along the parse → layout → serialize pipeline.
//! Every fallible engine operation returns a discriminated error value;
//! nothing panics across the engine boundary, and callers retain their last
//! known-good snapshot when an error surfaces.

use std::io;

use thiserror::Error;

use trellis_core::ValidationError;
use trellis_parser::ParseError;

use crate::{layout::LayoutError, serialize::SerializeError};

/// The main error type for Trellis operations.
///
/// The `Parse` variant keeps the offending source text alongside the error so
/// front ends can render the failing line in context.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Serialize error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl TrellisError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

//! Error adapter for converting TrellisError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error
//! types and miette's rich diagnostic formatting used in the CLI. Parse
//! errors carry their offending source text and a line number, which is
//! turned into a labeled source span; other variants render as plain
//! diagnostics.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use trellis::{ParseError, TrellisError};

/// A reportable error that can be rendered by miette.
pub struct Reportable<'a>(pub &'a TrellisError);

impl fmt::Debug for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TrellisError::Io(_) => "trellis::io",
            TrellisError::Parse { .. } => "trellis::parse",
            TrellisError::Serialize(_) => "trellis::serialize",
            TrellisError::Layout(_) => "trellis::layout",
            TrellisError::Validation(_) => "trellis::validation",
        };
        Some(Box::new(code))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            TrellisError::Parse { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let TrellisError::Parse { err, src } = &self.0 else {
            return None;
        };
        let span = line_span(src, err.line())?;
        let label = LabeledSpan::new_primary_with_span(Some("here".to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Byte span of a 1-based line within `src`.
fn line_span(src: &str, line: usize) -> Option<(usize, usize)> {
    let mut offset = 0usize;
    for (idx, text) in src.split('\n').enumerate() {
        if idx + 1 == line {
            return Some((offset, text.len()));
        }
        offset += text.len() + 1;
    }
    None
}

/// Convert a [`TrellisError`] into a reportable error.
pub fn to_reportable(err: &TrellisError) -> Reportable<'_> {
    Reportable(err)
}

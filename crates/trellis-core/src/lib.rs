//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types for the Trellis
//! markdown-to-mind-map engine. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Style tokens**: The trailing `{.token}` annotation codec ([`style`] module)
//! - **Model**: Typed nodes, edges, and document snapshots ([`node`], [`edge`],
//!   [`document`] modules) with validating factories

pub mod document;
pub mod edge;
pub mod geometry;
pub mod identifier;
pub mod node;
pub mod style;

pub use document::{Document, LayoutMode};
pub use edge::Edge;
pub use node::{Node, NodeKind, ValidationError};

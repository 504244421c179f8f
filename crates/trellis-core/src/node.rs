//! Typed graph nodes and their validating factories.
//!
//! A [`Node`] carries the fields shared by every element of a mind-map
//! document (identifier, display content, style tokens, position, measured
//! size, group) together with a [`NodeKind`] tag holding the per-variant
//! data. Matches over `NodeKind` are exhaustive, so adding a variant is a
//! compile-visible change in the parser, serializer, and layout code.
//!
//! Nodes are constructed through the validating factories ([`Node::text`],
//! [`Node::header`], [`Node::code`], [`Node::image`]); invalid inputs are
//! reported as [`ValidationError`] values, never panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{Point, Size},
    identifier::Id,
};

/// Inclusive level range for text (list item) nodes.
pub const TEXT_LEVEL_RANGE: (u8, u8) = (1, 5);
/// Inclusive level range for header nodes.
pub const HEADER_LEVEL_RANGE: (u8, u8) = (1, 6);

/// Validation failures reported by the node and edge factories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{element} level {level} is out of range {min}..={max}")]
    LevelOutOfRange {
        element: &'static str,
        level: u8,
        min: u8,
        max: u8,
    },

    #[error("{element} content must not be empty")]
    EmptyContent { element: &'static str },

    #[error("malformed image URL {url:?}")]
    MalformedUrl { url: String },

    #[error("edge {id} connects {node} to itself")]
    SelfLoop { id: Id, node: Id },
}

/// Per-variant node data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// A list item; `level` is the nesting depth (1–5).
    Text { level: u8 },
    /// A heading; `level` is the heading depth (1–6).
    Header { level: u8 },
    /// A fenced code block with an optional language tag (empty = none).
    Code { language: String },
    /// An image; the node's content is its alt text.
    Image { url: String },
}

impl NodeKind {
    /// Short name of the variant, for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Text { .. } => "text",
            NodeKind::Header { .. } => "header",
            NodeKind::Code { .. } => "code",
            NodeKind::Image { .. } => "image",
        }
    }
}

/// A typed element of a mind-map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: Id,
    content: String,
    style: String,
    position: Point,
    measured_size: Option<Size>,
    group_id: u32,
    kind: NodeKind,
}

impl Node {
    /// Creates a text (list item) node.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `level` is outside 1–5 or `content` is
    /// blank.
    pub fn text(
        id: Id,
        content: impl Into<String>,
        level: u8,
        style: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        check_level("text", level, TEXT_LEVEL_RANGE)?;
        check_content("text", &content)?;
        Ok(Self::with_kind(id, content, style, NodeKind::Text { level }))
    }

    /// Creates a header node.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `level` is outside 1–6 or `content` is
    /// blank.
    pub fn header(
        id: Id,
        content: impl Into<String>,
        level: u8,
        style: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        check_level("header", level, HEADER_LEVEL_RANGE)?;
        check_content("header", &content)?;
        Ok(Self::with_kind(
            id,
            content,
            style,
            NodeKind::Header { level },
        ))
    }

    /// Creates a code node. The content is the literal block body; an empty
    /// body and an empty language tag are both allowed.
    pub fn code(
        id: Id,
        body: impl Into<String>,
        language: impl Into<String>,
        style: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let language = language.into().trim().to_string();
        Ok(Self::with_kind(
            id,
            body.into(),
            style,
            NodeKind::Code { language },
        ))
    }

    /// Creates an image node. The content is the alt text (may be empty).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedUrl`] when the URL is empty or
    /// contains whitespace or control characters.
    pub fn image(
        id: Id,
        alt: impl Into<String>,
        url: impl Into<String>,
        style: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let url = url.into();
        if url.is_empty() || url.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::MalformedUrl { url });
        }
        Ok(Self::with_kind(id, alt.into(), style, NodeKind::Image { url }))
    }

    fn with_kind(id: Id, content: String, style: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            content,
            style: style.into(),
            position: Point::default(),
            measured_size: None,
            group_id: 0,
            kind,
        }
    }

    /// The node's identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Display content; style tokens are already stripped.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Space-separated style token string (empty when unstyled).
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Style tokens as a list.
    pub fn style_tokens(&self) -> Vec<String> {
        self.style.split_whitespace().map(str::to_string).collect()
    }

    /// Center position on the canvas.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Measured bounding box, if the renderer has reported one.
    pub fn measured_size(&self) -> Option<Size> {
        self.measured_size
    }

    /// Thematic-break group this node belongs to.
    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    /// The variant tag and its data.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Hierarchy level for text and header nodes.
    pub fn level(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Text { level } | NodeKind::Header { level } => Some(level),
            NodeKind::Code { .. } | NodeKind::Image { .. } => None,
        }
    }

    /// Sets the group id (builder style; used during parsing).
    pub fn with_group_id(mut self, group_id: u32) -> Self {
        self.group_id = group_id;
        self
    }

    /// Sets the position (builder style).
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Sets the measured size (builder style).
    pub fn with_measured_size(mut self, size: Size) -> Self {
        self.measured_size = Some(size);
        self
    }

    /// Moves the node to a new center position.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Records the renderer-measured bounding box.
    pub fn set_measured_size(&mut self, size: Size) {
        self.measured_size = Some(size);
    }

    /// Replaces the display content, revalidating per the node's kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyContent`] for blank text/header
    /// content; code bodies and image alt text may be empty.
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), ValidationError> {
        let content = content.into();
        match self.kind {
            NodeKind::Text { .. } | NodeKind::Header { .. } => {
                check_content(self.kind.name(), &content)?;
            }
            NodeKind::Code { .. } | NodeKind::Image { .. } => {}
        }
        self.content = content;
        Ok(())
    }

    /// Replaces the style token string.
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }
}

fn check_level(element: &'static str, level: u8, (min, max): (u8, u8)) -> Result<(), ValidationError> {
    if level < min || level > max {
        return Err(ValidationError::LevelOutOfRange {
            element,
            level,
            min,
            max,
        });
    }
    Ok(())
}

fn check_content(element: &'static str, content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent { element });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    #[test]
    fn test_header_factory_accepts_full_range() {
        for level in 1..=6 {
            let node = Node::header(id("h"), "Title", level, "").unwrap();
            assert_eq!(node.level(), Some(level));
            assert_eq!(node.kind().name(), "header");
        }
    }

    #[test]
    fn test_header_level_out_of_range() {
        let err = Node::header(id("h"), "Title", 7, "").unwrap_err();
        assert_eq!(
            err,
            ValidationError::LevelOutOfRange {
                element: "header",
                level: 7,
                min: 1,
                max: 6,
            }
        );
    }

    #[test]
    fn test_text_level_out_of_range() {
        assert!(Node::text(id("t"), "item", 0, "").is_err());
        assert!(Node::text(id("t"), "item", 6, "").is_err());
        assert!(Node::text(id("t"), "item", 5, "").is_ok());
    }

    #[test]
    fn test_blank_content_rejected() {
        let err = Node::text(id("t"), "   ", 1, "").unwrap_err();
        assert_eq!(err, ValidationError::EmptyContent { element: "text" });
        assert!(Node::header(id("h"), "", 1, "").is_err());
    }

    #[test]
    fn test_code_allows_empty_body_and_language() {
        let node = Node::code(id("c"), "", "", "").unwrap();
        assert_eq!(node.content(), "");
        assert_eq!(node.kind(), &NodeKind::Code { language: String::new() });
    }

    #[test]
    fn test_image_url_validation() {
        assert!(Node::image(id("i"), "alt", "https://example.com/a.png", "").is_ok());
        assert!(Node::image(id("i"), "alt", "", "").is_err());
        assert!(Node::image(id("i"), "alt", "bad url", "").is_err());
    }

    #[test]
    fn test_image_alt_may_be_empty() {
        let node = Node::image(id("i"), "", "pic.png", "").unwrap();
        assert_eq!(node.content(), "");
    }

    #[test]
    fn test_style_tokens_round_trip() {
        let node = Node::header(id("h"), "Title", 1, "color-blue h1").unwrap();
        assert_eq!(node.style_tokens(), vec!["color-blue", "h1"]);
    }

    #[test]
    fn test_set_content_revalidates() {
        let mut node = Node::text(id("t"), "item", 1, "").unwrap();
        assert!(node.set_content("  ").is_err());
        assert_eq!(node.content(), "item");
        node.set_content("renamed").unwrap();
        assert_eq!(node.content(), "renamed");
    }
}

//! Deterministic text-based size estimation.
//!
//! The engine never measures nodes itself: measured sizes come from the
//! rendering collaborator after a node is drawn. In a headless run there is
//! no renderer, so this module stands in for it with a monospace estimate
//! driven by [`MeasureConfig`]. The estimate is deterministic, which keeps
//! CLI layout output reproducible.

use trellis::{Document, NodeKind, config::MeasureConfig, geometry::Size};

/// Fallback box for image nodes, which have no text to estimate from.
const IMAGE_SIZE: Size = Size::new(160.0, 100.0);

/// Supplies an estimated measured size for every node in the document.
pub fn measure_document(document: &mut Document, config: &MeasureConfig) {
    let ids: Vec<_> = document.nodes().iter().map(|node| node.id()).collect();
    for id in ids {
        let Some(node) = document.node(id) else {
            continue;
        };
        let size = match node.kind() {
            NodeKind::Text { .. } | NodeKind::Header { .. } => {
                estimate_text(node.content(), config)
            }
            NodeKind::Code { .. } => estimate_block(node.content(), config),
            NodeKind::Image { .. } => IMAGE_SIZE,
        };
        if let Some(node) = document.node_mut(id) {
            node.set_measured_size(size);
        }
    }
}

/// Single-line estimate for headers and list items.
fn estimate_text(content: &str, config: &MeasureConfig) -> Size {
    let chars = content.chars().count().max(1) as f32;
    Size::new(
        chars * config.char_width() + 2.0 * config.padding(),
        config.line_height() + 2.0 * config.padding(),
    )
}

/// Multi-line estimate for code bodies.
fn estimate_block(content: &str, config: &MeasureConfig) -> Size {
    let lines: Vec<&str> = content.split('\n').collect();
    let widest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(1) as f32;
    Size::new(
        widest * config.char_width() + 2.0 * config.padding(),
        lines.len().max(1) as f32 * config.line_height() + 2.0 * config.padding(),
    )
}

#[cfg(test)]
mod tests {
    use trellis::parse;

    use super::*;

    #[test]
    fn test_every_node_gets_a_size() {
        let mut document = parse("# A\n- b\n```\ncode\n```\n![i](u.png)").unwrap();
        measure_document(&mut document, &MeasureConfig::default());

        for node in document.nodes() {
            assert!(node.measured_size().is_some(), "unmeasured {}", node.id());
        }
    }

    #[test]
    fn test_longer_content_is_wider() {
        let config = MeasureConfig::default();
        let short = estimate_text("ab", &config);
        let long = estimate_text("a much longer label", &config);
        assert!(long.width() > short.width());
        assert_eq!(long.height(), short.height());
    }

    #[test]
    fn test_code_height_scales_with_lines() {
        let config = MeasureConfig::default();
        let one = estimate_block("a", &config);
        let three = estimate_block("a\nb\nc", &config);
        assert!(three.height() > one.height());
    }
}

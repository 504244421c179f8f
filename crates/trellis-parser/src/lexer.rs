//! Line-oriented block tokenizer for markdown input.
//!
//! Splits source text into [`Block`] tokens: headings, list items, fenced
//! code blocks, images, thematic breaks, and the optional first-line layout
//! directive. Structured line shapes (directive comment, heading marker,
//! list marker, image syntax) are recognized with [`winnow`] parsers; the
//! fence state machine and line walking are plain iteration.
//!
//! Blank lines and lines matching no block syntax produce no token. The
//! lexer never fails: irregular input degrades (an unterminated fence takes
//! the remainder of the document as literal body).

use log::{trace, warn};
use winnow::{
    ModalResult, Parser,
    ascii::space0,
    error::{ContextError, ErrMode},
    token::{rest, take_till, take_until, take_while},
};

use trellis_core::LayoutMode;
use trellis_core::node::TEXT_LEVEL_RANGE;

/// A block element recognized in the source text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Block {
    /// First-line layout directive comment.
    Directive(LayoutMode),
    /// `#`–`######` heading; `text` is raw (style tokens not yet extracted).
    Heading { line: usize, depth: u8, text: String },
    /// `- ` list item; depth derived from 2-space indentation, clamped to 1–5.
    ListItem { line: usize, depth: u8, text: String },
    /// Fenced code block; `info` is the raw fence info string.
    Fence {
        line: usize,
        info: String,
        body: String,
        terminated: bool,
    },
    /// A line starting with `![`; raw text, parsed fully by the builder.
    Image { line: usize, text: String },
    /// Thematic break (`---`).
    Break { line: usize },
}

/// Tokenizes source text into block elements.
pub(crate) fn lex(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut directive_window = true;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let line_no = i + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            i += 1;
            continue;
        }

        // Only the first non-blank line can be the layout directive; later
        // comment lines fall through to the unrecognized case below.
        if directive_window {
            directive_window = false;
            if let Ok(mode) = directive.parse(trimmed) {
                blocks.push(Block::Directive(mode));
                i += 1;
                continue;
            }
        }

        if let Some(info) = fence_open(line) {
            let mut body_lines = Vec::new();
            let mut terminated = false;
            let mut j = i + 1;
            while j < lines.len() {
                if fence_close(lines[j]) {
                    terminated = true;
                    break;
                }
                body_lines.push(lines[j]);
                j += 1;
            }
            if !terminated {
                warn!(line = line_no; "Unterminated code fence; taking remainder as literal content");
            }
            blocks.push(Block::Fence {
                line: line_no,
                info: info.to_string(),
                body: body_lines.join("\n"),
                terminated,
            });
            i = if terminated { j + 1 } else { j };
            continue;
        }

        if is_thematic_break(trimmed) {
            blocks.push(Block::Break { line: line_no });
            i += 1;
            continue;
        }

        if let Ok((depth, text)) = heading.parse(line) {
            blocks.push(Block::Heading {
                line: line_no,
                depth,
                text,
            });
            i += 1;
            continue;
        }

        if let Ok((indent, text)) = list_item.parse(line) {
            blocks.push(Block::ListItem {
                line: line_no,
                depth: list_depth(indent, line_no),
                text,
            });
            i += 1;
            continue;
        }

        if trimmed.starts_with("![") {
            blocks.push(Block::Image {
                line: line_no,
                text: trimmed.to_string(),
            });
            i += 1;
            continue;
        }

        trace!(line = line_no; "Skipping unrecognized line");
        i += 1;
    }

    blocks
}

/// Parses `![alt](url)` image syntax covering the whole input.
pub(crate) fn parse_image(text: &str) -> Option<(String, String)> {
    image.parse(text).ok()
}

/// `<!-- … -->` comment naming a layout mode.
fn directive(input: &mut &str) -> ModalResult<LayoutMode> {
    let _ = "<!--".parse_next(input)?;
    let body = take_until(0.., "-->").parse_next(input)?;
    let _ = "-->".parse_next(input)?;
    space0.parse_next(input)?;

    // `horizontal` is checked first: it contains no other mode name, while a
    // custom comment could mention both.
    if body.contains("horizontal") {
        Ok(LayoutMode::Horizontal)
    } else if body.contains("radial") {
        Ok(LayoutMode::Radial)
    } else {
        Err(ErrMode::Backtrack(ContextError::new()))
    }
}

/// `#`–`######` followed by a space; returns (depth, trimmed text).
fn heading(input: &mut &str) -> ModalResult<(u8, String)> {
    let hashes: &str = take_while(1..=6, '#').parse_next(input)?;
    let _ = ' '.parse_next(input)?;
    let text: &str = rest.parse_next(input)?;
    Ok((hashes.len() as u8, text.trim().to_string()))
}

/// Space-indented `- ` marker; returns (indent width, trimmed text).
fn list_item(input: &mut &str) -> ModalResult<(usize, String)> {
    let indent: &str = take_while(0.., ' ').parse_next(input)?;
    let _ = "- ".parse_next(input)?;
    let text: &str = rest.parse_next(input)?;
    Ok((indent.len(), text.trim().to_string()))
}

/// `![alt](url)`, anchored to the whole line by the caller via `parse`.
fn image(input: &mut &str) -> ModalResult<(String, String)> {
    let _ = "![".parse_next(input)?;
    let alt: &str = take_till(0.., ']').parse_next(input)?;
    let _ = "](".parse_next(input)?;
    let url: &str = take_till(0.., ')').parse_next(input)?;
    let _ = ')'.parse_next(input)?;
    Ok((alt.to_string(), url.trim().to_string()))
}

fn fence_open(line: &str) -> Option<&str> {
    line.strip_prefix("```").map(str::trim)
}

fn fence_close(line: &str) -> bool {
    line.trim() == "```"
}

fn is_thematic_break(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

/// Indentation depth: 2-space multiples, 1-based, clamped to the text level
/// range.
fn list_depth(indent: usize, line: usize) -> u8 {
    let (min, max) = TEXT_LEVEL_RANGE;
    let depth = (indent / 2) + 1;
    if depth > max as usize {
        warn!(line, depth; "Clamping over-deep list item");
        return max;
    }
    (depth as u8).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_line() {
        assert_eq!(
            heading.parse("## Section title").unwrap(),
            (2, "Section title".to_string())
        );
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        assert!(heading.parse("####### too deep").is_err());
    }

    #[test]
    fn test_heading_requires_space() {
        assert!(heading.parse("#tight").is_err());
    }

    #[test]
    fn test_list_item_indent() {
        assert_eq!(list_item.parse("- top").unwrap(), (0, "top".to_string()));
        assert_eq!(
            list_item.parse("    - deep").unwrap(),
            (4, "deep".to_string())
        );
    }

    #[test]
    fn test_list_depth_clamps() {
        assert_eq!(list_depth(0, 1), 1);
        assert_eq!(list_depth(2, 1), 2);
        assert_eq!(list_depth(8, 1), 5);
        assert_eq!(list_depth(12, 1), 5);
    }

    #[test]
    fn test_directive_modes() {
        assert_eq!(
            directive.parse("<!-- layout: radial -->").unwrap(),
            LayoutMode::Radial
        );
        assert_eq!(
            directive.parse("<!-- layout: horizontal -->").unwrap(),
            LayoutMode::Horizontal
        );
        assert_eq!(
            directive.parse("<!--horizontal-->").unwrap(),
            LayoutMode::Horizontal
        );
        assert!(directive.parse("<!-- just a comment -->").is_err());
        assert!(directive.parse("# radial").is_err());
    }

    #[test]
    fn test_image_syntax() {
        assert_eq!(
            parse_image("![alt text](pic.png)"),
            Some(("alt text".to_string(), "pic.png".to_string()))
        );
        assert_eq!(parse_image("![](u.png)"), Some((String::new(), "u.png".to_string())));
        assert_eq!(parse_image("![unclosed](u.png) trailing"), None);
        assert_eq!(parse_image("not an image"), None);
    }

    #[test]
    fn test_fence_collects_body() {
        let blocks = lex("```rust\nfn main() {}\nlet x = 1;\n```\n# After");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::Fence {
                line: 1,
                info: "rust".to_string(),
                body: "fn main() {}\nlet x = 1;".to_string(),
                terminated: true,
            }
        );
    }

    #[test]
    fn test_unterminated_fence_takes_remainder() {
        let blocks = lex("```\nline one\nline two");
        assert_eq!(
            blocks[0],
            Block::Fence {
                line: 1,
                info: String::new(),
                body: "line one\nline two".to_string(),
                terminated: false,
            }
        );
    }

    #[test]
    fn test_directive_only_on_first_non_blank_line() {
        let blocks = lex("\n\n<!-- radial -->\n# A");
        assert_eq!(blocks[0], Block::Directive(LayoutMode::Radial));

        let late = lex("# A\n<!-- horizontal -->");
        assert_eq!(late.len(), 1, "late comment is not a directive");
    }

    #[test]
    fn test_blank_and_unrecognized_lines_skipped() {
        let blocks = lex("plain paragraph\n\n  indented prose\n# Real");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Heading { depth: 1, .. }));
    }

    #[test]
    fn test_thematic_break_variants() {
        assert_eq!(lex("---").len(), 1);
        assert_eq!(lex("-----").len(), 1);
        assert!(matches!(lex("---")[0], Block::Break { .. }));
        // Two hyphens is not a break, and not anything else either.
        assert!(lex("--").is_empty());
    }
}

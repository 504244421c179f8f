//! Trailing style-token annotations.
//!
//! Block elements may carry a single trailing brace block of dot-prefixed
//! class tokens, e.g. `# Title {.color-blue .h1}`. This module extracts the
//! tokens from raw element text and restores them canonically when
//! serializing.
//!
//! Only the *last trailing* block is recognized. Brace text anywhere else on
//! the line — earlier blocks, mid-line braces, malformed blocks — is left in
//! the content untouched.

/// Result of splitting element text into display content and style tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedStyle {
    /// Display text with the trailing token block (and the whitespace before
    /// it) removed.
    pub content: String,
    /// The extracted tokens, without their leading dots.
    pub tokens: Vec<String>,
}

/// Splits `text` into display content and trailing style tokens.
///
/// Returns the input unchanged with an empty token list when no valid
/// trailing block is present.
///
/// # Examples
///
/// ```
/// use trellis_core::style::extract_style_tokens;
///
/// let extracted = extract_style_tokens("Title {.color-blue .h1}");
/// assert_eq!(extracted.content, "Title");
/// assert_eq!(extracted.tokens, vec!["color-blue", "h1"]);
/// ```
pub fn extract_style_tokens(text: &str) -> ExtractedStyle {
    let trimmed = text.trim_end();

    let unchanged = || ExtractedStyle {
        content: text.to_string(),
        tokens: Vec::new(),
    };

    if !trimmed.ends_with('}') {
        return unchanged();
    }
    let Some(open) = trimmed.rfind('{') else {
        return unchanged();
    };

    let inner = &trimmed[open + 1..trimmed.len() - 1];
    let Some(tokens) = parse_token_list(inner) else {
        return unchanged();
    };

    ExtractedStyle {
        content: trimmed[..open].trim_end().to_string(),
        tokens,
    }
}

/// Reattaches style tokens to display content.
///
/// Returns `content` unchanged when `tokens` is empty, otherwise appends the
/// canonical ` {.tok1 .tok2}` suffix. Inverse of [`extract_style_tokens`]:
/// for content free of trailing brace text and valid token identifiers,
/// `extract_style_tokens(restore_style_tokens(c, t))` yields `(c, t)` again.
pub fn restore_style_tokens(content: &str, tokens: &[String]) -> String {
    if tokens.is_empty() {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len() + 4 + tokens.len() * 8);
    out.push_str(content);
    if !content.is_empty() {
        out.push(' ');
    }
    out.push('{');
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push('.');
        out.push_str(token);
    }
    out.push('}');
    out
}

/// Parses `.a .b .c` into token names; `None` if the block is not a pure
/// token list. The empty block `{}` is not a style block.
fn parse_token_list(inner: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    for word in inner.split_whitespace() {
        let name = word.strip_prefix('.')?;
        if name.is_empty() || !name.chars().all(is_token_char) {
            return None;
        }
        tokens.push(name.to_string());
    }
    if tokens.is_empty() { None } else { Some(tokens) }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

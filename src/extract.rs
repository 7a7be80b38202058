//! Annotation block extraction.
//!
//! Finds `@Reference(...)` and `@References(...)` literals in documentation
//! text, such as the `<pre>` blocks javadoc emits above a class or method.

use once_cell::sync::Lazy;
use regex::Regex;

/// Annotation markers, optionally package-qualified. Group 1 is the name.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(?:[A-Za-z_$][\w$]*\.)*(References?)\s*\(").expect("valid marker regex")
});

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").expect("valid entity regex")
});

/// Which annotation a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A single `@Reference(...)`.
    Single,
    /// An `@References(references={...})` list.
    List,
}

/// One annotation literal found in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationBlock {
    pub kind: BlockKind,
    /// The literal text, from `@` to the closing parenthesis.
    pub raw: String,
    /// Start and end byte positions in the source text
    pub span: (usize, usize),
}

/// Returns the byte index just past the `)` that closes the `(` at `open`.
///
/// Double-quoted strings are skipped, honoring backslash escapes.
fn find_closing_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extracts all annotation blocks from the given text, in document order.
///
/// A `@Reference` nested inside an `@References` list belongs to the list
/// block and is not reported on its own. A marker whose parentheses never
/// close is skipped.
///
/// # Examples
///
/// ```
/// use citedoc::{extract_blocks, BlockKind};
///
/// let blocks = extract_blocks(
///     r#"<pre>@Reference(type=Misc, title="T", year="1")
/// public class Foo</pre>"#,
/// );
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].kind, BlockKind::Single);
/// assert_eq!(blocks[0].raw, r#"@Reference(type=Misc, title="T", year="1")"#);
/// ```
pub fn extract_blocks(text: &str) -> Vec<AnnotationBlock> {
    let mut blocks = Vec::new();
    let mut search_from = 0;

    while let Some(cap) = MARKER_RE.captures_at(text, search_from) {
        let (Some(full), Some(name)) = (cap.get(0), cap.get(1)) else {
            break;
        };
        let open = full.end() - 1;

        match find_closing_paren(text, open) {
            Some(end) => {
                let kind = if name.as_str() == "References" {
                    BlockKind::List
                } else {
                    BlockKind::Single
                };
                tracing::debug!(start = full.start(), end, ?kind, "found annotation block");
                blocks.push(AnnotationBlock {
                    kind,
                    raw: text[full.start()..end].to_string(),
                    span: (full.start(), end),
                });
                search_from = end;
            }
            None => {
                tracing::warn!(
                    offset = full.start(),
                    "skipping @{} with no closing parenthesis",
                    name.as_str()
                );
                search_from = full.end();
            }
        }
    }

    blocks
}

fn decode_entity(entity: &str) -> Option<String> {
    let decoded = match entity {
        "quot" => '"',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}

/// Reduces an HTML page to its text: tags are removed and character entities
/// decoded, so `<a href="Reference.html">@Reference</a>(` reads as
/// `@Reference(`. Unknown entities are left untouched.
pub fn html_to_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, "");
    ENTITY_RE
        .replace_all(&stripped, |caps: &regex::Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

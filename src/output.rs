//! Output generation for parsed citation blocks.
//!
//! This module handles replacing annotation blocks in the original text,
//! rendering record sequences in each output format, and assembling the
//! tabbed bibliography container.

use crate::annotation::to_annotation;
use crate::bibtex::to_bibtex;
use crate::format::OutputFormat;
use crate::processor::ProcessedBlock;
use crate::record::CitationRecord;
use crate::text::{to_html, to_text};

/// Group id used for class-level annotations and unnamed members.
pub const MASTER_GROUP: &str = "master";

/// A block together with the text that replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    /// The span in the original text where this block was found
    pub original_span: (usize, usize),
    pub formatted: String,
}

/// Replaces annotation blocks in the text with their rendering.
///
/// Replacements are performed from the end of the text towards the beginning
/// so that earlier spans stay valid.
pub fn replace_blocks(text: &str, rendered: &[RenderedBlock]) -> String {
    if rendered.is_empty() {
        return text.to_string();
    }

    let mut sorted: Vec<_> = rendered.iter().collect();
    sorted.sort_by(|a, b| b.original_span.0.cmp(&a.original_span.0));

    let mut result = text.to_string();
    for block in sorted {
        let (start, end) = block.original_span;
        result.replace_range(start..end, &block.formatted);
    }

    result
}

/// Renders a sequence of records in the given format.
///
/// # Errors
///
/// Only the json format can fail, when serialization does.
pub fn render_records(
    records: &[CitationRecord],
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    let rendered = match format {
        OutputFormat::Text => records
            .iter()
            .map(|r| format!("{}\n", to_text(r).trim_end()))
            .collect(),
        OutputFormat::Html => records
            .iter()
            .map(|r| format!("<span class='textReference'>{}</span>\n", to_html(r)))
            .collect(),
        OutputFormat::Bibtex => records
            .iter()
            .map(to_bibtex)
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Annotation => records
            .iter()
            .map(to_annotation)
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            json
        }
    };

    Ok(rendered)
}

/// Escapes text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Derives a group id from a documented member's name.
///
/// Characters outside `A-Za-z0-9@*_+-/` become their hexadecimal code,
/// `.` becomes `-`, and an empty name maps to [`MASTER_GROUP`].
///
/// # Examples
///
/// ```
/// use citedoc::group_id;
///
/// assert_eq!(group_id("process(java.lang.String)"), "process28java-lang-String29");
/// assert_eq!(group_id(""), "master");
/// ```
pub fn group_id(name: &str) -> String {
    if name.is_empty() {
        return MASTER_GROUP.to_string();
    }

    let mut id = String::with_capacity(name.len());
    for unit in name.encode_utf16() {
        match char::from_u32(u32::from(unit)) {
            Some('.') => id.push('-'),
            Some(c) if c.is_ascii_alphanumeric() || "@*_+-/".contains(c) => id.push(c),
            _ if unit < 0x100 => id.push_str(&format!("{:02X}", unit)),
            _ => id.push_str(&format!("u{:04X}", unit)),
        }
    }
    id
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Group {
    id: String,
    text: Vec<String>,
    bibtex: Vec<String>,
    annotations: Vec<String>,
}

/// Bibliography groups, keyed by id in first-seen order.
///
/// Each group collects three views of its blocks: citation text, BibTeX
/// entries and the annotation literals as written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bibliography {
    groups: Vec<Group>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a processed block to the group with the given id, creating the
    /// group on first use.
    pub fn add_block(&mut self, id: &str, block: &ProcessedBlock) {
        let index = match self.groups.iter().position(|g| g.id == id) {
            Some(index) => index,
            None => {
                tracing::debug!(id, "new bibliography group");
                self.groups.push(Group {
                    id: id.to_string(),
                    ..Group::default()
                });
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[index];
        for record in &block.records {
            group.text.push(to_html(record));
            group.bibtex.push(to_bibtex(record));
        }
        group.annotations.push(block.raw.clone());
    }

    /// Group ids in the order they were first seen.
    pub fn ids(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Builds one tabbed container per group, joined by newlines.
    pub fn to_html(&self) -> String {
        self.groups
            .iter()
            .map(container_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn pre(content: &str) -> String {
    format!("<pre style='font-size: small'>{}</pre>", escape_html(content))
}

fn container_html(group: &Group) -> String {
    let id = escape_html(&group.id);
    let mut html = String::new();

    html.push_str(&format!("<div class='references' id='{}-references'>", id));
    html.push_str("<b>Bibliography:</b>");
    html.push_str("<ul>");
    html.push_str(&format!("<li><a href='#{}-tab-1'>Plain Text</a></li>", id));
    html.push_str(&format!("<li><a href='#{}-tab-2'>BibTex</a></li>", id));
    html.push_str(&format!(
        "<li><a href='#{}-tab-3'>OpenIMAJ Annotation</a></li>",
        id
    ));
    html.push_str("</ul>");

    html.push_str(&format!("<div id='{}-tab-1'>", id));
    html.push_str(&format!("<span id='{}-plainTextRefs'>", id));
    for text in &group.text {
        html.push_str(&format!("<span class='textReference'>{}</span>", text));
    }
    html.push_str("</span></div>");

    html.push_str(&format!("<div id='{}-tab-2'>", id));
    html.push_str(&format!("<span id='{}-bibtexRefs'>", id));
    for bibtex in &group.bibtex {
        html.push_str(&pre(bibtex));
    }
    html.push_str("</span></div>");

    html.push_str(&format!("<div id='{}-tab-3'>", id));
    html.push_str(&format!("<span id='{}-annotationRefs'>", id));
    for annotation in &group.annotations {
        html.push_str(&pre(annotation));
    }
    html.push_str("</span></div>");

    html.push_str("</div>");
    html
}

//! Output format registry.

/// The renderings `citedoc` can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain citation text, one record per line.
    Text,
    /// The tabbed bibliography container.
    Html,
    Bibtex,
    /// Canonical `@Reference(...)` literals.
    Annotation,
    Json,
}

/// Single source of truth for builtin formats: (name, format, description).
const BUILTIN_FORMATS: &[(&str, OutputFormat, &str)] = &[
    ("text", OutputFormat::Text, "plain citation text"),
    ("html", OutputFormat::Html, "tabbed bibliography container"),
    ("bibtex", OutputFormat::Bibtex, "BibTeX entries"),
    ("annotation", OutputFormat::Annotation, "canonical @Reference literals"),
    ("json", OutputFormat::Json, "records as a JSON array"),
];

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        BUILTIN_FORMATS
            .iter()
            .find(|(_, format, _)| format == self)
            .map(|(name, _, _)| *name)
            .unwrap_or("unknown")
    }

    /// Whether a document can be rewritten in place with this rendering.
    pub fn supports_inline(&self) -> bool {
        !matches!(self, OutputFormat::Html | OutputFormat::Json)
    }
}

/// Returns a builtin output format by name.
pub fn builtin_format(name: &str) -> Option<OutputFormat> {
    BUILTIN_FORMATS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, format, _)| *format)
}

/// Returns the list of available builtin format names.
pub fn builtin_format_names() -> Vec<&'static str> {
    BUILTIN_FORMATS.iter().map(|(n, _, _)| *n).collect()
}

/// Returns (name, description) pairs for every builtin format.
pub fn builtin_format_descriptions() -> Vec<(&'static str, &'static str)> {
    BUILTIN_FORMATS.iter().map(|(n, _, d)| (*n, *d)).collect()
}

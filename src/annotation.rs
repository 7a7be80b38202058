//! Canonical `@Reference(...)` rendering of a record.
//!
//! The output is the annotation a developer would paste above a class, and it
//! parses back with [`crate::parse_reference`].

use crate::record::CitationRecord;

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn quote_list(values: &[String]) -> String {
    if values.is_empty() {
        return "{ }".to_string();
    }
    let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("{{ {} }}", quoted.join(", "))
}

/// Renders a record as a `@Reference` annotation literal.
///
/// # Examples
///
/// ```
/// use citedoc::{to_annotation, CitationRecord, ReferenceType};
///
/// let mut record = CitationRecord::new(ReferenceType::Article, "A Study", "2020");
/// record.author = vec!["Smith, J.".to_string()];
/// assert_eq!(
///     to_annotation(&record),
///     "@Reference(\n\ttype = ReferenceType.Article,\n\tauthor = { \"Smith, J.\" },\n\ttitle = \"A Study\",\n\tyear = \"2020\"\n)\n"
/// );
/// ```
pub fn to_annotation(record: &CitationRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("\ttype = ReferenceType.{}", record.kind.constant_name()));
    lines.push(format!("\tauthor = {}", quote_list(&record.author)));
    lines.push(format!("\ttitle = {}", quote(&record.title)));
    lines.push(format!("\tyear = {}", quote(&record.year)));

    push_text(&mut lines, "journal", &record.journal);
    push_text(&mut lines, "booktitle", &record.booktitle);
    if !record.pages.is_empty() {
        lines.push(format!("\tpages = {}", quote_list(&record.pages)));
    }
    push_text(&mut lines, "chapter", &record.chapter);
    push_text(&mut lines, "edition", &record.edition);
    push_text(&mut lines, "url", &record.url);
    push_text(&mut lines, "note", &record.note);
    if !record.editor.is_empty() {
        lines.push(format!("\teditor = {}", quote_list(&record.editor)));
    }
    push_text(&mut lines, "institution", &record.institution);
    push_text(&mut lines, "month", &record.month);
    push_text(&mut lines, "number", &record.number);
    push_text(&mut lines, "organization", &record.organization);
    push_text(&mut lines, "publisher", &record.publisher);
    push_text(&mut lines, "school", &record.school);
    push_text(&mut lines, "series", &record.series);
    push_text(&mut lines, "volume", &record.volume);

    if record.custom_data.len() > 1 {
        let pairs: Vec<String> = record
            .custom_data_pairs()
            .map(|(k, v)| format!("\t\t{}, {}", quote(k), quote(v)))
            .collect();
        lines.push(format!("\tcustomData = {{\n{}\n\t}}", pairs.join(",\n")));
    }

    format!("@Reference(\n{}\n)\n", lines.join(",\n"))
}

fn push_text(lines: &mut Vec<String>, key: &str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
        lines.push(format!("\t{} = {}", key, quote(value)));
    }
}

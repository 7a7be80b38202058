//! BibTeX rendering of citation records.

use crate::record::{has_names, CitationRecord};

/// Key used when a record has no authors to derive one from.
pub const FALLBACK_KEY: &str = "OpenIMAJ-1";

/// Derives the BibTeX key: first author's surname followed by the year.
///
/// The surname is the text before the first comma, or the text after the
/// last space when the name has no comma.
///
/// # Examples
///
/// ```
/// use citedoc::{make_key, CitationRecord, ReferenceType};
///
/// let mut record = CitationRecord::new(ReferenceType::Article, "A Study", "2020");
/// assert_eq!(make_key(&record), "OpenIMAJ-1");
///
/// record.author = vec!["Smith, John".to_string()];
/// assert_eq!(make_key(&record), "Smith2020");
/// ```
pub fn make_key(record: &CitationRecord) -> String {
    if !has_names(&record.author) {
        return FALLBACK_KEY.to_string();
    }

    let first = &record.author[0];
    let last_name = match first.find(',') {
        Some(comma) => &first[..comma],
        None => first.rsplit(' ').next().unwrap_or(first),
    };

    format!("{}{}", last_name, record.year)
}

fn append_names(builder: &mut String, key: &str, names: &[String]) {
    if !has_names(names) {
        return;
    }

    let joined: Vec<String> = names.iter().map(|n| format!("{{{}}}", n)).collect();
    builder.push_str(&format!(" {} = {{{}}}\n", key, joined.join(" and ")));
}

fn append_field(builder: &mut String, key: &str, value: &str) {
    builder.push_str(&format!(" {} = {{{}}}\n", key, value));
}

/// Appends a text field when it is present and has content.
fn append_text(builder: &mut String, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            append_field(builder, key, value);
        }
    }
}

/// Appends `number`/`volume`: present and not the empty string.
fn append_numeric(builder: &mut String, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        if value != "" {
            append_field(builder, key, value);
        }
    }
}

fn format_pages(pages: &[String]) -> String {
    match pages {
        [page] => page.clone(),
        [first, last] => format!("{}--{}", first, last),
        many => many.join(", "),
    }
}

/// Renders a record as a BibTeX entry keyed by [`make_key`].
///
/// Fields appear in a fixed order: author, title, year, journal, booktitle,
/// pages, chapter, edition, url, note, editor, institution, month, number,
/// organization, publisher, school, series, volume, then custom data.
pub fn to_bibtex(record: &CitationRecord) -> String {
    format_bibtex(record, &make_key(record))
}

/// Renders a record as a BibTeX entry with the given key.
pub fn format_bibtex(record: &CitationRecord, key: &str) -> String {
    let mut builder = String::new();

    builder.push_str(&format!("@{}{{{}\n", record.kind.as_str(), key));
    append_names(&mut builder, "author", &record.author);

    append_field(&mut builder, "title", &record.title);
    append_field(&mut builder, "year", &record.year);

    append_text(&mut builder, "journal", &record.journal);
    append_text(&mut builder, "booktitle", &record.booktitle);
    if !record.pages.is_empty() {
        append_field(&mut builder, "pages", &format_pages(&record.pages));
    }

    append_text(&mut builder, "chapter", &record.chapter);
    append_text(&mut builder, "edition", &record.edition);
    append_text(&mut builder, "url", &record.url);
    append_text(&mut builder, "note", &record.note);

    append_names(&mut builder, "editor", &record.editor);

    append_text(&mut builder, "institution", &record.institution);
    append_text(&mut builder, "month", &record.month);
    append_numeric(&mut builder, "number", &record.number);
    append_text(&mut builder, "organization", &record.organization);
    append_text(&mut builder, "publisher", &record.publisher);
    append_text(&mut builder, "school", &record.school);
    append_text(&mut builder, "series", &record.series);
    append_numeric(&mut builder, "volume", &record.volume);

    if record.custom_data.len() > 1 {
        for (key, value) in record.custom_data_pairs() {
            append_field(&mut builder, key, value);
        }
    }

    builder.push_str("}\n");
    builder
}

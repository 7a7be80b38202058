//! Human-readable citation rendering.
//!
//! The same layout is produced in two flavors: [`to_text`] gives plain text
//! with LaTeX escapes turned into Unicode, [`to_html`] wraps each part in a
//! styling `<span>` and turns LaTeX escapes into HTML entities.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{has_names, CitationRecord};

/// LaTeX escapes and the (HTML, plain text) replacement for each, in order.
static NORMALISATIONS: Lazy<Vec<(Regex, &'static str, &'static str)>> = Lazy::new(|| {
    let table: &[(&str, &str, &str)] = &[
        (r"\\glqq\s?", "&bdquo;", "\u{201E}"),
        (r"\\grqq\s?", "&rdquo;", "\u{201D}"),
        (r"\\ ", "&nbsp;", "\u{00A0}"),
        (r"\\url", "", ""),
        (r"---", "&mdash;", "\u{2014}"),
        (r#"\\"a"#, "&auml;", "ä"),
        (r#"\\"o"#, "&ouml;", "ö"),
        (r#"\\"u"#, "&uuml;", "ü"),
        (r#"\\"A"#, "&Auml;", "Ä"),
        (r#"\\"O"#, "&Ouml;", "Ö"),
        (r#"\\"U"#, "&Uuml;", "Ü"),
        (r"\\ss", "&szlig;", "ß"),
    ];
    table
        .iter()
        .filter_map(|(pattern, html, plain)| {
            Regex::new(pattern).ok().map(|re| (re, *html, *plain))
        })
        .collect()
});

/// Output flavor for the text renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Plain,
    Html,
}

impl Flavor {
    fn span(self, out: &mut String, class: &str, content: &str) {
        match self {
            Flavor::Plain => out.push_str(content),
            Flavor::Html => {
                out.push_str("<span class='");
                out.push_str(class);
                out.push_str("'>");
                out.push_str(content);
                out.push_str("</span>");
            }
        }
    }

    fn link(self, out: &mut String, url: &str) {
        match self {
            Flavor::Plain => out.push_str(url),
            Flavor::Html => {
                out.push_str("<a class='url' href='");
                out.push_str(url);
                out.push_str("'>");
                out.push_str(url);
                out.push_str("</a>");
            }
        }
    }
}

/// Replaces LaTeX escapes with HTML entities.
pub fn normalise_html(value: &str) -> String {
    normalise(value, Flavor::Html)
}

/// Replaces LaTeX escapes with Unicode characters.
pub fn normalise_plain(value: &str) -> String {
    normalise(value, Flavor::Plain)
}

fn normalise(value: &str, flavor: Flavor) -> String {
    NORMALISATIONS
        .iter()
        .fold(value.to_string(), |acc, (re, html, plain)| {
            let replacement = match flavor {
                Flavor::Html => *html,
                Flavor::Plain => *plain,
            };
            re.replace_all(&acc, regex::NoExpand(replacement)).into_owned()
        })
}

/// Abbreviates a name to initials and surname.
///
/// `"Hare, Jonathon S."` and `"Jonathon S. Hare"` both become `"J. S. Hare"`.
pub fn format_name(name: &str) -> String {
    let mut formatted = String::new();

    if let Some(comma) = name.find(',') {
        let (last_name, rest) = name.split_at(comma);
        for given in rest[1..].split(' ') {
            if let Some(initial) = given.trim().chars().next() {
                formatted.push(initial);
                formatted.push_str(". ");
            }
        }
        formatted.push_str(last_name);
    } else {
        let mut parts: Vec<&str> = name.split(' ').collect();
        let last_name = parts.pop().unwrap_or_default();
        for part in &parts {
            if let Some(initial) = part.trim().chars().next() {
                formatted.push(initial);
            }
            formatted.push_str(". ");
        }
        formatted.push_str(last_name);
    }

    formatted
}

/// Renders the author list: `"A. B. and C. D. "`.
fn append_names(authors: &[String]) -> String {
    if !has_names(authors) {
        return String::new();
    }

    if let [only] = authors {
        return format!("{}. ", format_name(only));
    }

    let (leading, last_two) = authors.split_at(authors.len() - 2);
    let mut builder = String::new();
    for name in leading {
        builder.push_str(&format_name(name));
        builder.push_str(", ");
    }
    builder.push_str(&format_name(&last_two[0]));
    builder.push_str(" and ");
    builder.push_str(&format_name(&last_two[1]));
    builder.push_str(". ");
    builder
}

/// Renders the page list: `p12. `, `pp12-15. ` or `pp1, 2, 3. `.
fn format_pages(pages: &[String]) -> String {
    match pages {
        [] => String::new(),
        [page] => format!("p{}. ", page),
        [first, last] => format!("pp{}-{}. ", first, last),
        many => format!("pp{}. ", many.join(", ")),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn render(record: &CitationRecord, flavor: Flavor) -> String {
    let mut builder = String::new();

    flavor.span(&mut builder, "authors", &append_names(&record.author));

    let title_end = if record.title.ends_with('.') { " " } else { ". " };
    flavor.span(
        &mut builder,
        "title",
        &format!("{}{}", record.title, title_end),
    );

    let venues = [
        ("journal", &record.journal),
        ("booktitle", &record.booktitle),
        ("institution", &record.institution),
        ("school", &record.school),
        ("publisher", &record.publisher),
        ("organization", &record.organization),
    ];
    for (class, value) in venues {
        if let Some(value) = non_empty(value) {
            flavor.span(&mut builder, class, &format!("{}. ", value));
        }
    }

    if !record.pages.is_empty() {
        flavor.span(&mut builder, "pages", &format_pages(&record.pages));
    }

    if let Some(month) = non_empty(&record.month) {
        flavor.span(&mut builder, "month", &format!("{}, ", month));
    }
    flavor.span(&mut builder, "year", &format!("{}. ", record.year));

    if let Some(url) = non_empty(&record.url) {
        flavor.link(&mut builder, url);
    }

    normalise(&builder, flavor)
}

/// Renders a record as plain citation text.
///
/// # Examples
///
/// ```
/// use citedoc::{parse_reference, to_text};
///
/// let record = parse_reference(
///     r#"@Reference(type=Article, author="Smith, John", title="A Study", journal="J. Tests", year="2020", pages={"12", "15"})"#,
/// ).unwrap();
/// assert_eq!(to_text(&record), "J. Smith. A Study. J. Tests. pp12-15. 2020. ");
/// ```
pub fn to_text(record: &CitationRecord) -> String {
    render(record, Flavor::Plain)
}

/// Renders a record as citation text marked up with `<span class='...'>`
/// elements (`authors`, `title`, `journal`, ..., `year`) and an
/// `<a class='url'>` link.
pub fn to_html(record: &CitationRecord) -> String {
    render(record, Flavor::Html)
}

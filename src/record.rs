//! The citation record produced by the parser and consumed by the formatters.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The kind of publication a reference describes.
///
/// Mirrors the BibTeX entry types. Parsing is case-insensitive and accepts a
/// qualified form such as `ReferenceType.Article`; rendering is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    Article,
    Book,
    Booklet,
    Conference,
    Inbook,
    Incollection,
    Inproceedings,
    Manual,
    Mastersthesis,
    Misc,
    Phdthesis,
    Proceedings,
    Techreport,
    Unpublished,
}

/// Every reference type, in declaration order.
const ALL_TYPES: &[ReferenceType] = &[
    ReferenceType::Article,
    ReferenceType::Book,
    ReferenceType::Booklet,
    ReferenceType::Conference,
    ReferenceType::Inbook,
    ReferenceType::Incollection,
    ReferenceType::Inproceedings,
    ReferenceType::Manual,
    ReferenceType::Mastersthesis,
    ReferenceType::Misc,
    ReferenceType::Phdthesis,
    ReferenceType::Proceedings,
    ReferenceType::Techreport,
    ReferenceType::Unpublished,
];

impl ReferenceType {
    /// The lowercase BibTeX name, e.g. `inproceedings`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceType::Article => "article",
            ReferenceType::Book => "book",
            ReferenceType::Booklet => "booklet",
            ReferenceType::Conference => "conference",
            ReferenceType::Inbook => "inbook",
            ReferenceType::Incollection => "incollection",
            ReferenceType::Inproceedings => "inproceedings",
            ReferenceType::Manual => "manual",
            ReferenceType::Mastersthesis => "mastersthesis",
            ReferenceType::Misc => "misc",
            ReferenceType::Phdthesis => "phdthesis",
            ReferenceType::Proceedings => "proceedings",
            ReferenceType::Techreport => "techreport",
            ReferenceType::Unpublished => "unpublished",
        }
    }

    /// The constant name used in annotation source, e.g. `Inproceedings`.
    pub fn constant_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name is not in the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeError(pub String);

impl FromStr for ReferenceType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `ReferenceType.Article` and `Article` name the same constant
        let name = s.trim().rsplit('.').next().unwrap_or_default();
        ALL_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownTypeError(s.trim().to_string()))
    }
}

/// A single parsed citation.
///
/// Built once from an annotation literal and never mutated afterwards.
/// Optional text fields are `None` when the annotation did not mention them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationRecord {
    #[serde(rename = "type")]
    pub kind: ReferenceType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub editor: Vec<String>,
    pub title: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booktitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<String>,
    /// Flat `key, value, key, value, ...` sequence, as written.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_data: Vec<String>,
}

impl CitationRecord {
    /// Creates a record holding only the required fields.
    pub fn new(kind: ReferenceType, title: impl Into<String>, year: impl Into<String>) -> Self {
        CitationRecord {
            kind,
            author: Vec::new(),
            editor: Vec::new(),
            title: title.into(),
            year: year.into(),
            journal: None,
            booktitle: None,
            chapter: None,
            edition: None,
            url: None,
            note: None,
            institution: None,
            month: None,
            number: None,
            organization: None,
            publisher: None,
            school: None,
            series: None,
            volume: None,
            pages: Vec::new(),
            custom_data: Vec::new(),
        }
    }

    /// Complete `(key, value)` pairs of the custom data, in written order.
    ///
    /// A trailing key without a value is dropped.
    pub fn custom_data_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.custom_data
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// The custom data folded into a map; a repeated key keeps its last value.
    pub fn custom_data_map(&self) -> HashMap<&str, &str> {
        self.custom_data_pairs().collect()
    }

    /// Whether the record names at least one author.
    pub fn has_authors(&self) -> bool {
        has_names(&self.author)
    }
}

/// A name list counts as absent when it is empty or holds one empty name.
pub(crate) fn has_names(names: &[String]) -> bool {
    !(names.is_empty() || (names.len() == 1 && names[0].is_empty()))
}

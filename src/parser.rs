//! Annotation-literal parser.
//!
//! Turns `@Reference(...)` and `@References(references={...})` text into
//! [`CitationRecord`]s. The grammar is parsed by recursive descent over the
//! tokens produced by [`crate::lexer`]:
//!
//! ```text
//! annotation := '@' name '(' [ element (',' element)* [','] ] ')'
//! element    := key '=' value | value
//! value      := string | bare | '{' [ value (',' value)* [','] ] '}' | annotation
//! ```

use thiserror::Error;

use crate::lexer::{tokenize, LexError, Token, TokenKind};
use crate::record::{CitationRecord, ReferenceType};

/// Errors that can occur while parsing an annotation literal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CitationError {
    #[error("Malformed citation at byte {offset}: {message}")]
    MalformedCitation { offset: usize, message: String },

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown reference type: {0}")]
    UnknownReferenceType(String),

    #[error("Unexpected value for field '{field}': expected {expected}")]
    UnexpectedValue {
        field: String,
        expected: &'static str,
    },
}

impl From<LexError> for CitationError {
    fn from(e: LexError) -> Self {
        CitationError::MalformedCitation {
            offset: e.offset,
            message: e.message,
        }
    }
}

/// A parsed annotation value, before it is mapped onto record fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bare(String),
    List(Vec<Value>),
    Annotation(Annotation),
}

/// A parsed `@Name(key=value, ...)` annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Annotation name as written, possibly package-qualified.
    pub name: String,
    /// Elements in written order; a bare positional value has key `value`.
    pub elements: Vec<(String, Value)>,
    /// Byte offset of the `@`.
    pub offset: usize,
}

impl Annotation {
    /// The unqualified annotation name, e.g. `Reference`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Recursive-descent parser over a token list.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(input: &str) -> Result<Self, CitationError> {
        Ok(Parser {
            tokens: tokenize(input)?,
            pos: 0,
            end: input.len(),
        })
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.offset)
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, CitationError> {
        Err(CitationError::MalformedCitation {
            offset: self.offset(),
            message: message.into(),
        })
    }

    fn next(&mut self) -> Option<TokenKind> {
        let token = self.tokens.get(self.pos).map(|t| t.kind.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), CitationError> {
        if self.peek() == Some(&kind) {
            self.pos += 1;
            Ok(())
        } else {
            self.error(format!("expected {}", what))
        }
    }

    fn finish(&self) -> Result<(), CitationError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => self.error("unexpected text after the annotation"),
        }
    }

    fn annotation(&mut self) -> Result<Annotation, CitationError> {
        let offset = self.offset();
        let name = match self.peek() {
            Some(TokenKind::At(name)) => name.clone(),
            _ => return self.error("expected an annotation starting with '@'"),
        };
        self.pos += 1;
        self.expect(TokenKind::LParen, "'(' after the annotation name")?;

        let mut elements = Vec::new();
        loop {
            if self.peek() == Some(&TokenKind::RParen) {
                self.pos += 1;
                break;
            }
            elements.push(self.element()?);
            match self.next() {
                Some(TokenKind::Comma) => continue,
                Some(TokenKind::RParen) => break,
                Some(_) => {
                    self.pos -= 1;
                    return self.error("expected ',' or ')'");
                }
                None => return self.error("unclosed annotation, expected ')'"),
            }
        }

        Ok(Annotation {
            name,
            elements,
            offset,
        })
    }

    fn element(&mut self) -> Result<(String, Value), CitationError> {
        let keyed = matches!(
            (
                self.tokens.get(self.pos).map(|t| &t.kind),
                self.tokens.get(self.pos + 1).map(|t| &t.kind)
            ),
            (Some(TokenKind::Bare(_)), Some(TokenKind::Equals))
        );
        if keyed {
            let key = match self.next() {
                Some(TokenKind::Bare(key)) => key,
                _ => return self.error("expected a field name"),
            };
            self.pos += 1;
            Ok((key, self.value()?))
        } else {
            Ok(("value".to_string(), self.value()?))
        }
    }

    fn value(&mut self) -> Result<Value, CitationError> {
        match self.peek() {
            Some(TokenKind::Str(_)) | Some(TokenKind::Bare(_)) => match self.next() {
                Some(TokenKind::Str(s)) => Ok(Value::Str(s)),
                Some(TokenKind::Bare(s)) => Ok(Value::Bare(s)),
                _ => self.error("expected a value"),
            },
            Some(TokenKind::LBrace) => {
                self.pos += 1;
                let mut items = Vec::new();
                loop {
                    if self.peek() == Some(&TokenKind::RBrace) {
                        self.pos += 1;
                        break;
                    }
                    items.push(self.value()?);
                    match self.next() {
                        Some(TokenKind::Comma) => continue,
                        Some(TokenKind::RBrace) => break,
                        Some(_) => {
                            self.pos -= 1;
                            return self.error("expected ',' or '}' in list");
                        }
                        None => return self.error("unclosed list, expected '}'"),
                    }
                }
                Ok(Value::List(items))
            }
            Some(TokenKind::At(_)) => Ok(Value::Annotation(self.annotation()?)),
            Some(_) => self.error("expected a value"),
            None => self.error("unexpected end of input, expected a value"),
        }
    }
}

/// Parses text holding exactly one annotation of any name.
pub fn parse_annotation(text: &str) -> Result<Annotation, CitationError> {
    let mut parser = Parser::new(text)?;
    let annotation = parser.annotation()?;
    parser.finish()?;
    Ok(annotation)
}

/// Parses a single `@Reference(...)` literal into a record.
///
/// # Errors
///
/// Returns [`CitationError::MalformedCitation`] when the text is not a
/// well-formed `@Reference` annotation, [`CitationError::MissingRequiredField`]
/// when `type`, `title` or `year` is absent, and the other variants for
/// unknown fields, unknown types and values of the wrong shape.
///
/// # Examples
///
/// ```
/// use citedoc::parse_reference;
///
/// let record = parse_reference(
///     r#"@Reference(type=Article,author="Smith, J.",title={A Study},year=2020)"#,
/// ).unwrap();
/// assert_eq!(record.kind.as_str(), "article");
/// assert_eq!(record.author, vec!["Smith, J."]);
/// assert_eq!(record.title, "A Study");
/// assert_eq!(record.year, "2020");
/// ```
pub fn parse_reference(text: &str) -> Result<CitationRecord, CitationError> {
    let annotation = parse_annotation(text)?;
    if annotation.simple_name() != "Reference" {
        return Err(CitationError::MalformedCitation {
            offset: annotation.offset,
            message: format!("expected @Reference, found @{}", annotation.name),
        });
    }
    build_record(&annotation)
}

/// Parses an `@References(references={...})` literal into records, in order.
///
/// A lone `@Reference(...)` is accepted as a list of one.
///
/// # Examples
///
/// ```
/// use citedoc::parse_references;
///
/// let records = parse_references(
///     r#"@References(references={
///         @Reference(type=Article, title="One", year="2001"),
///         @Reference(type=Book, title="Two", year="2002")
///     })"#,
/// ).unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].title, "Two");
/// ```
pub fn parse_references(text: &str) -> Result<Vec<CitationRecord>, CitationError> {
    let annotation = parse_annotation(text)?;
    match annotation.simple_name() {
        "Reference" => Ok(vec![build_record(&annotation)?]),
        "References" => {
            let list = annotation
                .elements
                .iter()
                .find(|(key, _)| key == "references" || key == "value")
                .map(|(_, value)| value)
                .ok_or(CitationError::MissingRequiredField("references"))?;

            let items = match list {
                Value::List(items) => items.iter().collect::<Vec<_>>(),
                single => vec![single],
            };

            items
                .into_iter()
                .map(|item| match item {
                    Value::Annotation(nested) if nested.simple_name() == "Reference" => {
                        build_record(nested)
                    }
                    Value::Annotation(nested) => Err(CitationError::MalformedCitation {
                        offset: nested.offset,
                        message: format!("expected @Reference, found @{}", nested.name),
                    }),
                    _ => Err(CitationError::UnexpectedValue {
                        field: "references".to_string(),
                        expected: "@Reference annotations",
                    }),
                })
                .collect()
        }
        other => Err(CitationError::MalformedCitation {
            offset: annotation.offset,
            message: format!("expected @References, found @{}", other),
        }),
    }
}

/// Reads a scalar text value; a one-element list stands for its element.
fn scalar(field: &str, value: &Value) -> Result<String, CitationError> {
    match value {
        Value::Str(s) | Value::Bare(s) => Ok(s.clone()),
        Value::List(items) if items.len() == 1 => scalar(field, &items[0]),
        _ => Err(CitationError::UnexpectedValue {
            field: field.to_string(),
            expected: "a single string",
        }),
    }
}

/// Reads a list of text values; a scalar becomes a one-element list.
fn list(field: &str, value: &Value) -> Result<Vec<String>, CitationError> {
    match value {
        Value::Str(s) | Value::Bare(s) => Ok(vec![s.clone()]),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Str(s) | Value::Bare(s) => Ok(s.clone()),
                _ => Err(CitationError::UnexpectedValue {
                    field: field.to_string(),
                    expected: "a list of strings",
                }),
            })
            .collect(),
        Value::Annotation(_) => Err(CitationError::UnexpectedValue {
            field: field.to_string(),
            expected: "a list of strings",
        }),
    }
}

/// Maps the elements of a `@Reference` annotation onto a record.
fn build_record(annotation: &Annotation) -> Result<CitationRecord, CitationError> {
    let mut kind = None;
    let mut title = None;
    let mut year = None;
    let mut record = CitationRecord::new(ReferenceType::Misc, String::new(), String::new());

    for (key, value) in &annotation.elements {
        let key = key.as_str();
        match key {
            "type" => {
                let text = scalar(key, value)?;
                kind = Some(
                    text.parse::<ReferenceType>()
                        .map_err(|e| CitationError::UnknownReferenceType(e.0))?,
                );
            }
            "title" => title = Some(scalar(key, value)?),
            "year" => year = Some(scalar(key, value)?),
            "author" => record.author = list(key, value)?,
            "editor" => record.editor = list(key, value)?,
            "pages" => record.pages = list(key, value)?,
            "customData" => record.custom_data = list(key, value)?,
            "journal" => record.journal = Some(scalar(key, value)?),
            "booktitle" => record.booktitle = Some(scalar(key, value)?),
            "chapter" => record.chapter = Some(scalar(key, value)?),
            "edition" => record.edition = Some(scalar(key, value)?),
            "url" => record.url = Some(scalar(key, value)?),
            "note" => record.note = Some(scalar(key, value)?),
            "institution" => record.institution = Some(scalar(key, value)?),
            "month" => record.month = Some(scalar(key, value)?),
            "number" => record.number = Some(scalar(key, value)?),
            "organization" => record.organization = Some(scalar(key, value)?),
            "publisher" => record.publisher = Some(scalar(key, value)?),
            "school" => record.school = Some(scalar(key, value)?),
            "series" => record.series = Some(scalar(key, value)?),
            "volume" => record.volume = Some(scalar(key, value)?),
            other => return Err(CitationError::UnknownField(other.to_string())),
        }
    }

    record.kind = kind.ok_or(CitationError::MissingRequiredField("type"))?;
    record.title = title.ok_or(CitationError::MissingRequiredField("title"))?;
    record.year = year.ok_or(CitationError::MissingRequiredField("year"))?;
    Ok(record)
}

//! Tokenizer for annotation literals.
//!
//! Splits text such as `@Reference(type=Article, title="X", pages={"1","8"})`
//! into tokens for the recursive-descent parser in [`crate::parser`].
//! Whitespace between tokens is skipped; whitespace runs inside string and
//! bare values collapse to a single space.

/// What a token is.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `@Name` or `@qualified.Name`; holds the name without the `@`.
    At(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Equals,
    /// A double-quoted string with escapes resolved.
    Str(String),
    /// An unquoted run of text: identifiers, numbers, enum constants.
    Bare(String),
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// A lexical error with the byte offset where it was detected.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub offset: usize,
    pub message: String,
}

/// Characters that end a bare value.
fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}' | '=' | ',' | '"')
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '.')
}

/// Appends `c`, folding any whitespace run into one space.
fn push_collapsed(out: &mut String, c: char) {
    if c.is_whitespace() {
        if !out.ends_with(' ') {
            out.push(' ');
        }
    } else {
        out.push(c);
    }
}

/// Tokenizes an annotation literal.
///
/// # Errors
///
/// Fails on an unterminated string, a bad `\u` escape, or an `@` that is not
/// followed by a name.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        let simple = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ',' => Some(TokenKind::Comma),
            '=' => Some(TokenKind::Equals),
            _ => None,
        };
        if let Some(kind) = simple {
            chars.next();
            tokens.push(Token { kind, offset });
            continue;
        }

        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '@' {
            chars.next();
            let mut name = String::new();
            while let Some(&(_, n)) = chars.peek() {
                if !is_name_char(n) {
                    break;
                }
                name.push(n);
                chars.next();
            }
            if name.is_empty() {
                return Err(LexError {
                    offset,
                    message: "expected an annotation name after '@'".to_string(),
                });
            }
            tokens.push(Token {
                kind: TokenKind::At(name),
                offset,
            });
            continue;
        }

        if c == '"' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some((pos, s)) = chars.next() {
                match s {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some((_, '"')) => value.push('"'),
                        Some((_, '\\')) => value.push('\\'),
                        Some((_, '\'')) => value.push('\''),
                        Some((_, 'n')) | Some((_, 't')) | Some((_, 'r')) => {
                            push_collapsed(&mut value, ' ')
                        }
                        Some((_, 'u')) => {
                            let hex: String = (0..4)
                                .filter_map(|_| chars.next())
                                .map(|(_, h)| h)
                                .collect();
                            let decoded = u32::from_str_radix(&hex, 16)
                                .ok()
                                .and_then(char::from_u32)
                                .ok_or_else(|| LexError {
                                    offset: pos,
                                    message: format!("invalid unicode escape '\\u{}'", hex),
                                })?;
                            push_collapsed(&mut value, decoded);
                        }
                        // Not a Java escape: keep it for the LaTeX normalization
                        Some((_, other)) => {
                            value.push('\\');
                            push_collapsed(&mut value, other);
                        }
                        None => break,
                    },
                    other => push_collapsed(&mut value, other),
                }
            }
            if !closed {
                return Err(LexError {
                    offset,
                    message: "unterminated string literal".to_string(),
                });
            }
            tokens.push(Token {
                kind: TokenKind::Str(value),
                offset,
            });
            continue;
        }

        let mut value = String::new();
        while let Some(&(_, b)) = chars.peek() {
            if is_delimiter(b) {
                break;
            }
            push_collapsed(&mut value, b);
            chars.next();
        }
        tokens.push(Token {
            kind: TokenKind::Bare(value.trim_end().to_string()),
            offset,
        });
    }

    Ok(tokens)
}

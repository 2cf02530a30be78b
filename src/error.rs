//! Errors raised while lexing and parsing a query.
//!
//! Every error is fatal for the parse attempt: no partial tree is returned.
//! [`Error::render`] produces the caret diagnostic shown to users:
//!
//! ```text
//! x == "abc
//! _____^^^^
//! ```

use thiserror::Error;

/// Lexical errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    /// No token rule matches at this position
    #[error("unrecognized input {text:?} on line {line}")]
    Unrecognized {
        line: usize,
        position: usize,
        text: String,
    },

    /// A quote was opened but never closed
    #[error("unterminated string literal on line {line}")]
    UnterminatedString {
        line: usize,
        position: usize,
        text: String,
    },

    /// The literal has a valid shape but its value cannot be represented
    #[error("invalid {kind} literal {text:?} on line {line}: {reason}")]
    InvalidLiteral {
        kind: &'static str,
        line: usize,
        position: usize,
        text: String,
        reason: String,
    },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::Unrecognized { line, .. }
            | LexError::UnterminatedString { line, .. }
            | LexError::InvalidLiteral { line, .. } => *line,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            LexError::Unrecognized { position, .. }
            | LexError::UnterminatedString { position, .. }
            | LexError::InvalidLiteral { position, .. } => *position,
        }
    }

    /// The source text the error refers to.
    pub fn text(&self) -> &str {
        match self {
            LexError::Unrecognized { text, .. }
            | LexError::UnterminatedString { text, .. }
            | LexError::InvalidLiteral { text, .. } => text,
        }
    }
}

/// Grammar errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// A token that cannot appear here
    #[error("unexpected {found} on line {line}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        line: usize,
        position: usize,
    },

    /// The input ended in the middle of a construct
    #[error("unexpected end of input on line {line}, expected {expected}")]
    UnexpectedEof {
        expected: &'static str,
        line: usize,
        position: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. } | ParseError::UnexpectedEof { line, .. } => {
                *line
            }
        }
    }

    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEof { position, .. } => *position,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, ParseError::UnexpectedEof { .. })
    }
}

/// Any error raised by [`parse`](crate::parse).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// 1-based line of the offending input.
    pub fn line(&self) -> usize {
        match self {
            Error::Lex(e) => e.line(),
            Error::Parse(e) => e.line(),
        }
    }

    /// Byte offset of the offending input.
    pub fn position(&self) -> usize {
        match self {
            Error::Lex(e) => e.position(),
            Error::Parse(e) => e.position(),
        }
    }

    /// Formats the error with the offending source line underneath.
    ///
    /// `source` must be the text that was lexed, i.e. after trimming when
    /// [`ParseOptions::trim`](crate::ParseOptions) is set.
    ///
    /// ```
    /// let source = "x == \"abc";
    /// let err = sift_query::parse(source).unwrap_err();
    /// let rendered = err.render(source);
    /// assert!(rendered.ends_with("x == \"abc\n_____^^^^"));
    /// ```
    pub fn render(&self, source: &str) -> String {
        format!("{}\n{}", self, underline(source, self.position()))
    }
}

/// The line containing `position`, followed by a marker row with `_` under
/// the consumed part and `^` under the rest of the line.
fn underline(source: &str, position: usize) -> String {
    let mut position = position.min(source.len());
    while !source.is_char_boundary(position) {
        position -= 1;
    }
    let line_start = source[..position].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[position..]
        .find('\n')
        .map_or(source.len(), |i| position + i);
    let line = &source[line_start..line_end];

    let consumed = source[line_start..position].chars().count();
    let rest = source[position..line_end].chars().count().max(1);

    format!("{}\n{}{}", line, "_".repeat(consumed), "^".repeat(rest))
}

#[test]
fn test_underline_picks_offending_line() {
    let source = "a == 1 and\nb == ]";
    let position = source.find(']').unwrap();
    assert_eq!(underline(source, position), "b == ]\n_____^");
}

#[test]
fn test_underline_at_end_of_input() {
    assert_eq!(underline("x ==", 4), "x ==\n____^");
}

#[test]
fn test_underline_inside_multibyte_char() {
    assert_eq!(underline("é = x", 1), "é = x\n^^^^^");
}

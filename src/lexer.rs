//! Lexer for the sift query language.
//!
//! [`Lexer`] is a lazy iterator over [`Spanned`] tokens. At each position the
//! rules below are tried in order and the first match wins:
//!
//! 1. punctuation `( ) [ ] | , ;`
//! 2. action keys `:name`
//! 3. symbolic comparison operators and `!in` / `!contains`
//! 4. identifiers, reclassified through the keyword table
//!    (`and`, `or`, `in`, `contains`)
//! 5. datetime, date and time literals
//! 6. quoted strings
//! 7. numbers
//!
//! Whitespace separates tokens and is otherwise ignored. The first input no
//! rule accepts ends the stream with a [`LexError`].
//!
//! ```
//! use sift_query::ast::{CompOp, Token};
//! use sift_query::lexer::Lexer;
//!
//! let tokens: Vec<Token> = Lexer::new("tags in ['a', 'b']")
//!     .map(|t| t.unwrap().token)
//!     .collect();
//! assert_eq!(tokens[1], Token::CompOp(CompOp::In));
//! assert_eq!(tokens.len(), 7);
//! ```

use std::{iter::FusedIterator, sync::LazyLock};

use phf::phf_map;
use regex::Regex;
use tracing::trace;

use crate::{
    ast::{CompOp, Joiner, Spanned, Token},
    classify::{self, InvalidLiteral},
    error::LexError,
};

#[derive(Debug, Clone, Copy)]
enum Keyword {
    Comp(CompOp),
    Join(Joiner),
}

/// Identifiers that are operators rather than keys.
static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "and" => Keyword::Join(Joiner::And),
    "or" => Keyword::Join(Joiner::Or),
    "in" => Keyword::Comp(CompOp::In),
    "contains" => Keyword::Comp(CompOp::Contains),
};

static ACTION_KEY: LazyLock<Regex> = LazyLock::new(|| anchored(r":[A-Za-z0-9]+"));
static COMP_OP: LazyLock<Regex> =
    LazyLock::new(|| anchored(r"(?:==|!=|>=|<=|>|<|!in\b|!contains\b)"));
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| anchored(r"[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*"));
static DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    anchored(r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}\s+[0-9]{1,2}:[0-9]{1,2}(?:\s*(?i:am|pm)\b)?")
});
static DATE: LazyLock<Regex> = LazyLock::new(|| anchored(r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}"));
static TIME: LazyLock<Regex> =
    LazyLock::new(|| anchored(r"[0-9]{1,2}:[0-9]{1,2}(?:\s*(?i:am|pm)\b)?"));
static DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| anchored(r#"(?s)"(?:\\.|[^"\\])*""#));
static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| anchored(r"(?s)'(?:\\.|[^'\\])*'"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| anchored(r"[+-]?[0-9]+(?:\.[0-9]+)?"));

/// Compiles a rule that only matches at the start of the haystack.
fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^{}", pattern)).expect("Invalid lexer rule")
}

/// A lexer over a query string.
///
/// Yields `Ok` tokens until the input is exhausted or an error occurs. After
/// an error the iterator is finished; it cannot be restarted.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of the next unread character
    position: usize,
    /// 1-based line of the next unread character
    line: usize,
    validate_temporal: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            validate_temporal: false,
            finished: false,
        }
    }

    /// Range-check time and date literals while lexing.
    pub fn validate_temporal(mut self, validate: bool) -> Self {
        self.validate_temporal = validate;
        self
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// The unread part of the input.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn current_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if !ch.is_whitespace() {
                break;
            }
            if ch == '\n' {
                self.line += 1;
            }
            self.position += ch.len_utf8();
        }
    }

    /// Consumes `len` bytes as one token.
    fn emit(&mut self, token: Token, len: usize) -> Spanned {
        let spanned = Spanned {
            token,
            line: self.line,
            position: self.position,
            len,
        };
        let text = &self.input[self.position..self.position + len];
        self.line += text.matches('\n').count();
        self.position += len;

        trace!(
            line = spanned.line,
            position = spanned.position,
            token = %spanned.token,
            "lexed token"
        );
        spanned
    }

    fn match_rule(&self, re: &Regex) -> Option<&'a str> {
        re.find(self.remaining()).map(|m| m.as_str())
    }

    fn invalid(&self, text: &str, err: InvalidLiteral) -> LexError {
        LexError::InvalidLiteral {
            kind: err.kind,
            line: self.line,
            position: self.position,
            text: text.to_string(),
            reason: err.reason,
        }
    }

    /// Produces the next token, `Ok(None)` at the end of input.
    pub fn next_token(&mut self) -> Result<Option<Spanned>, LexError> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let punctuation = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            '|' => Some(Token::Pipe),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            _ => None,
        };
        if let Some(token) = punctuation {
            return Ok(Some(self.emit(token, 1)));
        }

        if let Some(text) = self.match_rule(&ACTION_KEY) {
            return Ok(Some(self.emit(Token::ActionKey(text.to_string()), text.len())));
        }

        if let Some(text) = self.match_rule(&COMP_OP) {
            let op = text.parse::<CompOp>().map_err(|reason| {
                self.invalid(text, InvalidLiteral { kind: "operator", reason })
            })?;
            return Ok(Some(self.emit(Token::CompOp(op), text.len())));
        }

        if let Some(text) = self.match_rule(&IDENTIFIER) {
            let token = match KEYWORDS.get(text) {
                Some(Keyword::Comp(op)) => Token::CompOp(*op),
                Some(Keyword::Join(joiner)) => Token::JoiningOp(*joiner),
                None => Token::Key(text.to_string()),
            };
            return Ok(Some(self.emit(token, text.len())));
        }

        let temporal: [(&Regex, fn(&str, bool) -> Result<Token, InvalidLiteral>); 3] = [
            (&*DATETIME, classify::datetime),
            (&*DATE, classify::date),
            (&*TIME, classify::time),
        ];
        for (re, convert) in temporal {
            if let Some(text) = self.match_rule(re) {
                let token = convert(text, self.validate_temporal)
                    .map_err(|err| self.invalid(text, err))?;
                return Ok(Some(self.emit(token, text.len())));
            }
        }

        if ch == '"' || ch == '\'' {
            let re: &Regex = if ch == '"' { &*DOUBLE_QUOTED } else { &*SINGLE_QUOTED };
            return match self.match_rule(re) {
                Some(text) => {
                    let token = Token::String(classify::unescape(text));
                    Ok(Some(self.emit(token, text.len())))
                }
                None => Err(LexError::UnterminatedString {
                    line: self.line,
                    position: self.position,
                    text: self.remaining().to_string(),
                }),
            };
        }

        if let Some(text) = self.match_rule(&NUMBER) {
            let token = classify::number(text).map_err(|err| self.invalid(text, err))?;
            return Ok(Some(self.emit(token, text.len())));
        }

        let text: String = self
            .remaining()
            .chars()
            .take_while(|c| !c.is_whitespace())
            .collect();
        Err(LexError::Unrecognized {
            line: self.line,
            position: self.position,
            text,
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Spanned, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Lexer<'_> {}

#[test]
fn test_keywords() {
    let tokens: Vec<Token> = Lexer::new("and or in contains android")
        .map(|t| t.unwrap().token)
        .collect();
    assert_eq!(
        tokens,
        vec![
            Token::JoiningOp(Joiner::And),
            Token::JoiningOp(Joiner::Or),
            Token::CompOp(CompOp::In),
            Token::CompOp(CompOp::Contains),
            Token::Key("android".to_string()),
        ]
    );
}

#[test]
fn test_stops_after_error() {
    let mut lexer = Lexer::new("a == 1 # b == 2");
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());
}

#[test]
fn test_iterator_adapters() {
    let mut lexer = Lexer::new("a == 1 and b != 2");
    let op = lexer.find(|t| matches!(t, Ok(Spanned { token: Token::CompOp(_), .. })));
    assert_eq!(op.unwrap().unwrap().token, Token::CompOp(CompOp::Equal));
    assert_eq!(lexer.remaining(), " 1 and b != 2");
    assert_eq!(lexer.count(), 5);
}

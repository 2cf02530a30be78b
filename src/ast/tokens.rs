use std::fmt;

use rust_decimal::Decimal;

use crate::ast::{CompOp, Joiner};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Structural
    /// Opens a filter group
    LParen,

    /// Closes a filter group
    RParen,

    /// Opens an array literal
    LBracket,

    /// Closes an array literal
    RBracket,

    /// Starts the action list
    ///
    /// # Examples
    /// ```text
    /// status == "done" | :sortby date desc
    /// ```
    Pipe,

    /// Separates array elements
    Comma,

    /// Separates actions
    Semicolon,

    // Keys and operators
    /// Colon-prefixed action name
    ///
    /// # Examples
    /// ```text
    /// :sortby
    /// :limit
    /// ```
    ActionKey(String),

    /// Comparison operator, symbolic or keyword form
    CompOp(CompOp),

    /// `and` / `or`
    JoiningOp(Joiner),

    /// Field name, optionally a dotted path
    ///
    /// # Examples
    /// ```text
    /// title
    /// meta.author.name
    /// ```
    Key(String),

    // Literals
    /// Time of day, raw text
    Time(String),

    /// Calendar date, raw text
    Date(String),

    /// Date followed by a time, raw text
    DateTime(String),

    /// Quoted string, unescaped
    String(String),

    /// Number without a fraction
    Integer(i64),

    /// Number with a fraction
    Decimal(Decimal),
}

impl Token {
    /// Short description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::ActionKey(key) => format!("action key '{}'", key),
            Token::CompOp(op) => format!("operator '{}'", op),
            Token::JoiningOp(joiner) => format!("joining operator '{}'", joiner),
            Token::Key(key) => format!("key '{}'", key),
            Token::Time(s) => format!("time {}", s),
            Token::Date(s) => format!("date {}", s),
            Token::DateTime(s) => format!("datetime {}", s),
            Token::String(s) => format!("string {:?}", s),
            Token::Integer(n) => format!("number {}", n),
            Token::Decimal(d) => format!("number {}", d),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A token together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    /// 1-based source line
    pub line: usize,
    /// Byte offset of the first character
    pub position: usize,
    /// Byte length of the matched text
    pub len: usize,
}

use std::fmt;

use rust_decimal::Decimal;

/// A scalar value written in a query.
///
/// Temporal literals keep their raw lexical form; whether `13:99` is a
/// sensible time is up to whoever evaluates the query, unless the parser
/// was asked to validate them (see [`ParseOptions`](crate::ParseOptions)).
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted string with the quotes stripped and backslashes removed
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'it\'s'
    /// ```
    String(String),

    /// Whole number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -7
    /// ```
    Integer(i64),

    /// Number with a decimal fraction, kept exact
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -0.5
    /// ```
    Decimal(Decimal),

    /// Time of day such as `12:20` or `11:24 pm`
    Time(String),

    /// Calendar date such as `2013-2-1`
    Date(String),

    /// Date and time separated by whitespace such as `2020-01-31 9:30am`
    DateTime(String),
}

impl Literal {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    /// Writes the literal back in a form the lexer accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    if ch == '"' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                f.write_str("\"")
            }
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Decimal(d) => write!(f, "{}", d),
            Literal::Time(s) | Literal::Date(s) | Literal::DateTime(s) => f.write_str(s),
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single literal
    Scalar(Literal),

    /// An ordered, possibly empty, list of literals
    ///
    /// Element kinds are not required to match.
    List(Vec<Literal>),
}

impl Operand {
    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Operand::List(items) => Some(items),
            Operand::Scalar(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Scalar(lit) => write!(f, "{}", lit),
            Operand::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

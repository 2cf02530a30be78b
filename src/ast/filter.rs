use std::fmt;

use crate::ast::{CompOp, Literal, Operand};

/// A single comparison: `key operator operand`.
///
/// # Examples
/// ```text
/// title == "Hello"
/// meta.tags contains "rust"
/// status in ["draft", "review"]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    key: String,
    operator: CompOp,
    operand: Operand,
}

impl FilterNode {
    pub fn new(key: impl Into<String>, operator: CompOp, operand: Operand) -> Self {
        FilterNode {
            key: key.into(),
            operator,
            operand,
        }
    }

    /// Shorthand for a comparison against a single literal.
    pub fn scalar(key: impl Into<String>, operator: CompOp, value: Literal) -> Self {
        Self::new(key, operator, Operand::Scalar(value))
    }

    /// Dotted field path, e.g. `a.b.c`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The path split on `.`.
    pub fn key_path(&self) -> impl Iterator<Item = &str> {
        self.key.split('.')
    }

    pub fn operator(&self) -> CompOp {
        self.operator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.key, self.operator, self.operand)
    }
}

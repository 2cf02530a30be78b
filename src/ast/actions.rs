use std::fmt;

use crate::ast::Literal;

/// A positional parameter of an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Bare identifier or dotted path, e.g. `name` or `asc`
    Key(String),
    /// Any literal value
    Literal(Literal),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Key(key) => f.write_str(key),
            Param::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// A post-filter directive such as `:sortby name asc` or `:limit 10`.
///
/// Parameters are not checked against the action key; interpreting them is
/// the job of whoever executes the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionNode {
    action_key: String,
    params: Vec<Param>,
}

impl ActionNode {
    pub fn new(action_key: impl Into<String>, params: Vec<Param>) -> Self {
        ActionNode {
            action_key: action_key.into(),
            params,
        }
    }

    /// The key including its leading colon, e.g. `:sortby`.
    pub fn action_key(&self) -> &str {
        &self.action_key
    }

    /// The key without its leading colon.
    pub fn name(&self) -> &str {
        self.action_key.strip_prefix(':').unwrap_or(&self.action_key)
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

impl fmt::Display for ActionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action_key)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}

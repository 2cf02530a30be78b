use std::fmt;

use crate::ast::{ActionNode, JoinerNode};

/// A parsed query: an optional filter tree followed by an optional list of
/// actions.
///
/// A query with neither matches every record and performs no actions. Both
/// parts are fixed at construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    filter: Option<JoinerNode>,
    actions: Vec<ActionNode>,
}

impl Query {
    pub fn new(filter: Option<JoinerNode>, actions: Vec<ActionNode>) -> Self {
        Query { filter, actions }
    }

    /// The query of an empty input.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.actions.is_empty()
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn filter_root(&self) -> Option<&JoinerNode> {
        self.filter.as_ref()
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Actions in the order they were written.
    pub fn actions(&self) -> &[ActionNode] {
        &self.actions
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(filter) = &self.filter {
            write!(f, "{}", filter)?;
        }
        for (i, action) in self.actions.iter().enumerate() {
            let sep = match (i, self.filter.is_some()) {
                (0, false) => "| ",
                (0, true) => " | ",
                _ => "; ",
            };
            write!(f, "{}{}", sep, action)?;
        }
        Ok(())
    }
}

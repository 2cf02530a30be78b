use std::{fmt, str::FromStr};

/// Comparison operators.
///
/// The operator is kept verbatim in each [`FilterNode`](crate::ast::FilterNode)
/// so that an evaluator can dispatch on it. The parser attaches no meaning
/// to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompOp {
    /// Left operand holds the right one as element or substring (`contains`)
    Contains,
    /// Negated `contains` (`!contains`)
    NotContains,
    /// Left operand is an element or substring of the right one (`in`)
    In,
    /// Negated `in` (`!in`)
    NotIn,
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than (`<`)
    LessThan,
}

impl CompOp {
    /// Every operator, symbolic forms first.
    pub const ALL: [CompOp; 10] = [
        CompOp::Contains,
        CompOp::NotContains,
        CompOp::In,
        CompOp::NotIn,
        CompOp::Equal,
        CompOp::NotEqual,
        CompOp::GreaterEqual,
        CompOp::LessEqual,
        CompOp::GreaterThan,
        CompOp::LessThan,
    ];

    /// Source spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CompOp::Contains => "contains",
            CompOp::NotContains => "!contains",
            CompOp::In => "in",
            CompOp::NotIn => "!in",
            CompOp::Equal => "==",
            CompOp::NotEqual => "!=",
            CompOp::GreaterEqual => ">=",
            CompOp::LessEqual => "<=",
            CompOp::GreaterThan => ">",
            CompOp::LessThan => "<",
        }
    }

    /// `true` for the `!`-prefixed membership forms and `!=`.
    pub fn is_negated(self) -> bool {
        matches!(self, CompOp::NotContains | CompOp::NotIn | CompOp::NotEqual)
    }

    /// `true` for `contains`, `in` and their negations.
    pub fn is_membership(self) -> bool {
        matches!(
            self,
            CompOp::Contains | CompOp::NotContains | CompOp::In | CompOp::NotIn
        )
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown comparison operator '{}'", s))
    }
}

/// How two subtrees are combined.
///
/// A node without a right child carries no joiner at all, see
/// [`JoinerNode::joiner`](crate::ast::JoinerNode::joiner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joiner {
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
}

impl Joiner {
    pub fn as_str(self) -> &'static str {
        match self {
            Joiner::And => "and",
            Joiner::Or => "or",
        }
    }
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

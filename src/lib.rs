//! # sift-query
//!
//! A small filter-and-action language for selecting records from a
//! collection, e.g. pages of a static site:
//!
//! ```text
//! (draft == 0 and tags contains "rust") or pinned == 1 | :sortby date desc; :limit 10
//! ```
//!
//! The crate turns such a string into a [`Query`]: a filter tree of
//! comparisons joined by `and`/`or`, plus an ordered list of actions. It does
//! not execute anything. Hosts fold the tree with their own leaf evaluator
//! and combiner:
//!
//! ```
//! use sift_query::ast::{Joiner, Literal, Operand};
//!
//! let query = sift_query::parse("year >= 2020 and tags contains 'rust'").unwrap();
//! let tree = query.filter_root().unwrap();
//!
//! let matches = tree.walk(
//!     |filter| match (filter.key(), filter.operand()) {
//!         ("year", Operand::Scalar(Literal::Integer(n))) => 2023 >= *n,
//!         ("tags", _) => true,
//!         _ => false,
//!     },
//!     |left, joiner, right| match joiner {
//!         Joiner::And => left && right,
//!         Joiner::Or => left || right,
//!     },
//! );
//! assert!(matches);
//! ```
pub mod ast;
pub mod classify;
pub mod error;
pub mod lexer;
pub mod options;
pub mod output;
pub mod parser;

pub use ast::{ActionNode, CompOp, FilterNode, Joiner, JoinerNode, Literal, Operand, Param, Query};
pub use error::{Error, LexError, ParseError};
pub use lexer::Lexer;
pub use options::ParseOptions;
pub use output::{to_json, to_json_pretty};
pub use parser::Parser;

use tracing::debug;

/// Parses a query with the default [`ParseOptions`].
///
/// An empty or all-whitespace input yields an empty [`Query`].
pub fn parse(input: &str) -> Result<Query, Error> {
    parse_with(input, &ParseOptions::default())
}

/// Parses a query.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Query, Error> {
    let text = if options.trim { input.trim() } else { input };
    if text.is_empty() {
        return Ok(Query::empty());
    }

    let lexer = Lexer::new(text).validate_temporal(options.validate_temporal);
    Parser::new(lexer)
        .and_then(|mut parser| parser.parse_query())
        .inspect_err(|e| {
            debug!(
                line = e.line(),
                position = e.position(),
                error = %e,
                "query rejected"
            )
        })
}

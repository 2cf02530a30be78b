//! # Sift Query Language - Syntax Tree
//!
//! Data types produced by the [lexer](crate::lexer) and the
//! [parser](crate::parser).
//!
//! - **[tokens]** - Lexical tokens and their source positions
//! - **[literals]** - Literal values and comparison operands
//! - **[operators]** - Comparison operators and joiners
//! - **[filter]** - A single `key op operand` comparison
//! - **[joiner]** - The binary filter tree and its walker
//! - **[actions]** - Post-filter directives
//! - **[query]** - The complete parse result
//!
//! ## Quick Start
//!
//! ```text
//! (draft == 0 and tags contains "rust") or pinned == 1 | :sortby date desc; :limit 10
//! ```
//!
//! This keeps published posts tagged `rust` plus all pinned posts, sorts them
//! by date and keeps the first ten.
//!
//! ## Association
//!
//! `and` and `or` bind equally and associate left to right:
//!
//! ```text
//! a == 1 and b == 2 or c == 3     // ((a and b) or c)
//! a == 1 and (b == 2 or c == 3)   // (a and (b or c))
//! ```
//!
//! Parentheses are the only way to change association. A group holds plain
//! comparisons; groups do not nest.
pub mod actions;
pub mod filter;
pub mod joiner;
pub mod literals;
pub mod operators;
pub mod query;
pub mod tokens;

pub use actions::{ActionNode, Param};
pub use filter::FilterNode;
pub use joiner::{FilterVisitor, JoinerNode};
pub use literals::{Literal, Operand};
pub use operators::{CompOp, Joiner};
pub use query::Query;
pub use tokens::{Spanned, Token};

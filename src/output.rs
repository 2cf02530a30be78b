//! JSON rendering of parsed queries.
//!
//! Translates a [`Query`] into a `serde_json::Value` that hosts written in
//! other languages, or storage backends with a JSON filter syntax, can
//! consume. The filter tree is translated with
//! [`JoinerNode::walk`], so parenthesized groups disappear and every
//! combination becomes a two-element array under its joiner:
//!
//! ```text
//! a == 1 and (b == 2 or c == 3)
//! ```
//!
//! becomes
//!
//! ```json
//! {"and": [
//!   {"key": "a", "op": "==", "value": 1},
//!   {"or": [{"key": "b", "op": "==", "value": 2}, {"key": "c", "op": "==", "value": 3}]}
//! ]}
//! ```
//!
//! Decimals are written as strings to keep their exact value. Temporal
//! literals are written as their raw text.

use serde_json::{Map, Value, json};

use crate::ast::{ActionNode, FilterNode, JoinerNode, Literal, Operand, Param, Query};

pub fn literal_to_json(literal: &Literal) -> Value {
    match literal {
        Literal::Integer(n) => json!(n),
        Literal::Decimal(d) => Value::String(d.to_string()),
        Literal::String(s) | Literal::Time(s) | Literal::Date(s) | Literal::DateTime(s) => {
            Value::String(s.clone())
        }
    }
}

pub fn filter_node_to_json(filter: &FilterNode) -> Value {
    let value = match filter.operand() {
        Operand::Scalar(lit) => literal_to_json(lit),
        Operand::List(items) => Value::Array(items.iter().map(literal_to_json).collect()),
    };
    json!({
        "key": filter.key(),
        "op": filter.operator().as_str(),
        "value": value,
    })
}

/// Translates a filter tree, see the [module documentation](self).
pub fn filter_to_json(tree: &JoinerNode) -> Value {
    tree.walk(filter_node_to_json, |left, joiner, right| {
        let mut object = Map::new();
        object.insert(joiner.as_str().to_string(), Value::Array(vec![left, right]));
        Value::Object(object)
    })
}

pub fn action_to_json(action: &ActionNode) -> Value {
    let params: Vec<Value> = action
        .params()
        .iter()
        .map(|param| match param {
            Param::Key(key) => json!({ "key": key }),
            Param::Literal(lit) => literal_to_json(lit),
        })
        .collect();
    json!({
        "action": action.name(),
        "params": params,
    })
}

/// `{"filter": ..., "actions": [...]}`, with `null` for an absent filter.
pub fn to_json(query: &Query) -> Value {
    json!({
        "filter": query.filter_root().map(filter_to_json),
        "actions": query.actions().iter().map(action_to_json).collect::<Vec<_>>(),
    })
}

/// Compact JSON text of a query.
pub fn to_json_string(query: &Query) -> String {
    to_json(query).to_string()
}

/// Pretty-printed JSON text of a query.
pub fn to_json_pretty(query: &Query) -> String {
    // Serializing a `Value` to a string cannot fail.
    serde_json::to_string_pretty(&to_json(query)).unwrap_or_default()
}

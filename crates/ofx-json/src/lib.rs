#![doc = include_str!("../README.md")]

use ofx_tree::{Entry, Scalar};
use serde_json::{Map, Value};

/// Convert a parsed tree into a [`serde_json::Value`].
///
/// `None` (no root tag in the input) and an empty root both render as the
/// empty object. Otherwise the result is an object with a single key, the
/// root's own tag.
pub fn to_value(root: Option<&Entry>) -> Value {
    let Some(root) = root else {
        return Value::Object(Map::new());
    };
    if root.is_container() && root.children.is_empty() {
        return Value::Object(Map::new());
    }

    let mut map = Map::new();
    map.insert(root.tag.clone(), entry_to_value(root));
    Value::Object(map)
}

/// Render a parsed tree as a compact JSON string.
pub fn render(root: Option<&Entry>) -> String {
    to_value(root).to_string()
}

fn entry_to_value(entry: &Entry) -> Value {
    match &entry.value {
        Some(scalar) => scalar_to_value(scalar),
        None => container_to_value(entry),
    }
}

/// Group children by distinct tag name, preserving first-occurrence order.
/// A group of one nests directly under its key; a group of many becomes an
/// array of bare renderings in document order.
fn container_to_value(entry: &Entry) -> Value {
    let mut map = Map::new();
    for child in &entry.children {
        if map.contains_key(&child.tag) {
            // Whole group was emitted at the first occurrence.
            continue;
        }
        let group: Vec<&Entry> = entry
            .children
            .iter()
            .filter(|c| c.tag == child.tag)
            .collect();
        let value = if group.len() > 1 {
            Value::Array(group.into_iter().map(entry_to_value).collect())
        } else {
            entry_to_value(child)
        };
        map.insert(child.tag.clone(), value);
    }
    Value::Object(map)
}

fn scalar_to_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Text(text) => Value::String(text.clone()),
        // Decimal's display form is already a JSON numeric literal; going
        // through Number keeps the digits exact (arbitrary precision).
        Scalar::Amount(amount) => serde_json::from_str::<serde_json::Number>(&amount.to_string())
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Scalar::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
        Scalar::Empty => Value::Null,
    }
}

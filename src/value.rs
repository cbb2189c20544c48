use serde_json::{Map, Value};

use crate::path::{Separator, Token};

/// Returns true if the value can be indexed into: a mapping or a sequence.
/// Scalars (null, booleans, numbers, strings) are not countable.
pub fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Deep-merges `incoming` into `target`.
///
/// Mappings merge key by key recursively; sequences merge element-wise
/// with surplus elements appended; anything else replaces the target.
///
/// ## Example
///
/// ```rust
/// use dotwalk::merge_values;
/// use serde_json::json;
///
/// let mut target = json!({"theme": {"color": "red", "size": 12}});
/// merge_values(&mut target, json!({"theme": {"color": "blue"}}));
/// assert_eq!(target, json!({"theme": {"color": "blue", "size": 12}}));
/// ```
pub fn merge_values(target: &mut Value, incoming: Value) {
    match (&mut *target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                merge_values(target_map.entry(key).or_insert(Value::Null), value);
            }
        }
        (Value::Array(target_seq), Value::Array(incoming_seq)) => {
            for (i, value) in incoming_seq.into_iter().enumerate() {
                if i < target_seq.len() {
                    merge_values(&mut target_seq[i], value);
                } else {
                    target_seq.push(value);
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// The keys of a container, in order. Sequences yield their indices;
/// scalars yield nothing.
pub fn container_keys(value: &Value) -> Vec<Token> {
    match value {
        Value::Object(map) => map.keys().cloned().map(Token::Key).collect(),
        Value::Array(seq) => (0..seq.len()).map(Token::Index).collect(),
        _ => Vec::new(),
    }
}

/// The values of a container, in order, cloned.
pub fn container_values(value: &Value) -> Vec<Value> {
    match value {
        Value::Object(map) => map.values().cloned().collect(),
        Value::Array(seq) => seq.clone(),
        _ => Vec::new(),
    }
}

/// Flattens a tree into a single-level mapping keyed by delimited paths
/// to every leaf. Separator occurrences inside keys are escaped with a
/// backslash so the produced paths tokenize back to the original keys.
/// Empty containers contribute no entries.
pub fn flatten_value(value: &Value, separator: Separator) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(value, "", separator.as_char(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, sep: char, out: &mut Map<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &join_path(prefix, &escape_key(key, sep), sep), sep, out);
            }
        }
        Value::Array(seq) => {
            for (index, child) in seq.iter().enumerate() {
                flatten_into(child, &join_path(prefix, &index.to_string(), sep), sep, out);
            }
        }
        leaf => {
            out.insert(prefix.to_string(), leaf.clone());
        }
    }
}

fn join_path(prefix: &str, key: &str, sep: char) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, sep, key)
    }
}

fn escape_key(key: &str, sep: char) -> String {
    key.replace(sep, &format!("\\{}", sep))
}

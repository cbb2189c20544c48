use serde_json::{Map, Value};

use crate::error::Error;
use crate::path::Token;
use crate::value::is_container;

/// Policy for absent keys and scalar intermediates during path resolution.
///
/// | situation                       | `Strict`      | `Safe`           | `Free`           |
/// |---------------------------------|---------------|------------------|------------------|
/// | intermediate key absent         | `KeyNotFound` | materialize `{}` | materialize `{}` |
/// | intermediate present but scalar | `UncountableValue` | `UncountableValue` | overwrite with `{}` |
/// | final key absent                | `KeyNotFound` | materialize `null` | materialize `null` |
///
/// Indexing into a scalar fails with `UncountableValue` in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMode {
    #[default]
    Strict,
    Safe,
    Free,
}

/// The resolved (target, parent, key) triple.
///
/// Grants mutable access to the addressed node and, unless the target is
/// the root, to the container it lives in and the key that locates it
/// there. The handle exists only for the duration of one dispatcher call.
#[derive(Debug)]
pub enum Resolved<'a> {
    /// The target is the root value; there is no parent and no key.
    Root(&'a mut Value),
    /// The target lives in a mapping under `key`.
    Entry {
        map: &'a mut Map<String, Value>,
        key: String,
    },
    /// The target lives in a sequence at `index`.
    Item {
        seq: &'a mut Vec<Value>,
        index: usize,
    },
}

impl<'a> Resolved<'a> {
    /// The target node.
    pub fn value(&self) -> &Value {
        match self {
            Resolved::Root(value) => value,
            Resolved::Entry { map, key } => map.get(key).expect("resolved entry is present"),
            Resolved::Item { seq, index } => &seq[*index],
        }
    }

    /// The target node, mutably. Writes are visible in the owning tree.
    pub fn value_mut(&mut self) -> &mut Value {
        match self {
            Resolved::Root(value) => value,
            Resolved::Entry { map, key } => map.get_mut(key).expect("resolved entry is present"),
            Resolved::Item { seq, index } => &mut seq[*index],
        }
    }

    /// The key by which the target is reached from its parent, or `None`
    /// for the root.
    pub fn key(&self) -> Option<Token> {
        match self {
            Resolved::Root(_) => None,
            Resolved::Entry { key, .. } => Some(Token::Key(key.clone())),
            Resolved::Item { index, .. } => Some(Token::Index(*index)),
        }
    }

    /// Returns true if the target is the root value.
    pub fn is_root(&self) -> bool {
        matches!(self, Resolved::Root(_))
    }

    /// Detaches the target from its parent and returns it. Removing the
    /// root leaves `Null` in its place.
    pub fn remove(self) -> Value {
        match self {
            Resolved::Root(value) => value.take(),
            Resolved::Entry { map, key } => {
                map.shift_remove(&key).expect("resolved entry is present")
            }
            Resolved::Item { seq, index } => seq.remove(index),
        }
    }
}

/// Walks `tokens` down from `root`, applying `mode` at each step, and
/// returns a handle to the addressed node.
///
/// With `require_container` set, a scalar target (including a freshly
/// materialized `null`) is rejected with `UncountableValue`. An empty
/// token sequence always resolves to the root, in any mode.
pub fn resolve<'a>(
    root: &'a mut Value,
    tokens: &[Token],
    require_container: bool,
    mode: IndexMode,
) -> Result<Resolved<'a>, Error> {
    let Some((last, inner)) = tokens.split_last() else {
        if require_container && !is_container(root) {
            return Err(Error::uncountable(""));
        }
        return Ok(Resolved::Root(root));
    };

    let mut current = root;
    for token in inner {
        current = descend(current, token, mode)?;
    }
    finish(current, last, require_container, mode)
}

/// One intermediate step: looks up `token` in `parent` and returns the
/// child, which is guaranteed to be a container.
fn descend<'a>(parent: &'a mut Value, token: &Token, mode: IndexMode) -> Result<&'a mut Value, Error> {
    match parent {
        Value::Object(map) => {
            let key = token.to_key();
            if !map.contains_key(&key) {
                if mode == IndexMode::Strict {
                    return Err(Error::key_not_found(key));
                }
                map.insert(key.clone(), Value::Object(Map::new()));
            }
            let child = map.get_mut(&key).expect("key was checked or inserted");
            enter(child, &key, mode)
        }
        Value::Array(seq) => {
            let key = token.to_key();
            let Some(index) = token.to_index() else {
                return Err(Error::key_not_found(key));
            };
            if index >= seq.len() {
                if mode == IndexMode::Strict {
                    return Err(Error::key_not_found(key));
                }
                seq.resize(index + 1, Value::Null);
                seq[index] = Value::Object(Map::new());
            }
            enter(&mut seq[index], &key, mode)
        }
        _ => Err(Error::uncountable(token.to_key())),
    }
}

/// Enforces container-ness on a present intermediate. Only `Free` is
/// allowed to pave over a scalar.
fn enter<'a>(child: &'a mut Value, key: &str, mode: IndexMode) -> Result<&'a mut Value, Error> {
    if is_container(child) {
        return Ok(child);
    }
    match mode {
        IndexMode::Free => {
            *child = Value::Object(Map::new());
            Ok(child)
        }
        _ => Err(Error::uncountable(key)),
    }
}

/// The final step: materializes the key with `null` where the mode allows
/// it and builds the handle.
fn finish<'a>(
    parent: &'a mut Value,
    token: &Token,
    require_container: bool,
    mode: IndexMode,
) -> Result<Resolved<'a>, Error> {
    match parent {
        Value::Object(map) => {
            let key = token.to_key();
            if !map.contains_key(&key) {
                if mode == IndexMode::Strict {
                    return Err(Error::key_not_found(key));
                }
                map.insert(key.clone(), Value::Null);
            }
            if require_container && !is_container(&map[&key]) {
                return Err(Error::uncountable(key));
            }
            Ok(Resolved::Entry { map, key })
        }
        Value::Array(seq) => {
            let key = token.to_key();
            let Some(index) = token.to_index() else {
                return Err(Error::key_not_found(key));
            };
            if index >= seq.len() {
                if mode == IndexMode::Strict {
                    return Err(Error::key_not_found(key));
                }
                seq.resize(index + 1, Value::Null);
            }
            if require_container && !is_container(&seq[index]) {
                return Err(Error::uncountable(key));
            }
            Ok(Resolved::Item { seq, index })
        }
        _ => Err(Error::uncountable(token.to_key())),
    }
}

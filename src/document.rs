use rand::Rng;
use serde_json::{Map, Value};

use crate::apply::apply;
use crate::error::Error;
use crate::path::{RawPath, Separator, Token};
use crate::resolve::IndexMode;
use crate::value::{container_keys, container_values, flatten_value, is_container, merge_values};

/// A pluggable integer-range random source: `(min, max) -> n` with
/// `min <= n <= max`, both bounds inclusive.
pub type RandomSource = Box<dyn FnMut(i64, i64) -> i64>;

/// How many probe draws a candidate random source must survive on the
/// range `[0, 1]` before it is accepted.
const RANDOM_SOURCE_PROBES: usize = 32;

/// A JSON value tree with dotted-path access.
///
/// Owns the root value, the path separator, and an optional random source
/// for the sampling helpers. Every operation flows through the one
/// resolve-then-apply entry point ([`apply`]); read-only lookups resolve
/// strictly and report misses as absence, while writes auto-create
/// missing intermediates.
///
/// ## Example
///
/// ```rust
/// use dotwalk::Document;
/// use serde_json::json;
///
/// let mut doc = Document::new();
/// doc.set("server.host", json!("localhost")).unwrap();
/// doc.set("server.ports", json!([80, 443])).unwrap();
///
/// assert_eq!(doc.get("server.host"), Some(json!("localhost")));
/// assert_eq!(doc.get("server.ports.1"), Some(json!(443)));
/// assert_eq!(doc.get("server.missing"), None);
/// ```
pub struct Document {
    root: Value,
    separator: Separator,
    random: Option<RandomSource>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document with an empty mapping as its root.
    pub fn new() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    /// Wraps an existing value tree.
    pub fn from_value(root: Value) -> Self {
        Document {
            root,
            separator: Separator::Dot,
            random: None,
        }
    }

    /// Decodes a JSON text into a document.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use dotwalk::{Document, Error};
    ///
    /// let mut doc = Document::from_json(r#"{"a": {"b": 1}}"#).unwrap();
    /// assert_eq!(doc.get("a.b"), Some(serde_json::json!(1)));
    ///
    /// assert!(matches!(Document::from_json("{oops"), Err(Error::Decode(_))));
    /// ```
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let root = serde_json::from_str(text).map_err(Error::decode)?;
        Ok(Self::from_value(root))
    }

    /// Uses `separator` for all string paths instead of the default dot.
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Registers `source` as the random source for the sampling helpers.
    ///
    /// The source is probed on the range `[0, 1]` and rejected with
    /// `InvalidArgument` if any draw falls outside it.
    pub fn set_random_source(&mut self, mut source: RandomSource) -> Result<(), Error> {
        for _ in 0..RANDOM_SOURCE_PROBES {
            let probe = source(0, 1);
            if probe != 0 && probe != 1 {
                return Err(Error::InvalidArgument(format!(
                    "random source returned {} for the range [0, 1]",
                    probe
                )));
            }
        }
        self.random = Some(source);
        Ok(())
    }

    /// The root value.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The root value, mutably.
    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// Consumes the document and returns the root value.
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Encodes the tree as JSON text.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(&self.root).map_err(Error::encode)
    }

    /// Encodes the tree as pretty-printed JSON text.
    pub fn to_json_pretty(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(&self.root).map_err(Error::encode)
    }

    /// Reads the value at `path`, or `None` if the path does not resolve.
    ///
    /// Resolves strictly: a miss never mutates the tree. Passing
    /// [`RawPath::Root`] returns the whole tree.
    pub fn get<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Option<Value> {
        apply(
            &mut self.root,
            path,
            self.separator,
            false,
            IndexMode::Strict,
            |handle| Ok(handle.value().clone()),
        )
        .ok()
    }

    /// Reads the value at `path`, falling back to `default` on a miss.
    pub fn get_or<'a>(&mut self, path: impl Into<RawPath<'a>>, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// Writes `value` at `path`, creating missing intermediates and paving
    /// over scalar ones.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use dotwalk::Document;
    /// use serde_json::json;
    ///
    /// let mut doc = Document::new();
    /// doc.set("x.y", json!(5)).unwrap();
    /// assert_eq!(doc.root(), &json!({"x": {"y": 5}}));
    /// ```
    pub fn set<'a>(&mut self, path: impl Into<RawPath<'a>>, value: Value) -> Result<(), Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            false,
            IndexMode::Free,
            |mut handle| {
                *handle.value_mut() = value;
                Ok(())
            },
        )
    }

    /// Writes `text` at `path`, first decoding it as JSON if possible.
    ///
    /// This is the explicit opportunistic-decode mode: `"[1, 2]"` becomes
    /// a sequence, `"plain"` stays a string. Use [`Document::set`] to
    /// store text verbatim.
    pub fn set_parsed<'a>(&mut self, path: impl Into<RawPath<'a>>, text: &str) -> Result<(), Error> {
        let value = serde_json::from_str(text).unwrap_or(Value::String(text.to_string()));
        self.set(path, value)
    }

    /// Removes the value at `path` and returns it.
    ///
    /// Resolves strictly: removing a missing path is `KeyNotFound`.
    /// Removing the root leaves `Null` behind.
    pub fn unset<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<Value, Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            false,
            IndexMode::Strict,
            |handle| Ok(handle.remove()),
        )
    }

    /// Returns true if `path` resolves to a value (including an explicit
    /// `null`).
    pub fn has<'a>(&mut self, path: impl Into<RawPath<'a>>) -> bool {
        apply(
            &mut self.root,
            path,
            self.separator,
            false,
            IndexMode::Strict,
            |_| Ok(()),
        )
        .is_ok()
    }

    /// Returns true if `path` resolves to a container.
    pub fn is_countable<'a>(&mut self, path: impl Into<RawPath<'a>>) -> bool {
        apply(
            &mut self.root,
            path,
            self.separator,
            false,
            IndexMode::Strict,
            |handle| Ok(is_container(handle.value())),
        )
        .unwrap_or(false)
    }

    /// The number of entries in the container at `path`.
    pub fn len<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<usize, Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            true,
            IndexMode::Strict,
            |handle| {
                Ok(match handle.value() {
                    Value::Object(map) => map.len(),
                    Value::Array(seq) => seq.len(),
                    _ => 0,
                })
            },
        )
    }

    /// The keys of the container at `path`, in order.
    pub fn keys<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<Vec<Token>, Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            true,
            IndexMode::Strict,
            |handle| Ok(container_keys(handle.value())),
        )
    }

    /// The values of the container at `path`, in order, cloned.
    pub fn values<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<Vec<Value>, Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            true,
            IndexMode::Strict,
            |handle| Ok(container_values(handle.value())),
        )
    }

    /// The first key of the container at `path`, if any.
    pub fn first_key<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<Option<Token>, Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            true,
            IndexMode::Strict,
            |handle| Ok(container_keys(handle.value()).into_iter().next()),
        )
    }

    /// The last key of the container at `path`, if any.
    pub fn last_key<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<Option<Token>, Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            true,
            IndexMode::Strict,
            |handle| Ok(container_keys(handle.value()).into_iter().last()),
        )
    }

    /// Appends `value` to the sequence at `path`.
    ///
    /// A missing or `null` target becomes an empty sequence first, so
    /// appending to a fresh path starts a new list. A mapping or scalar
    /// target is `UncountableValue`.
    pub fn append<'a>(&mut self, path: impl Into<RawPath<'a>>, value: Value) -> Result<(), Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            false,
            IndexMode::Free,
            |mut handle| {
                let at = handle.key().map(|t| t.to_key()).unwrap_or_default();
                let slot = handle.value_mut();
                if slot.is_null() {
                    *slot = Value::Array(Vec::new());
                }
                match slot {
                    Value::Array(seq) => {
                        seq.push(value);
                        Ok(())
                    }
                    _ => Err(Error::uncountable(at)),
                }
            },
        )
    }

    /// Prepends `value` to the sequence at `path`. Same target coercion
    /// rules as [`Document::append`].
    pub fn prepend<'a>(&mut self, path: impl Into<RawPath<'a>>, value: Value) -> Result<(), Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            false,
            IndexMode::Free,
            |mut handle| {
                let at = handle.key().map(|t| t.to_key()).unwrap_or_default();
                let slot = handle.value_mut();
                if slot.is_null() {
                    *slot = Value::Array(Vec::new());
                }
                match slot {
                    Value::Array(seq) => {
                        seq.insert(0, value);
                        Ok(())
                    }
                    _ => Err(Error::uncountable(at)),
                }
            },
        )
    }

    /// Deep-merges `value` into the node at `path`, creating the path if
    /// it does not exist. See [`merge_values`] for the merge rules.
    pub fn merge<'a>(&mut self, path: impl Into<RawPath<'a>>, value: Value) -> Result<(), Error> {
        apply(
            &mut self.root,
            path,
            self.separator,
            false,
            IndexMode::Free,
            |mut handle| {
                merge_values(handle.value_mut(), value);
                Ok(())
            },
        )
    }

    /// Flattens the tree into a single-level mapping keyed by delimited
    /// paths to every leaf. Separator characters inside keys are escaped
    /// so the produced paths resolve back to the original leaves.
    pub fn flatten(&mut self) -> Result<Value, Error> {
        let separator = self.separator;
        apply(
            &mut self.root,
            RawPath::Root,
            separator,
            true,
            IndexMode::Strict,
            |handle| Ok(Value::Object(flatten_value(handle.value(), separator))),
        )
    }

    /// Shuffles the container at `path` in place: a sequence's elements
    /// are permuted, a mapping's key order is permuted.
    pub fn shuffle<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<(), Error> {
        let Document {
            root,
            separator,
            random,
        } = self;
        apply(root, path, *separator, true, IndexMode::Strict, |mut handle| {
            match handle.value_mut() {
                Value::Array(seq) => shuffle_slice(seq, random),
                Value::Object(map) => {
                    let mut entries: Vec<(String, Value)> =
                        std::mem::take(map).into_iter().collect();
                    shuffle_slice(&mut entries, random);
                    *map = entries.into_iter().collect();
                }
                _ => {}
            }
            Ok(())
        })
    }

    /// A uniformly drawn key of the container at `path`. An empty
    /// container is `KeyNotFound`.
    pub fn random_key<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<Token, Error> {
        let Document {
            root,
            separator,
            random,
        } = self;
        apply(root, path, *separator, true, IndexMode::Strict, |handle| {
            let keys = container_keys(handle.value());
            pick(keys, random)
        })
    }

    /// A uniformly drawn value of the container at `path`. An empty
    /// container is `KeyNotFound`.
    pub fn random_value<'a>(&mut self, path: impl Into<RawPath<'a>>) -> Result<Value, Error> {
        let Document {
            root,
            separator,
            random,
        } = self;
        apply(root, path, *separator, true, IndexMode::Strict, |handle| {
            let values = container_values(handle.value());
            pick(values, random)
        })
    }

    /// Up to `count` values drawn from the container at `path` without
    /// replacement, in random order. `count` is clamped to the container
    /// length.
    pub fn sample<'a>(
        &mut self,
        path: impl Into<RawPath<'a>>,
        count: usize,
    ) -> Result<Vec<Value>, Error> {
        let Document {
            root,
            separator,
            random,
        } = self;
        apply(root, path, *separator, true, IndexMode::Strict, |handle| {
            let mut values = container_values(handle.value());
            shuffle_slice(&mut values, random);
            values.truncate(count);
            Ok(values)
        })
    }
}

fn draw(random: &mut Option<RandomSource>, min: i64, max: i64) -> i64 {
    match random {
        Some(source) => source(min, max),
        None => rand::rng().random_range(min..=max),
    }
}

/// Fisher-Yates, driven by the document's random source. Draws are
/// clamped to the valid range so a misbehaving source cannot panic us.
fn shuffle_slice<T>(items: &mut [T], random: &mut Option<RandomSource>) {
    for i in (1..items.len()).rev() {
        let j = draw(random, 0, i as i64).clamp(0, i as i64) as usize;
        items.swap(i, j);
    }
}

fn pick<T>(mut items: Vec<T>, random: &mut Option<RandomSource>) -> Result<T, Error> {
    if items.is_empty() {
        return Err(Error::key_not_found("random pick from an empty container"));
    }
    let max = (items.len() - 1) as i64;
    let index = draw(random, 0, max).clamp(0, max) as usize;
    Ok(items.swap_remove(index))
}

//! # dotwalk
//!
//! Dotted-path access into JSON value trees: point at any node with a
//! delimited path string like `"a.b.c"`, read it, write it, or restructure
//! it, with per-step policy over what happens when part of the path does
//! not exist yet.
//!
//! ## Features
//!
//! - **One resolver, many operations:** every operation (get, set, unset,
//!   append, merge, shuffle, sampling) is a thin closure over the same
//!   resolve-then-apply entry point ([`apply`]).
//! - **Three indexing modes:** [`IndexMode::Strict`] fails on the first
//!   missing key, [`IndexMode::Safe`] materializes missing intermediates,
//!   and [`IndexMode::Free`] additionally paves over scalars in the way.
//! - **Escapable delimiters:** `"a\\.b"` addresses the single key `a.b`;
//!   separators are configurable ([`Separator::Dot`], [`Separator::Slash`],
//!   or any custom character).
//! - **Sequences and mappings, uniformly:** numeric tokens index into
//!   sequences; key order in mappings is preserved.
//!
//! ## Basic usage
//!
//! ```rust
//! use dotwalk::Document;
//! use serde_json::json;
//!
//! let mut doc = Document::from_value(json!({"a": {"b": 1}}));
//! assert_eq!(doc.get("a.b"), Some(json!(1)));
//!
//! doc.set("x.y", json!(5)).unwrap();
//! assert_eq!(doc.get("x.y"), Some(json!(5)));
//!
//! // Missing paths read back as None; the tree is left untouched.
//! assert_eq!(doc.get("a.missing.deep"), None);
//! ```
//!
//! ## Working with the resolver directly
//!
//! ```rust
//! use dotwalk::{apply, IndexMode, Separator};
//! use serde_json::json;
//!
//! let mut tree = json!({});
//!
//! // Safe mode materializes the intermediate mapping for us.
//! apply(&mut tree, "x.y", Separator::Dot, false, IndexMode::Safe, |mut handle| {
//!     *handle.value_mut() = json!(5);
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(tree, json!({"x": {"y": 5}}));
//! ```
//!
//! ## Merging
//!
//! ```rust
//! use dotwalk::Document;
//! use serde_json::json;
//!
//! let mut doc = Document::from_value(json!({
//!     "settings": {"theme": {"color": "red", "size": 12}}
//! }));
//!
//! doc.merge("settings.theme", json!({"color": "blue"})).unwrap();
//!
//! assert_eq!(doc.root(), &json!({
//!     "settings": {"theme": {"color": "blue", "size": 12}}
//! }));
//! ```
//!
//! ## License
//!
//! See the [LICENSE](LICENSE) file for details.

mod apply;
mod document;
mod error;
mod path;
mod resolve;
mod value;

pub use apply::apply;
pub use document::{Document, RandomSource};
pub use error::Error;
pub use path::{tokenize, RawPath, Separator, Token};
pub use resolve::{resolve, IndexMode, Resolved};
pub use value::{container_keys, container_values, flatten_value, is_container, merge_values};

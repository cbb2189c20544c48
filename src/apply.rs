use serde_json::Value;

use crate::error::Error;
use crate::path::{tokenize, RawPath, Separator};
use crate::resolve::{resolve, IndexMode, Resolved};
use crate::value::is_container;

/// The single entry point every path operation flows through.
///
/// Resolves `path` against `root` under `mode`, optionally enforcing that
/// the target is a container, then invokes `operation` on the resolved
/// handle and returns its result unchanged.
///
/// Indexing into a scalar root is rejected with `UncountableValue` before
/// tokenization; the root path itself always resolves, whatever the root's
/// shape.
///
/// ## Example
///
/// ```rust
/// use dotwalk::{apply, IndexMode, Separator};
/// use serde_json::json;
///
/// let mut tree = json!({"a": {"b": 1}});
/// let read = apply(&mut tree, "a.b", Separator::Dot, false, IndexMode::Strict, |handle| {
///     Ok(handle.value().clone())
/// })
/// .unwrap();
/// assert_eq!(read, json!(1));
/// ```
pub fn apply<'a, 'v, R, F>(
    root: &'v mut Value,
    path: impl Into<RawPath<'a>>,
    separator: Separator,
    require_container: bool,
    mode: IndexMode,
    operation: F,
) -> Result<R, Error>
where
    F: FnOnce(Resolved<'v>) -> Result<R, Error>,
{
    let raw = path.into();
    if !raw.is_root() && !is_container(root) {
        return Err(Error::uncountable(""));
    }
    let tokens = tokenize(raw, separator)?;
    let handle = resolve(root, &tokens, require_container, mode)?;
    operation(handle)
}

use dotwalk::{apply, resolve, tokenize, Error, IndexMode, RawPath, Separator, Token};
use serde_json::{json, Value};
use yare::parameterized;

fn read(tree: &mut Value, path: &str, mode: IndexMode) -> Result<Value, Error> {
    apply(tree, path, Separator::Dot, false, mode, |handle| {
        Ok(handle.value().clone())
    })
}

fn write(tree: &mut Value, path: &str, mode: IndexMode, value: Value) -> Result<(), Error> {
    apply(tree, path, Separator::Dot, false, mode, |mut handle| {
        *handle.value_mut() = value;
        Ok(())
    })
}

// Present nested key, strict read.
#[test]
fn test_strict_read_of_present_key() {
    let mut tree = json!({"a": {"b": 1}});
    assert_eq!(read(&mut tree, "a.b", IndexMode::Strict).unwrap(), json!(1));
}

// A strict miss must not mutate the tree at all.
#[parameterized(
    missing_final = { "missing" },
    missing_intermediate = { "x.y" },
    missing_deep = { "a.nope.deeper" },
)]
fn test_strict_miss_leaves_tree_unchanged(path: &str) {
    let mut tree = json!({"a": {"b": 1}});
    let before = tree.clone();

    let result = read(&mut tree, path, IndexMode::Strict);

    assert!(matches!(result, Err(Error::KeyNotFound(_))));
    assert_eq!(tree, before);
}

// Writing into an empty tree creates the intermediate mapping.
#[parameterized(
    safe = { IndexMode::Safe },
    free = { IndexMode::Free },
)]
fn test_write_materializes_intermediates(mode: IndexMode) {
    let mut tree = json!({});
    write(&mut tree, "x.y", mode, json!(5)).unwrap();
    assert_eq!(tree, json!({"x": {"y": 5}}));

    // The materialized path re-resolves strictly.
    assert_eq!(read(&mut tree, "x.y", IndexMode::Strict).unwrap(), json!(5));
}

#[test]
fn test_safe_write_builds_every_intermediate_as_mapping() {
    let mut tree = json!({});
    write(&mut tree, "a.b.c.d", IndexMode::Safe, json!(true)).unwrap();

    assert!(tree["a"].is_object());
    assert!(tree["a"]["b"].is_object());
    assert!(tree["a"]["b"]["c"].is_object());
    assert_eq!(tree["a"]["b"]["c"]["d"], json!(true));
}

// A scalar standing where the path needs a container.
#[parameterized(
    strict = { IndexMode::Strict },
    safe = { IndexMode::Safe },
)]
fn test_scalar_intermediate_is_uncountable(mode: IndexMode) {
    let mut tree = json!({"a": 1});
    let result = read(&mut tree, "a.b", mode);
    assert!(matches!(result, Err(Error::UncountableValue(_))));
    assert_eq!(tree, json!({"a": 1}));
}

#[test]
fn test_free_paves_over_scalar_intermediate() {
    let mut tree = json!({"a": 1});
    write(&mut tree, "a.b", IndexMode::Free, json!(2)).unwrap();
    assert_eq!(tree, json!({"a": {"b": 2}}));
}

// A scalar root cannot be indexed into, whatever the mode.
#[parameterized(
    strict = { IndexMode::Strict },
    safe = { IndexMode::Safe },
    free = { IndexMode::Free },
)]
fn test_scalar_root_rejects_any_path(mode: IndexMode) {
    let mut tree = json!(5);
    let result = read(&mut tree, "a", mode);
    assert!(matches!(result, Err(Error::UncountableValue(_))));
    assert_eq!(tree, json!(5));
}

// The empty path always resolves to the root, for any mode and shape.
#[parameterized(
    strict_scalar = { IndexMode::Strict, json!(5) },
    safe_scalar = { IndexMode::Safe, json!("text") },
    free_null = { IndexMode::Free, json!(null) },
    strict_mapping = { IndexMode::Strict, json!({"a": 1}) },
    free_sequence = { IndexMode::Free, json!([1, 2]) },
)]
fn test_root_path_always_resolves(mode: IndexMode, root: Value) {
    let mut tree = root.clone();
    let result = apply(&mut tree, RawPath::Root, Separator::Dot, false, mode, |handle| {
        assert!(handle.is_root());
        assert!(handle.key().is_none());
        Ok(handle.value().clone())
    });
    assert_eq!(result.unwrap(), root);
}

#[test]
fn test_numeric_token_indexes_into_sequence() {
    let mut tree = json!({"arr": [1, 2, 3]});
    assert_eq!(read(&mut tree, "arr.1", IndexMode::Strict).unwrap(), json!(2));
}

#[test]
fn test_safe_write_past_sequence_end_pads_with_nulls() {
    let mut tree = json!({"arr": [1]});
    write(&mut tree, "arr.3", IndexMode::Safe, json!(9)).unwrap();
    assert_eq!(tree, json!({"arr": [1, null, null, 9]}));
}

#[test]
fn test_safe_descent_past_sequence_end_materializes_mapping() {
    let mut tree = json!({"arr": []});
    write(&mut tree, "arr.1.name", IndexMode::Safe, json!("x")).unwrap();
    assert_eq!(tree, json!({"arr": [null, {"name": "x"}]}));
}

#[parameterized(
    strict = { IndexMode::Strict },
    safe = { IndexMode::Safe },
    free = { IndexMode::Free },
)]
fn test_non_numeric_key_on_sequence_is_not_found(mode: IndexMode) {
    let mut tree = json!({"arr": [1, 2]});
    let result = read(&mut tree, "arr.name", mode);
    assert!(matches!(result, Err(Error::KeyNotFound(_))));
}

#[test]
fn test_strict_sequence_index_out_of_range_is_not_found() {
    let mut tree = json!({"arr": [1, 2]});
    let result = read(&mut tree, "arr.5", IndexMode::Strict);
    assert!(matches!(result, Err(Error::KeyNotFound(_))));
    assert_eq!(tree, json!({"arr": [1, 2]}));
}

#[parameterized(
    scalar_final = { json!({"a": 1}), "a" },
    null_final = { json!({"a": null}), "a" },
    string_final = { json!({"a": "text"}), "a" },
)]
fn test_require_container_rejects_scalar_target(tree: Value, path: &str) {
    let mut tree = tree;
    let result = apply(
        &mut tree,
        path,
        Separator::Dot,
        true,
        IndexMode::Strict,
        |_| Ok(()),
    );
    assert!(matches!(result, Err(Error::UncountableValue(_))));
}

#[test]
fn test_require_container_rejects_scalar_root() {
    let mut tree = json!(5);
    let result = resolve(&mut tree, &[], true, IndexMode::Strict);
    assert!(matches!(result, Err(Error::UncountableValue(_))));
}

#[test]
fn test_require_container_accepts_containers() {
    let mut tree = json!({"map": {"k": 1}, "seq": [1]});
    for path in ["map", "seq"] {
        apply(&mut tree, path, Separator::Dot, true, IndexMode::Strict, |_| Ok(())).unwrap();
    }
}

// A null read back from a present key is indistinguishable from one
// materialized by a safe miss; both are "present" to existence checks.
#[test]
fn test_materialized_null_matches_stored_null() {
    let mut tree = json!({"stored": null});

    let stored = read(&mut tree, "stored", IndexMode::Strict).unwrap();
    let materialized = read(&mut tree, "fresh", IndexMode::Safe).unwrap();

    assert_eq!(stored, json!(null));
    assert_eq!(materialized, json!(null));
    assert_eq!(tree, json!({"stored": null, "fresh": null}));

    // Both now resolve strictly.
    assert!(read(&mut tree, "stored", IndexMode::Strict).is_ok());
    assert!(read(&mut tree, "fresh", IndexMode::Strict).is_ok());
}

// Round trip: write then read returns a structurally equal value, for
// every value shape.
#[parameterized(
    null = { json!(null) },
    boolean = { json!(true) },
    number = { json!(42.5) },
    string = { json!("text") },
    sequence = { json!([1, "two", false]) },
    mapping = { json!({"a": 1, "b": "two"}) },
)]
fn test_write_read_round_trip(value: Value) {
    let mut tree = json!({});
    write(&mut tree, "under.here", IndexMode::Safe, value.clone()).unwrap();
    assert_eq!(read(&mut tree, "under.here", IndexMode::Strict).unwrap(), value);
}

#[test]
fn test_handle_reports_parent_key() {
    let mut tree = json!({"a": {"b": 1}, "seq": [10, 20]});

    apply(&mut tree, "a.b", Separator::Dot, false, IndexMode::Strict, |handle| {
        assert_eq!(handle.key(), Some(Token::Key("b".to_string())));
        Ok(())
    })
    .unwrap();

    apply(&mut tree, "seq.1", Separator::Dot, false, IndexMode::Strict, |handle| {
        assert_eq!(handle.key(), Some(Token::Index(1)));
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_handle_remove_detaches_from_mapping_and_sequence() {
    let mut tree = json!({"a": {"b": 1}, "seq": [10, 20, 30]});

    let removed = apply(&mut tree, "a.b", Separator::Dot, false, IndexMode::Strict, |handle| {
        Ok(handle.remove())
    })
    .unwrap();
    assert_eq!(removed, json!(1));

    let removed = apply(&mut tree, "seq.1", Separator::Dot, false, IndexMode::Strict, |handle| {
        Ok(handle.remove())
    })
    .unwrap();
    assert_eq!(removed, json!(20));

    assert_eq!(tree, json!({"a": {}, "seq": [10, 30]}));
}

#[test]
fn test_resolve_with_pre_tokenized_path() {
    let mut tree = json!({"a": {"b": [1, 2]}});
    let tokens = tokenize("a.b.0", Separator::Dot).unwrap();

    let mut handle = resolve(&mut tree, &tokens, false, IndexMode::Strict).unwrap();
    *handle.value_mut() = json!(99);

    assert_eq!(tree, json!({"a": {"b": [99, 2]}}));
}

#[test]
fn test_escaped_delimiter_addresses_literal_key() {
    let mut tree = json!({"a.b": {"c": 1}});
    assert_eq!(
        read(&mut tree, "a\\.b.c", IndexMode::Strict).unwrap(),
        json!(1)
    );
}

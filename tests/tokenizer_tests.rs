use dotwalk::{tokenize, RawPath, Separator, Token};
use yare::parameterized;

fn keys(keys: &[&str]) -> Vec<Token> {
    keys.iter().map(|k| Token::Key(k.to_string())).collect()
}

#[parameterized(
    simple = { "a.b.c", Separator::Dot, &["a", "b", "c"] },
    single_key = { "key", Separator::Dot, &["key"] },
    escaped_delimiter = { "a\\.b.c", Separator::Dot, &["a.b", "c"] },
    escaped_only = { "a\\.b", Separator::Dot, &["a.b"] },
    slash_separator = { "a/b", Separator::Slash, &["a", "b"] },
    slash_leaves_dots_alone = { "a.b/c", Separator::Slash, &["a.b", "c"] },
    custom_separator = { "a|b|c", Separator::Custom('|'), &["a", "b", "c"] },
    empty_string_is_empty_key = { "", Separator::Dot, &[""] },
    trailing_separator = { "a.", Separator::Dot, &["a", ""] },
    leading_separator = { ".a", Separator::Dot, &["", "a"] },
    adjacent_separators = { "a..b", Separator::Dot, &["a", "", "b"] },
    lone_backslash_is_literal = { "a\\b", Separator::Dot, &["a\\b"] },
    trailing_backslash = { "a\\", Separator::Dot, &["a\\"] },
    backslash_before_escape = { "a\\\\.b", Separator::Dot, &["a\\.b"] },
    numeric_segments = { "arr.0.name", Separator::Dot, &["arr", "0", "name"] },
    unicode = { "ключ.значение", Separator::Dot, &["ключ", "значение"] },
    key_with_spaces = { "outer key.inner key", Separator::Dot, &["outer key", "inner key"] },
)]
fn test_tokenize_text(input: &str, separator: Separator, expected: &[&str]) {
    let tokens = tokenize(input, separator).expect("Failed to tokenize input");
    assert_eq!(tokens, keys(expected));
}

#[test]
fn test_tokenize_root_is_empty() {
    assert!(tokenize(RawPath::Root, Separator::Dot).unwrap().is_empty());
}

#[test]
fn test_tokenize_none_is_root() {
    assert!(tokenize(None::<&str>, Separator::Dot).unwrap().is_empty());
}

#[test]
fn test_tokenize_integer_is_single_index() {
    let tokens = tokenize(7usize, Separator::Dot).unwrap();
    assert_eq!(tokens, vec![Token::Index(7)]);
}

#[parameterized(
    numeric_key_coerces = { Token::Key("3".to_string()), Some(3) },
    plain_key_does_not = { Token::Key("name".to_string()), None },
    negative_does_not = { Token::Key("-1".to_string()), None },
    index_is_itself = { Token::Index(2), Some(2) },
)]
fn test_token_to_index(token: Token, expected: Option<usize>) {
    assert_eq!(token.to_index(), expected);
}

#[parameterized(
    key = { Token::Key("name".to_string()), "name" },
    index_coerces_to_decimal = { Token::Index(12), "12" },
)]
fn test_token_to_key(token: Token, expected: &str) {
    assert_eq!(token.to_key(), expected);
}

#[test]
fn test_escaped_key_round_trips_through_display() {
    let tokens = tokenize("a\\.b.c", Separator::Dot).unwrap();
    assert_eq!(tokens[0].to_string(), "a.b");
    assert_eq!(tokens[1].to_string(), "c");
}

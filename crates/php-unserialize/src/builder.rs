//! Value builder: turns a certified parse tree into native values.
//!
//! The grammar matcher already certified lengths, counts and key types, so
//! building cannot fail. The one decision made here is whether a compound
//! node becomes a [`Value::Sequence`] or a [`Value::Mapping`].

use std::borrow::Cow;

use crate::error::Result;
use crate::grammar::{KeyNode, Matcher, MatcherConfig, ParseNode};
use crate::value::{Key, Value};

/// Build a native value from a matched parse node.
pub fn build(node: ParseNode<'_>) -> Value<'_> {
    match node {
        ParseNode::Null => Value::Null,
        ParseNode::Bool(b) => Value::Bool(b),
        ParseNode::Int(i) => Value::Int(i),
        ParseNode::Float(f) => Value::Float(f),
        ParseNode::Str(s) => Value::String(Cow::Borrowed(s)),
        ParseNode::Compound(pairs) => build_compound(pairs),
    }
}

/// Whether a compound node's keys, in encounter order, are exactly
/// `0, 1, …, n-1`. Only such nodes become sequences.
pub fn keys_are_sequential(pairs: &[(KeyNode<'_>, ParseNode<'_>)]) -> bool {
    pairs
        .iter()
        .enumerate()
        .all(|(i, (key, _))| matches!(key, KeyNode::Int(k) if *k == i as i64))
}

fn build_compound<'a>(pairs: Vec<(KeyNode<'a>, ParseNode<'a>)>) -> Value<'a> {
    if keys_are_sequential(&pairs) {
        return Value::Sequence(pairs.into_iter().map(|(_, v)| build(v)).collect());
    }

    // Duplicate keys: last write wins, but the entry keeps the position of
    // the key's first occurrence, like re-assigning an existing array slot.
    let mut entries: Vec<(Key<'_>, Value<'_>)> = Vec::with_capacity(pairs.len());
    for (key, node) in pairs {
        let key = build_key(key);
        let value = build(node);
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }
    Value::Mapping(entries)
}

fn build_key(key: KeyNode<'_>) -> Key<'_> {
    match key {
        KeyNode::Int(i) => Key::Int(i),
        KeyNode::Str(s) => Key::String(Cow::Borrowed(s)),
    }
}

/// Decode one serialized document into a native value.
///
/// An empty input is a valid document and yields `Ok(None)`. Trailing bytes
/// after the top-level value are an error.
///
/// # Example
///
/// ```rust
/// use php_unserialize::decode;
///
/// let value = decode(b"i:42;").unwrap().unwrap();
/// assert_eq!(value.as_int(), Some(42));
/// ```
#[inline]
pub fn decode(data: &[u8]) -> Result<Option<Value<'_>>> {
    decode_with_config(data, MatcherConfig::default())
}

/// Decode one serialized document with a custom matcher configuration.
///
/// # Example
///
/// ```rust
/// use php_unserialize::{decode_with_config, MatcherConfig};
///
/// let config = MatcherConfig { max_depth: 64 };
/// let value = decode_with_config(b"i:42;", config).unwrap();
/// assert!(value.is_some());
/// ```
#[inline]
pub fn decode_with_config(data: &[u8], config: MatcherConfig) -> Result<Option<Value<'_>>> {
    let mut matcher = Matcher::with_config(data, config);
    Ok(matcher.match_document()?.map(build))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn decode_one(data: &[u8]) -> Value<'_> {
        decode(data).unwrap().unwrap()
    }

    #[test]
    fn test_empty_input_is_no_value() {
        assert_eq!(decode(b"").unwrap(), None);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode_one(b"N;"), Value::Null);
        assert_eq!(decode_one(b"b:1;"), Value::Bool(true));
        assert_eq!(decode_one(b"i:42;"), Value::Int(42));
        assert_eq!(decode_one(b"s:3:\"foo\";").as_str(), Some("foo"));
    }

    #[test]
    fn test_float_exact_equality() {
        assert_eq!(decode_one(b"d:5;"), Value::Float(5.0));
        assert_eq!(decode_one(b"d:9.0;"), Value::Float(9.0));
    }

    #[test]
    fn test_multibyte_string_round_trips_by_byte_length() {
        let value = decode_one("s:3:\"√\";".as_bytes());
        assert_eq!(value.as_str(), Some("√"));
        // Re-encoding with the true byte length reproduces a decodable document
        let reencoded = format!("s:{}:\"{}\";", "√".len(), "√");
        assert_eq!(decode_one(reencoded.as_bytes()), value);
    }

    #[test]
    fn test_sequential_keys_make_a_sequence() {
        let value = decode_one(b"a:1:{i:0;s:3:\"foo\";}");
        assert_eq!(
            value,
            Value::Sequence(vec![Value::String(Cow::Borrowed(b"foo"))])
        );
    }

    #[test]
    fn test_mixed_value_sequence_preserves_order() {
        let value = decode_one(b"a:3:{i:0;s:3:\"foo\";i:1;i:42;i:2;d:42.5;}");
        assert_eq!(
            value,
            Value::Sequence(vec![
                Value::String(Cow::Borrowed(b"foo")),
                Value::Int(42),
                Value::Float(42.5),
            ])
        );
    }

    #[test]
    fn test_string_keys_make_a_mapping() {
        let value = decode_one(b"a:1:{s:3:\"foo\";i:42;}");
        assert_eq!(
            value,
            Value::Mapping(vec![(Key::String(Cow::Borrowed(b"foo")), Value::Int(42))])
        );
    }

    #[test]
    fn test_non_contiguous_int_keys_make_a_mapping() {
        let value = decode_one(b"a:2:{i:5;s:1:\"a\";i:10;s:1:\"b\";}");
        let pairs = value.as_mapping().unwrap();
        assert_eq!(pairs[0].0, Key::Int(5));
        assert_eq!(pairs[1].0, Key::Int(10));
    }

    #[test]
    fn test_keys_not_starting_at_zero_make_a_mapping() {
        let value = decode_one(b"a:2:{i:1;N;i:2;N;}");
        assert!(value.is_mapping());
    }

    #[test]
    fn test_keys_out_of_order_make_a_mapping() {
        let value = decode_one(b"a:2:{i:1;s:1:\"b\";i:0;s:1:\"a\";}");
        assert!(value.is_mapping());
    }

    #[test]
    fn test_empty_compound_is_an_empty_sequence() {
        assert_eq!(decode_one(b"a:0:{}"), Value::Sequence(vec![]));
    }

    #[test]
    fn test_mapping_preserves_insertion_order() {
        let value = decode_one(b"a:3:{s:1:\"a\";s:3:\"bar\";s:1:\"b\";i:1;s:1:\"c\";b:0;}");
        let pairs = value.as_mapping().unwrap();
        let keys: Vec<_> = pairs.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(value.get("b"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let value = decode_one(b"a:3:{s:1:\"k\";i:1;s:1:\"x\";i:2;s:1:\"k\";i:3;}");
        let pairs = value.as_mapping().unwrap();
        // Last write wins, entry stays at first occurrence position
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], (Key::String(Cow::Borrowed(b"k")), Value::Int(3)));
        assert_eq!(pairs[1], (Key::String(Cow::Borrowed(b"x")), Value::Int(2)));
    }

    #[test]
    fn test_duplicate_int_keys_last_write_wins() {
        let value = decode_one(b"a:2:{i:7;s:1:\"a\";i:7;s:1:\"b\";}");
        let pairs = value.as_mapping().unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1.as_str(), Some("b"));
    }

    #[test]
    fn test_nested_compounds() {
        let value = decode_one(b"a:1:{s:3:\"foo\";a:1:{i:0;i:5;}}");
        let inner = value.get("foo").unwrap();
        assert_eq!(inner, &Value::Sequence(vec![Value::Int(5)]));
    }

    #[test]
    fn test_sequence_of_sequences() {
        let value = decode_one(b"a:1:{i:0;a:0:{}}");
        assert_eq!(
            value,
            Value::Sequence(vec![Value::Sequence(vec![])])
        );
    }

    #[test]
    fn test_keys_are_sequential_check() {
        use crate::grammar::{KeyNode, ParseNode};

        let sequential = vec![
            (KeyNode::Int(0), ParseNode::Null),
            (KeyNode::Int(1), ParseNode::Null),
        ];
        assert!(keys_are_sequential(&sequential));

        let gapped = vec![
            (KeyNode::Int(0), ParseNode::Null),
            (KeyNode::Int(2), ParseNode::Null),
        ];
        assert!(!keys_are_sequential(&gapped));

        let string_keyed = vec![(KeyNode::Str(b"0"), ParseNode::Null)];
        assert!(!keys_are_sequential(&string_keyed));

        assert!(keys_are_sequential(&[]));
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let err = decode(b"s:4:\"foo\";").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::StringLengthMismatch { .. }));
    }

    #[test]
    fn test_decode_is_stable_across_calls() {
        let data = b"a:2:{s:1:\"a\";i:1;s:1:\"b\";i:2;}";
        assert_eq!(decode(data).unwrap(), decode(data).unwrap());
    }
}

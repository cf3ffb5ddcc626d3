//! Decoded value types.

use std::borrow::Cow;
use std::fmt;

/// A decoded PHP value.
///
/// `a:` structures materialize either as [`Value::Sequence`] or
/// [`Value::Mapping`] depending on their keys; see [`crate::builder`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value<'a> {
    /// PHP null.
    #[default]
    Null,

    /// PHP boolean.
    Bool(bool),

    /// PHP integer.
    Int(i64),

    /// PHP float/double.
    Float(f64),

    /// PHP string: raw content bytes, not necessarily valid UTF-8.
    /// Uses Cow for zero-copy when possible.
    String(Cow<'a, [u8]>),

    /// Array whose keys were exactly `0, 1, …, n-1` in input order.
    Sequence(Vec<Value<'a>>),

    /// Array with any other key shape. Pairs preserve insertion order and
    /// keys are unique.
    Mapping(Vec<(Key<'a>, Value<'a>)>),
}

/// A mapping key: PHP array keys are always integers or strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Key<'a> {
    /// Integer key.
    Int(i64),
    /// String key (raw bytes).
    String(Cow<'a, [u8]>),
}

impl<'a> Key<'a> {
    /// Get the key as an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::String(_) => None,
        }
    }

    /// Get the key as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Key::String(s) => Some(s.as_ref()),
            Key::Int(_) => None,
        }
    }

    /// Get the key as a UTF-8 string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(s) => std::str::from_utf8(s.as_ref()).ok(),
            Key::Int(_) => None,
        }
    }

    /// Convert to a key that doesn't borrow from the input.
    pub fn into_owned(self) -> Key<'static> {
        match self {
            Key::Int(i) => Key::Int(i),
            Key::String(s) => Key::String(Cow::Owned(s.into_owned())),
        }
    }
}

impl<'a> Value<'a> {
    /// Check if the value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if the value is a boolean.
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if the value is an integer.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Check if the value is a float.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if the value is a string.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if the value is a sequence.
    #[inline]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Check if the value is a mapping.
    #[inline]
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Get the value as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float.
    ///
    /// Integers widen to `f64` for convenience.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Get the value as a UTF-8 string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => std::str::from_utf8(s.as_ref()).ok(),
            _ => None,
        }
    }

    /// Get the value as a sequence slice.
    #[inline]
    pub fn as_sequence(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::Sequence(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Get the value as mapping pairs.
    #[inline]
    pub fn as_mapping(&self) -> Option<&[(Key<'a>, Value<'a>)]> {
        match self {
            Value::Mapping(m) => Some(m.as_slice()),
            _ => None,
        }
    }

    /// Look up a mapping entry by string key.
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_bytes() == Some(key.as_bytes()))
            .map(|(_, v)| v)
    }

    /// Look up a mapping entry by integer key.
    pub fn get_int(&self, key: i64) -> Option<&Value<'a>> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_int() == Some(key))
            .map(|(_, v)| v)
    }

    /// Convert to a value that doesn't borrow from the input.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Int(i) => Value::Int(i),
            Value::Float(f) => Value::Float(f),
            Value::String(s) => Value::String(Cow::Owned(s.into_owned())),
            Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Value::into_owned).collect())
            }
            Value::Mapping(pairs) => Value::Mapping(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect(),
            ),
        }
    }

    /// Get a type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::String(s) => match std::str::from_utf8(s) {
                Ok(s) => write!(f, "\"{}\"", s),
                Err(_) => write!(f, "<binary {} bytes>", s.len()),
            },
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => match std::str::from_utf8(s) {
                Ok(s) => write!(f, "\"{}\"", s),
                Err(_) => write!(f, "<binary {} bytes>", s.len()),
            },
            Value::Sequence(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Mapping(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

//! Strict decoder for PHP's `serialize()` format.
//!
//! This crate reads data dumps and session payloads produced by PHP's native
//! `serialize()` without running PHP. It is built as two strictly layered
//! parts: a grammar matcher that certifies the token structure and produces
//! a transient parse tree, and a value builder that turns that tree into
//! native values.
//!
//! # Features
//!
//! - **Zero-copy strings** - String content borrows directly from the input
//! - **Strict matching** - Declared lengths and counts are trusted and
//!   verified exactly, with no lenient recovery
//! - **Sequence/mapping resolution** - Arrays whose keys are exactly
//!   `0..n-1` become sequences, everything else a mapping that preserves
//!   insertion order
//! - **Detailed errors** - Precise byte positions and input previews
//!
//! # Quick Start
//!
//! ```rust
//! use php_unserialize::{decode, Value};
//!
//! let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
//! let value = decode(data).unwrap().unwrap();
//!
//! assert_eq!(value.get("name").and_then(Value::as_str), Some("Alice"));
//! assert_eq!(value.get("age").and_then(Value::as_int), Some(30));
//! ```
//!
//! An empty document is valid and decodes to `None`:
//!
//! ```rust
//! use php_unserialize::decode;
//!
//! assert_eq!(decode(b"").unwrap(), None);
//! ```
//!
//! # Supported Tags
//!
//! | Tag | Decoded Type |
//! |-----|--------------|
//! | `N;` | `Value::Null` |
//! | `b:0;` / `b:1;` | `Value::Bool(bool)` |
//! | `i:<digits>;` | `Value::Int(i64)` |
//! | `d:<number>;` | `Value::Float(f64)` |
//! | `s:<len>:"<bytes>";` | `Value::String(Cow<[u8]>)` |
//! | `a:<count>:{…}` | `Value::Sequence` or `Value::Mapping` |
//!
//! Object tags (`O:`, `C:`, `E:`) and references (`R:`, `r:`) are out of
//! scope and fail with [`ErrorKind::UnknownTag`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)]

pub mod builder;
pub mod error;
pub mod grammar;
pub mod value;

#[cfg(feature = "serde")]
pub mod json;

pub use builder::{build, decode, decode_with_config, keys_are_sequential};
pub use error::{DecodeError, ErrorKind, Result};
pub use grammar::{KeyNode, Matcher, MatcherConfig, ParseNode};
pub use value::{Key, Value};

#[cfg(feature = "serde")]
pub use json::to_json;

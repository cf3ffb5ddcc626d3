//! Grammar matcher for the PHP serialize format.
//!
//! A hand-written recursive-descent matcher over a byte buffer. It certifies
//! that a prefix of the input follows a value production and returns the
//! matched structure as a [`ParseNode`] tree; native value construction is
//! the [`crate::builder`] module's job.
//!
//! The matcher is strict: it trusts declared string lengths instead of
//! scanning for a closing quote, never skips whitespace, and treats any
//! length or count mismatch as a hard failure.
//!
//! # Tracing Support
//!
//! Enable the `tracing` feature for detailed matching instrumentation:
//!
//! ```toml
//! php-unserialize = { version = "0.1", features = ["tracing"] }
//! ```

use memchr::memchr;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace, warn};

use crate::error::{DecodeError, ErrorKind, Result};

/// Maximum nesting depth to prevent stack overflow.
const MAX_DEPTH: usize = 512;

/// One matched grammar production.
///
/// Nodes borrow string content directly from the input and only live between
/// matching and building; [`crate::builder::build`] consumes them.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode<'a> {
    /// `N;`
    Null,
    /// `b:0;` or `b:1;`
    Bool(bool),
    /// `i:<digits>;`
    Int(i64),
    /// `d:<number>;`
    Float(f64),
    /// `s:<len>:"<bytes>";` — exactly `<len>` content bytes.
    Str(&'a [u8]),
    /// `a:<count>:{<pairs>}` — pairs in input order, keys already certified.
    Compound(Vec<(KeyNode<'a>, ParseNode<'a>)>),
}

/// A compound key production: the grammar only admits `i:` and `s:` keys.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyNode<'a> {
    /// Integer key.
    Int(i64),
    /// String key (raw content bytes).
    Str(&'a [u8]),
}

/// Matcher configuration options.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Maximum nesting depth for compound values.
    pub max_depth: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

/// A zero-copy matcher over one serialized document.
pub struct Matcher<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current position in the input.
    pos: usize,
    /// Matcher configuration.
    config: MatcherConfig,
    /// Current nesting depth.
    depth: usize,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher with default configuration.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, MatcherConfig::default())
    }

    /// Create a new matcher with custom configuration.
    pub fn with_config(data: &'a [u8], config: MatcherConfig) -> Self {
        Self {
            data,
            pos: 0,
            config,
            depth: 0,
        }
    }

    /// Current byte offset; `&data[pos()..]` is the unconsumed remainder.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Match a complete document.
    ///
    /// An empty document is valid and yields `None`. Anything else must be
    /// exactly one value with no trailing bytes.
    #[cfg_attr(feature = "tracing", instrument(skip(self), fields(data_len = self.data.len())))]
    pub fn match_document(&mut self) -> Result<Option<ParseNode<'a>>> {
        #[cfg(feature = "tracing")]
        debug!(data_len = self.data.len(), "matching document");

        if self.data.is_empty() {
            return Ok(None);
        }

        let node = self.match_value()?;

        if self.pos < self.data.len() {
            #[cfg(feature = "tracing")]
            warn!(pos = self.pos, "trailing bytes after top-level value");
            return Err(DecodeError::new(
                ErrorKind::TrailingBytes(self.data.len() - self.pos),
                self.pos,
            )
            .with_input_preview(self.data, self.pos));
        }

        Ok(Some(node))
    }

    /// Match a single value production at the current position.
    ///
    /// This is the core dispatch: it consumes exactly one value and leaves
    /// the cursor on the byte after it, so callers can continue matching.
    #[cfg_attr(feature = "tracing", instrument(skip(self), level = "trace", fields(pos = self.pos, depth = self.depth)))]
    pub fn match_value(&mut self) -> Result<ParseNode<'a>> {
        if self.depth > self.config.max_depth {
            #[cfg(feature = "tracing")]
            warn!(depth = self.depth, max_depth = self.config.max_depth, "max depth exceeded");
            return Err(DecodeError::new(
                ErrorKind::MaxDepthExceeded(self.config.max_depth),
                self.pos,
            ));
        }

        let tag = self.peek_byte()?;

        #[cfg(feature = "tracing")]
        trace!(tag = %char::from(tag), pos = self.pos, "matching value");

        match tag {
            b'N' => self.match_null(),
            b'b' => self.match_bool(),
            b'i' => Ok(ParseNode::Int(self.read_int()?)),
            b'd' => self.match_float(),
            b's' => Ok(ParseNode::Str(self.read_string()?)),
            b'a' => self.match_compound(),
            _ => {
                #[cfg(feature = "tracing")]
                warn!(tag = %char::from(tag), pos = self.pos, "unknown tag");
                Err(
                    DecodeError::new(ErrorKind::UnknownTag(tag as char), self.pos)
                        .with_input_preview(self.data, self.pos),
                )
            }
        }
    }

    /// Match a null value: `N;`
    ///
    /// Case-sensitive; a lowercase `n` never reaches here and fails dispatch
    /// as an unknown tag.
    fn match_null(&mut self) -> Result<ParseNode<'a>> {
        self.expect_byte(b'N')?;
        self.expect_byte(b';')?;
        Ok(ParseNode::Null)
    }

    /// Match a boolean value: `b:0;` or `b:1;`
    fn match_bool(&mut self) -> Result<ParseNode<'a>> {
        self.expect_byte(b'b')?;
        self.expect_byte(b':')?;
        let value_byte = self.read_byte()?;
        self.expect_byte(b';')?;

        match value_byte {
            b'0' => Ok(ParseNode::Bool(false)),
            b'1' => Ok(ParseNode::Bool(true)),
            _ => Err(DecodeError::new(
                ErrorKind::InvalidBoolean((value_byte as char).to_string()),
                self.pos - 2,
            )),
        }
    }

    /// Match an integer production: `i:<digits>;`
    fn read_int(&mut self) -> Result<i64> {
        self.expect_byte(b'i')?;
        self.expect_byte(b':')?;

        let start = self.pos;
        let digits = self.read_until(b';')?;

        let int_str = std::str::from_utf8(digits).map_err(|_| {
            DecodeError::new(ErrorKind::InvalidInteger("invalid UTF-8".into()), start)
        })?;

        let value: i64 = int_str.parse().map_err(|_| {
            DecodeError::new(ErrorKind::InvalidInteger(int_str.to_string()), start)
                .with_input_preview(self.data, start)
        })?;

        self.expect_byte(b';')?;
        Ok(value)
    }

    /// Match a float value: `d:<number>;`
    ///
    /// `d:5;` and `d:9.0;` are both valid and yield exact floats. PHP also
    /// emits `INF`, `-INF` and `NAN` literals.
    fn match_float(&mut self) -> Result<ParseNode<'a>> {
        self.expect_byte(b'd')?;
        self.expect_byte(b':')?;

        let start = self.pos;
        let literal = self.read_until(b';')?;

        let float_str = std::str::from_utf8(literal).map_err(|_| {
            DecodeError::new(ErrorKind::InvalidFloat("invalid UTF-8".into()), start)
        })?;

        let value: f64 = match float_str {
            "INF" => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            "NAN" => f64::NAN,
            _ => float_str.parse().map_err(|_| {
                DecodeError::new(ErrorKind::InvalidFloat(float_str.to_string()), start)
                    .with_input_preview(self.data, start)
            })?,
        };

        self.expect_byte(b';')?;
        Ok(ParseNode::Float(value))
    }

    /// Match a string production: `s:<len>:"<bytes>";`
    ///
    /// The declared length is trusted: exactly `<len>` content bytes are
    /// taken, so content may contain `"` and `;` freely. The byte after the
    /// span must be the closing quote or the declared length is wrong.
    fn read_string(&mut self) -> Result<&'a [u8]> {
        self.expect_byte(b's')?;
        self.expect_byte(b':')?;
        let len = self.read_length()?;
        self.expect_byte(b':')?;
        self.expect_byte(b'"')?;

        let start = self.pos;

        // checked_add: a hostile declared length must not overflow the span
        let end = match start.checked_add(len) {
            Some(end) if end < self.data.len() && self.data[end] == b'"' => end,
            _ => return Err(self.string_length_error(start, len)),
        };

        let content = &self.data[start..end];
        self.pos = end;
        self.expect_byte(b'"')?;
        self.expect_byte(b';')?;
        Ok(content)
    }

    /// Match a compound production: `a:<count>:{<pairs>}`
    ///
    /// Exactly `<count>` key/value pairs must be present; the closing brace
    /// is required immediately after the last pair.
    fn match_compound(&mut self) -> Result<ParseNode<'a>> {
        self.expect_byte(b'a')?;
        self.expect_byte(b':')?;
        let count = self.read_length()?;
        self.expect_byte(b':')?;
        self.expect_byte(b'{')?;

        self.depth += 1;
        let mut pairs = Vec::with_capacity(count.min(1024)); // Cap initial allocation

        for _ in 0..count {
            let key = self.match_key()?;
            let value = self.match_value()?;
            pairs.push((key, value));
        }

        self.depth -= 1;
        self.expect_byte(b'}')?;

        Ok(ParseNode::Compound(pairs))
    }

    /// Match a key production. Only `i:` and `s:` are admissible keys.
    fn match_key(&mut self) -> Result<KeyNode<'a>> {
        match self.peek_byte()? {
            b'i' => Ok(KeyNode::Int(self.read_int()?)),
            b's' => Ok(KeyNode::Str(self.read_string()?)),
            _ => Err(DecodeError::new(ErrorKind::InvalidKey, self.pos)
                .with_input_preview(self.data, self.pos)),
        }
    }

    /// Read a non-negative decimal length/count field terminated by `:`.
    ///
    /// Only ASCII digits are admissible; `usize::parse` alone would also
    /// accept a leading `+`.
    fn read_length(&mut self) -> Result<usize> {
        let start = self.pos;
        let digits = self.read_until(b':')?;
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return Err(DecodeError::new(
                ErrorKind::InvalidInteger(String::from_utf8_lossy(digits).into_owned()),
                start,
            )
            .with_input_preview(self.data, start));
        }
        let len_str = std::str::from_utf8(digits).map_err(|_| {
            DecodeError::new(ErrorKind::InvalidInteger("invalid UTF-8".into()), start)
        })?;
        len_str.parse().map_err(|_| {
            DecodeError::new(ErrorKind::InvalidInteger(len_str.to_string()), start)
                .with_input_preview(self.data, start)
        })
    }

    /// Build a string length mismatch error, measuring the actual content
    /// span (up to the next `";` terminator) for the diagnostic.
    #[cold]
    #[inline(never)]
    fn string_length_error(&self, content_start: usize, declared: usize) -> DecodeError {
        let mut search = content_start;
        let found = loop {
            match memchr(b'"', &self.data[search..]) {
                Some(offset) => {
                    let quote = search + offset;
                    if quote + 1 < self.data.len() && self.data[quote + 1] == b';' {
                        break quote - content_start;
                    }
                    search = quote + 1;
                }
                None => break self.data.len() - content_start,
            }
        };

        DecodeError::new(
            ErrorKind::StringLengthMismatch {
                expected: declared,
                found,
            },
            content_start,
        )
        .with_input_preview(self.data, content_start)
    }

    // Helper methods - marked #[inline] for performance on hot paths

    /// Peek at the current byte without consuming it.
    #[inline(always)]
    fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| DecodeError::new(ErrorKind::UnexpectedEof, self.pos))
    }

    /// Read and consume the current byte.
    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Expect a specific byte, returning an error if it doesn't match.
    #[inline]
    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        let byte = self.read_byte()?;
        if byte != expected {
            return Err(self.make_unexpected_char_error(expected, byte));
        }
        Ok(())
    }

    /// Create an unexpected character error with proper context.
    #[cold]
    #[inline(never)]
    fn make_unexpected_char_error(&self, expected: u8, found: u8) -> DecodeError {
        DecodeError::new(
            ErrorKind::UnexpectedChar {
                expected: expected as char,
                found: found as char,
            },
            self.pos - 1,
        )
        .with_input_preview(self.data, self.pos.saturating_sub(1))
    }

    /// Read bytes until the delimiter, using SIMD-accelerated search.
    /// The delimiter itself is left unconsumed.
    #[inline]
    fn read_until(&mut self, delimiter: u8) -> Result<&'a [u8]> {
        let start = self.pos;
        match memchr(delimiter, &self.data[start..]) {
            Some(offset) => {
                let result = &self.data[start..start + offset];
                self.pos = start + offset;
                Ok(result)
            }
            None => Err(self.make_delimiter_not_found_error(delimiter)),
        }
    }

    /// Create a delimiter not found error with proper context.
    #[cold]
    #[inline(never)]
    fn make_delimiter_not_found_error(&self, delimiter: u8) -> DecodeError {
        DecodeError::new(
            ErrorKind::UnexpectedChar {
                expected: delimiter as char,
                found: if self.pos < self.data.len() {
                    self.data[self.pos] as char
                } else {
                    '\0'
                },
            },
            self.pos,
        )
        .with_input_preview(self.data, self.pos)
    }
}

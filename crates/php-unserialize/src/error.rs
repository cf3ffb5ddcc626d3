//! Error types for the decoder.
//!
//! Every failure carries the byte offset where it occurred and can be
//! annotated with a caret-marked preview of the surrounding input.

use std::fmt;
use thiserror::Error;

/// The error type returned by every decode operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The byte position where the error occurred.
    pub position: usize,
    /// Optional context about what was being matched.
    pub context: Option<String>,
    /// Preview of input around the error position for diagnostics.
    pub input_preview: Option<String>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.position)?;
        if let Some(ref ctx) = self.context {
            write!(f, " ({})", ctx)?;
        }
        if let Some(ref preview) = self.input_preview {
            write!(f, "\n{}", preview)?;
        }
        Ok(())
    }
}

/// Specific kinds of decode errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Expected a specific character but found something else.
    #[error("expected '{expected}', found '{found}'")]
    UnexpectedChar {
        /// The character that was expected.
        expected: char,
        /// The character that was found.
        found: char,
    },

    /// A leading character that names no grammar production.
    #[error("unknown tag '{0}'")]
    UnknownTag(char),

    /// Malformed integer field.
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Malformed float field.
    #[error("invalid float: {0}")]
    InvalidFloat(String),

    /// Boolean payload other than `0` or `1`.
    #[error("invalid boolean value: {0}")]
    InvalidBoolean(String),

    /// Declared string byte length does not match the content.
    #[error("string length mismatch: declared {expected}, found {found}")]
    StringLengthMismatch {
        /// The declared content length in bytes.
        expected: usize,
        /// The actual number of content bytes observed.
        found: usize,
    },

    /// A compound key that is neither an integer nor a string.
    #[error("invalid key type: expected string or integer")]
    InvalidKey,

    /// Input left over after a complete top-level value.
    #[error("{0} unconsumed trailing bytes after value")]
    TrailingBytes(usize),

    /// Nesting depth exceeded.
    #[error("maximum nesting depth ({0}) exceeded")]
    MaxDepthExceeded(usize),
}

impl DecodeError {
    /// Create a new error with the given kind and position.
    #[inline]
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            context: None,
            input_preview: None,
        }
    }

    /// Add context to the error.
    #[inline]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add an input preview around the error position.
    ///
    /// Shows up to 20 bytes before and after the error position, with a
    /// caret marking the offending byte.
    #[cold]
    pub fn with_input_preview(mut self, data: &[u8], error_pos: usize) -> Self {
        let start = error_pos.saturating_sub(20);
        let end = (error_pos + 20).min(data.len());

        if start < end {
            let slice = &data[start..end];
            let preview = String::from_utf8_lossy(slice);

            let relative_pos = error_pos.saturating_sub(start);
            let mut result = String::with_capacity(preview.len() + 10);
            result.push_str(&preview);
            result.push('\n');
            result.push_str(&" ".repeat(relative_pos));
            result.push('^');

            self.input_preview = Some(result);
        }
        self
    }
}

/// Result type alias for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = DecodeError::new(ErrorKind::UnknownTag('X'), 7);
        assert_eq!(err.to_string(), "unknown tag 'X' at byte 7");
    }

    #[test]
    fn test_display_includes_context() {
        let err = DecodeError::new(ErrorKind::UnexpectedEof, 0).with_context("inside compound");
        assert!(err.to_string().contains("(inside compound)"));
    }

    #[test]
    fn test_input_preview_caret() {
        let data = b"i:ab;";
        let err =
            DecodeError::new(ErrorKind::InvalidInteger("ab".into()), 2).with_input_preview(data, 2);
        let preview = err.input_preview.unwrap();
        let mut lines = preview.lines();
        assert_eq!(lines.next(), Some("i:ab;"));
        assert_eq!(lines.next(), Some("  ^"));
    }
}

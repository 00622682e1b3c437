//! Error types for JSON and TOML encoding and decoding.
//!
//! Every failure in this crate is returned as a value of [`Error`]. Nothing is
//! retried internally, and malformed input never panics.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: invalid characters, unterminated strings, missing
//!   separators or terminators, and invalid TOML table redeclarations. They
//!   carry the line and column of the offending token.
//! - **Type Mismatches**: the decode target cannot hold the parsed value, such
//!   as a string into an `i32` or a float into an integer field. They carry the
//!   path of the field that failed (`info.tags[2]`).
//! - **Unsupported Types**: the encoder met a value the target format cannot
//!   express (non-finite floats, non-string map keys, nulls inside TOML arrays).
//!
//! ## Examples
//!
//! ```rust
//! use serde_textual::{json, Error};
//!
//! let result: Result<Vec<i32>, Error> = json::from_str("[1, 2");
//! assert!(matches!(result, Err(Error::Syntax { .. })));
//!
//! if let Err(err) = result {
//!     eprintln!("Parse error: {}", err);
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Unexpected character or token at a required grammar position.
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// Input nests arrays or tables deeper than the configured limit.
    #[error("Nesting deeper than {limit} levels at line {line}, column {col}")]
    DepthLimitExceeded {
        line: usize,
        col: usize,
        limit: usize,
    },

    /// Decode target is incompatible with the parsed value.
    #[error("Type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// Value has no representation in the target format.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Format name not known to [`Format`](crate::Format).
    #[error("Unsupported serialization format: {0}")]
    UnsupportedFormat(String),

    /// Input bytes are not valid UTF-8.
    #[error("Invalid UTF-8 input: {0}")]
    InvalidUtf8(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised by a `Serialize` or `Deserialize` implementation.
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_textual::Error;
    ///
    /// let err = Error::syntax(10, 5, "expected `:` after object key");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.into(),
        }
    }

    /// Creates a type mismatch error at the root of the decoded value.
    ///
    /// Field and index segments are prepended as the error travels outwards
    /// through [`Error::at_key`] and [`Error::at_index`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_textual::Error;
    ///
    /// let err = Error::type_mismatch("integer", "string \"thirty\"").at_key("age");
    /// assert!(err.to_string().contains("`age`"));
    /// ```
    pub fn type_mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Error::TypeMismatch {
            path: String::new(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for values the encoder cannot express.
    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        Error::UnsupportedType(msg.into())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_textual::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Prefixes the path of a type mismatch with a table key.
    #[must_use]
    pub fn at_key(self, key: &str) -> Self {
        self.prefix_path(key)
    }

    /// Prefixes the path of a type mismatch with an array index.
    #[must_use]
    pub fn at_index(self, index: usize) -> Self {
        self.prefix_path(&format!("[{}]", index))
    }

    fn prefix_path(self, segment: &str) -> Self {
        match self {
            Error::TypeMismatch {
                path,
                expected,
                found,
            } => {
                let path = if path.is_empty() {
                    segment.to_string()
                } else if path.starts_with('[') {
                    format!("{}{}", segment, path)
                } else {
                    format!("{}.{}", segment, path)
                };
                Error::TypeMismatch {
                    path,
                    expected,
                    found,
                }
            }
            other => other,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::type_mismatch(exp, unexp)
    }

    fn invalid_value(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::type_mismatch(exp, unexp)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

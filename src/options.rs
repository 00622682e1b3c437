//! Configuration options for the codecs.
//!
//! ## Examples
//!
//! ```rust
//! use serde_textual::{CodecOptions, JsonCodec};
//!
//! let codec = JsonCodec::with_options(CodecOptions::new().with_max_depth(16));
//! assert_eq!(codec.options().max_depth, 16);
//! ```

/// Default nesting limit for parsed documents.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration shared by [`JsonCodec`](crate::JsonCodec) and
/// [`TomlCodec`](crate::TomlCodec).
///
/// Parsing is recursive, so `max_depth` bounds how deeply arrays and tables
/// may nest before the parser gives up with
/// [`Error::DepthLimitExceeded`](crate::Error::DepthLimitExceeded) instead of
/// exhausting the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    pub max_depth: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecOptions {
    /// Creates default options (nesting limit of 128).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_textual::CodecOptions;
    ///
    /// assert_eq!(CodecOptions::new().max_depth, 128);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth of arrays and tables.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

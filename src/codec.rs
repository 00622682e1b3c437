//! The encode/decode contract shared by every format.
//!
//! [`Codec`] is what callers program against when the wire format is chosen
//! at run time. [`Format`] names the formats this crate ships and dispatches
//! to the matching codec.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_textual::{Codec, Format};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
//! struct Person { name: String, age: u32 }
//!
//! let format: Format = "toml".parse().unwrap();
//! let bytes = format.encode(&Person { name: "Ann".to_string(), age: 41 }).unwrap();
//!
//! let mut person = Person::default();
//! format.decode(&bytes, &mut person).unwrap();
//! assert_eq!(person.age, 41);
//! assert_eq!(format.format_name(), "TOML");
//! ```

use crate::{Error, JsonCodec, Result, TomlCodec};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A textual wire format.
///
/// `decode` writes into a caller-owned destination. Record fields the input
/// does not mention keep their current value, and the destination is left
/// untouched when decoding fails.
pub trait Codec {
    /// Encodes `value` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] when the value holds something the
    /// format cannot express.
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: ?Sized + Serialize;

    /// Decodes `bytes` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtf8`] for non-UTF-8 input, [`Error::Syntax`]
    /// for malformed text and [`Error::TypeMismatch`] when the parsed value
    /// does not fit `T`.
    fn decode<T>(&self, bytes: &[u8], dest: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned;

    /// Upper-case name of the format, such as `"JSON"`.
    fn format_name(&self) -> &'static str;
}

/// The formats known to this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl FromStr for Format {
    type Err = Error;

    /// Accepts `json`, `JSON`, `toml` and `TOML`.
    fn from_str(name: &str) -> Result<Self> {
        match name {
            "json" | "JSON" => Ok(Format::Json),
            "toml" | "TOML" => Ok(Format::Toml),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_name())
    }
}

impl Codec for Format {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: ?Sized + Serialize,
    {
        match self {
            Format::Json => JsonCodec::new().encode(value),
            Format::Toml => TomlCodec::new().encode(value),
        }
    }

    fn decode<T>(&self, bytes: &[u8], dest: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        match self {
            Format::Json => JsonCodec::new().decode(bytes, dest),
            Format::Toml => TomlCodec::new().decode(bytes, dest),
        }
    }

    fn format_name(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Toml => "TOML",
        }
    }
}

/// Borrows the input as UTF-8 text.
pub(crate) fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::InvalidUtf8(e.to_string()))
}

//! JSON codec.
//!
//! Encoding writes compact JSON straight from native data. Decoding lexes and
//! parses the text into a [`Value`] and maps it onto the destination type.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_textual::json;
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Address { street: String, city: String }
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Person { name: String, age: u32, address: Address }
//!
//! let person = Person {
//!     name: "John Doe".to_string(),
//!     age: 30,
//!     address: Address { street: "123 Main St".to_string(), city: "Anytown".to_string() },
//! };
//!
//! let text = json::to_string(&person).unwrap();
//! assert_eq!(
//!     text,
//!     r#"{"name":"John Doe","age":30,"address":{"street":"123 Main St","city":"Anytown"}}"#
//! );
//! assert_eq!(json::from_str::<Person>(&text).unwrap(), person);
//! ```

mod lexer;
mod parser;
mod ser;

pub use self::ser::{Compound, Serializer};

use crate::codec::utf8;
use crate::de::decode_value_into;
use crate::{Codec, CodecOptions, Error, Result, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// The JSON [`Codec`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonCodec {
    options: CodecOptions,
}

impl JsonCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: CodecOptions) -> Self {
        JsonCodec { options }
    }

    #[must_use]
    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Parses JSON text into a [`Value`] using this codec's options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed input and
    /// [`Error::DepthLimitExceeded`] for input nested beyond `max_depth`.
    pub fn parse(&self, text: &str) -> Result<Value> {
        parser::Parser::new(text, self.options)?.parse()
    }
}

impl Codec for JsonCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: ?Sized + Serialize,
    {
        let text = to_string(value)?;
        tracing::debug!(bytes = text.len(), "encoded JSON");
        Ok(text.into_bytes())
    }

    fn decode<T>(&self, bytes: &[u8], dest: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        tracing::debug!(bytes = bytes.len(), "decoding JSON");
        let value = self.parse(utf8(bytes)?)?;
        tracing::trace!(kind = value.kind(), "parsed JSON document");
        decode_value_into(value, dest)
    }

    fn format_name(&self) -> &'static str {
        "JSON"
    }
}

/// Parses JSON text into a [`Value`].
///
/// ```rust
/// use serde_textual::{json, Value};
///
/// let value = json::parse(r#"{"tags": ["a", 1]}"#).unwrap();
/// assert_eq!(value.get("tags").and_then(Value::as_array).map(Vec::len), Some(2));
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed input.
pub fn parse(text: &str) -> Result<Value> {
    JsonCodec::new().parse(text)
}

/// Serializes `value` as a compact JSON string.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for non-finite floats, integers beyond
/// the signed 64-bit range and maps whose keys are not strings.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Serializes `value` as compact JSON bytes.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_string(value).map(String::into_bytes)
}

/// Serializes `value` as compact JSON into a writer.
///
/// # Errors
///
/// See [`to_string`]; write failures are reported as [`Error::Io`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Deserializes an instance of `T` from JSON text.
///
/// Record fields missing from the input take their zero value. Use
/// [`decode_into`] to keep the fields of an existing value instead.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed input and [`Error::TypeMismatch`]
/// when the document does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    crate::from_value(parse(text)?)
}

/// Deserializes an instance of `T` from JSON bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] for non-UTF-8 input, otherwise as
/// [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str(utf8(bytes)?)
}

/// Deserializes an instance of `T` from a reader of JSON text.
///
/// # Errors
///
/// Read failures are reported as [`Error::Io`], otherwise as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

/// Decodes JSON text over an existing value.
///
/// Fields absent from the input keep their current value. On error `dest` is
/// left unchanged.
///
/// # Errors
///
/// As [`from_str`].
pub fn decode_into<T>(text: &str, dest: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    decode_value_into(parse(text)?, dest)
}

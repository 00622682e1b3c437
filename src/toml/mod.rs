//! TOML codec.
//!
//! Decoding understands `key = value` pairs, dotted keys, `[table]` and
//! `[[array.of.tables]]` headers, arrays spanning several lines, `#` comments
//! and RFC 3339 offset date-times. Inline tables and multi-line strings are
//! not supported.
//!
//! Encoding writes date-times marked with [`timestamp`](crate::timestamp)
//! bare, flattens nested records into dotted keys and never writes headers:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_textual::toml;
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Tls { enabled: bool }
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Server { host: String, port: u16, tls: Tls }
//!
//! let server = Server { host: "localhost".to_string(), port: 8080, tls: Tls { enabled: true } };
//! let text = toml::to_string(&server).unwrap();
//! assert_eq!(text, "host = \"localhost\"\nport = 8080\ntls.enabled = true");
//!
//! // Header-style documents decode to the same value.
//! let parsed: Server = toml::from_str("host = \"localhost\"\nport = 8080\n\n[tls]\nenabled = true\n").unwrap();
//! assert_eq!(parsed, server);
//! ```

mod lexer;
mod parser;
mod ser;

pub use self::ser::{ArrayLine, Serializer, TableLines};

use crate::codec::utf8;
use crate::de::decode_value_into;
use crate::{Codec, CodecOptions, Error, Result, Table, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// The TOML [`Codec`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TomlCodec {
    options: CodecOptions,
}

impl TomlCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: CodecOptions) -> Self {
        TomlCodec { options }
    }

    #[must_use]
    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Parses a TOML document into its root table using this codec's options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed input, duplicate keys and keys
    /// redeclared as tables.
    pub fn parse(&self, text: &str) -> Result<Table> {
        parser::Parser::new(text, self.options)?.parse()
    }
}

impl Codec for TomlCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: ?Sized + Serialize,
    {
        let text = to_string(value)?;
        tracing::debug!(bytes = text.len(), "encoded TOML");
        Ok(text.into_bytes())
    }

    fn decode<T>(&self, bytes: &[u8], dest: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        tracing::debug!(bytes = bytes.len(), "decoding TOML");
        let table = self.parse(utf8(bytes)?)?;
        tracing::trace!(keys = table.len(), "parsed TOML document");
        decode_value_into(Value::Table(table), dest)
    }

    fn format_name(&self) -> &'static str {
        "TOML"
    }
}

/// Parses a TOML document into its root [`Table`].
///
/// ```rust
/// use serde_textual::{toml, Value};
///
/// let table = toml::parse("[server]\nport = 8080").unwrap();
/// let port = table.get("server").and_then(|server| server.get("port"));
/// assert_eq!(port, Some(&Value::Integer(8080)));
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed input.
pub fn parse(text: &str) -> Result<Table> {
    TomlCodec::new().parse(text)
}

/// Serializes `value` as flattened TOML lines.
///
/// A scalar or array at the root is written on its own; `None` at the root
/// produces an empty document.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for records, `None` or unit values
/// inside arrays, non-finite floats, integers beyond the signed 64-bit range
/// and maps whose keys are not strings.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut lines = Vec::new();
    value.serialize(Serializer::new(&mut lines))?;
    Ok(lines.join("\n"))
}

/// Serializes `value` as TOML bytes.
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

/// Serializes `value` as TOML into a writer.
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

/// Deserializes an instance of `T` from a TOML document.
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
    crate::from_value(Value::Table(parse(text)?))
}

/// Deserializes an instance of `T` from TOML bytes.
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

/// Deserializes an instance of `T` from a reader of TOML text.
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

/// Decodes a TOML document over an existing value.
///
/// Keys absent from the document keep their current value. On error `dest`
/// is left unchanged.
///
/// # Errors
///
/// As [`from_str`].
pub fn decode_into<T>(text: &str, dest: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    decode_value_into(Value::Table(parse(text)?), dest)
}

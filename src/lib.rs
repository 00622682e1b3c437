//! # serde_textual
//!
//! Hand-written JSON and TOML codecs behind one encode/decode contract.
//!
//! Each format has its own lexer and recursive-descent parser producing a
//! shared [`Value`] tree. A single decode mapper turns that tree into any
//! `Deserialize` type, and a per-format serializer writes `Serialize` types
//! straight to text.
//!
//! ## Key Features
//!
//! - **One contract**: [`JsonCodec`], [`TomlCodec`] and the run-time selected
//!   [`Format`] all implement [`Codec`]
//! - **Merge on decode**: record fields missing from the input keep the
//!   destination's current value
//! - **Atomic decode**: a failed decode leaves the destination untouched
//! - **Positioned errors**: syntax errors carry line and column, type
//!   mismatches carry the field path (`info.tags[2]`)
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_textual::{Codec, JsonCodec, TomlCodec};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
//! struct User {
//!     id: u32,
//!     #[serde(rename = "display_name")]
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! let user = User { id: 7, name: "Alice".to_string(), tags: vec!["admin".to_string()] };
//!
//! let json = JsonCodec::new().encode(&user).unwrap();
//! assert_eq!(json, br#"{"id":7,"display_name":"Alice","tags":["admin"]}"#);
//!
//! let toml = TomlCodec::new().encode(&user).unwrap();
//! assert_eq!(toml, b"id = 7\ndisplay_name = \"Alice\"\ntags = [\"admin\"]");
//!
//! let mut back = User::default();
//! TomlCodec::new().decode(&toml, &mut back).unwrap();
//! assert_eq!(back, user);
//! ```
//!
//! ## Field Names
//!
//! Wire names come from serde attributes and apply to both formats:
//! `#[serde(rename = "...")]` picks the key and `#[serde(skip)]` leaves a
//! field out of encoding and decoding. A decode never writes to a skipped
//! field: it keeps whatever value the destination already held.
//!
//! ## Null Handling
//!
//! A JSON `null` decodes into the target's zero value: `0`, `false`, `""`, an
//! empty collection, `None`, or a record with every field zeroed. TOML has no
//! null; `None` fields are simply not written.
//!
//! ## Dynamic Values
//!
//! ```rust
//! use serde_textual::{json, value, Value};
//!
//! let parsed = json::parse(r#"{"scores": [1, 2.5]}"#).unwrap();
//! assert_eq!(parsed, value!({ "scores": [1, 2.5] }));
//! assert_eq!(parsed.to_string(), r#"{"scores":[1,2.5]}"#);
//! ```

pub mod codec;
pub mod de;
pub mod error;
pub mod json;
pub mod macros;
pub mod map;
pub mod options;
mod read;
pub mod ser;
pub mod timestamp;
pub mod toml;
pub mod value;

pub use codec::{Codec, Format};
pub use de::ValueDeserializer;
pub use error::{Error, Result};
pub use json::JsonCodec;
pub use map::Table;
pub use options::CodecOptions;
pub use ser::ValueSerializer;
pub use toml::TomlCodec;
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_textual::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_table());
/// assert_eq!(value.get("y"), Some(&Value::Integer(2)));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for integers beyond the signed 64-bit
/// range and maps whose keys are not strings.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Converts a [`Value`] into any `T: Deserialize`.
///
/// Record fields missing from `value` take their zero value.
///
/// # Examples
///
/// ```rust
/// use serde_textual::{from_value, value};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_value(value!({ "x": 1 })).unwrap();
/// assert_eq!(point, Point { x: 1, y: 0 });
/// ```
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when the value does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

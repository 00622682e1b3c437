//! Serde helpers for RFC 3339 date-time fields.
//!
//! `chrono`'s own `Serialize` impl hands a date-time to the serializer as a
//! plain string, which the TOML writer cannot tell apart from text. Fields
//! tagged with `#[serde(with = "serde_textual::timestamp")]` are marked as
//! date-times instead: TOML writes them as bare offset date-time literals that
//! parse back as [`Value::Timestamp`](crate::Value::Timestamp), and JSON
//! writes the same RFC 3339 text as a string.
//!
//! ```rust
//! use chrono::{DateTime, FixedOffset};
//! use serde::{Deserialize, Serialize};
//! use serde_textual::toml;
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Release {
//!     #[serde(with = "serde_textual::timestamp")]
//!     published: DateTime<FixedOffset>,
//! }
//!
//! let release = Release {
//!     published: DateTime::parse_from_rfc3339("1979-05-27T07:32:00-08:00").unwrap(),
//! };
//! let text = toml::to_string(&release).unwrap();
//! assert_eq!(text, "published = 1979-05-27T07:32:00-08:00");
//! assert_eq!(toml::from_str::<Release>(&text).unwrap(), release);
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serializer};

/// Newtype name the serializers in this crate recognise as a date-time.
pub(crate) const NAME: &str = "$__serde_textual_timestamp";

/// Serializes `value` as a marked RFC 3339 date-time.
pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_newtype_struct(NAME, &value.to_rfc3339())
}

/// Deserializes an RFC 3339 date-time from a TOML timestamp or a string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    DateTime::<FixedOffset>::deserialize(deserializer)
}

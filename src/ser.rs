//! Encode-side building blocks shared by both formats.
//!
//! The JSON and TOML serializers write text directly while walking native
//! data; the scalar rendering rules they have in common live here:
//!
//! - strings are double-quoted with `\\`, `\"`, `\n`, `\r` and `\t` escaped,
//!   and any other ASCII control character written as `\u00XX`;
//! - floats use fixed-point notation with the shortest digits that read back
//!   to the same value, and always keep a fractional part (`3.0`, not `3`);
//! - integers must fit the signed 64-bit range of [`Value::Integer`].
//!
//! This module also provides [`ValueSerializer`], which builds a [`Value`]
//! tree instead of text and backs [`to_value`](crate::to_value).
//!
//! ```rust
//! use serde_textual::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: f64 }
//!
//! let value = to_value(&Point { x: 1, y: 2.0 }).unwrap();
//! assert_eq!(value.get("x"), Some(&Value::Integer(1)));
//! assert_eq!(value.get("y"), Some(&Value::Float(2.0)));
//! ```

use crate::{timestamp, Error, Result, Table, Value};
use chrono::{DateTime, FixedOffset};
use serde::{ser, Serialize};
use std::fmt::Write as _;

/// Appends `s` as a double-quoted string literal.
pub(crate) fn write_quoted(output: &mut String, s: &str) {
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(output, "\\u{:04x}", c as u32);
            }
            _ => output.push(ch),
        }
    }
    output.push('"');
}

/// Renders a float in fixed-point notation, keeping a fractional part so the
/// literal reads back as a float.
pub(crate) fn format_f64(v: f64) -> Result<String> {
    if !v.is_finite() {
        return Err(Error::unsupported_type(format!(
            "non-finite float {} has no textual representation",
            v
        )));
    }
    // `Display` for floats never switches to exponent notation.
    let mut text = v.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    Ok(text)
}

/// Like [`format_f64`] but with the shortest digits for an `f32`, so `0.1f32`
/// renders as `0.1` rather than its widened `f64` expansion.
pub(crate) fn format_f32(v: f32) -> Result<String> {
    if !v.is_finite() {
        return Err(Error::unsupported_type(format!(
            "non-finite float {} has no textual representation",
            v
        )));
    }
    let mut text = v.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    Ok(text)
}

/// Reads the date-time wrapped by [`timestamp::serialize`].
pub(crate) fn timestamp_of<T>(value: &T) -> Result<DateTime<FixedOffset>>
where
    T: ?Sized + Serialize,
{
    match value.serialize(ValueSerializer)? {
        Value::Timestamp(ts) => Ok(ts),
        Value::String(text) => DateTime::parse_from_rfc3339(&text).map_err(|e| {
            Error::unsupported_type(format!("invalid date-time `{}`: {}", text, e))
        }),
        other => Err(Error::unsupported_type(format!(
            "expected an RFC 3339 date-time, found {}",
            other.kind()
        ))),
    }
}

/// Narrows any wider integer to the signed 64-bit range both formats share.
pub(crate) fn checked_i64<N>(v: N) -> Result<i64>
where
    N: Copy + std::fmt::Display + TryInto<i64>,
{
    v.try_into().map_err(|_| {
        Error::unsupported_type(format!("integer {} exceeds the signed 64-bit range", v))
    })
}

/// Serializes a map key, which must come out as a string.
pub(crate) fn key_to_string<T: ?Sized + Serialize>(key: &T) -> Result<String> {
    match key.serialize(ValueSerializer)? {
        Value::String(s) => Ok(s),
        other => Err(Error::unsupported_type(format!(
            "map keys must be strings, found {}",
            other.kind()
        ))),
    }
}

/// Serializer producing a [`Value`] tree.
///
/// Enum variants with data become single-key tables, mirroring how the text
/// serializers write them.
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeTable;
    type SerializeStruct = SerializeTable;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        checked_i64(v).map(Value::Integer)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        checked_i64(v).map(Value::Integer)
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        checked_i64(v).map(Value::Integer)
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(
            v.iter().map(|&b| Value::Integer(i64::from(b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        if name == timestamp::NAME {
            return timestamp_of(value).map(Value::Timestamp);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut table = Table::with_capacity(1);
        table.insert(variant.to_string(), value.serialize(ValueSerializer)?);
        Ok(Value::Table(table))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeTable> {
        Ok(SerializeTable {
            table: Table::with_capacity(len.unwrap_or(0)),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeTable> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            table: Table::with_capacity(len),
        })
    }
}

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeTable {
    table: Table,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    table: Table,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut table = Table::with_capacity(1);
        table.insert(self.variant.to_string(), Value::Array(self.vec));
        Ok(Value::Table(table))
    }
}

impl ser::SerializeMap for SerializeTable {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(key_to_string(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.table.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Table(self.table))
    }
}

impl ser::SerializeStruct for SerializeTable {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.table
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Table(self.table))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.table
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut outer = Table::with_capacity(1);
        outer.insert(self.variant.to_string(), Value::Table(self.table));
        Ok(Value::Table(outer))
    }
}

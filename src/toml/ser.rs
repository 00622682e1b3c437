//! Flattening TOML writer.
//!
//! Records and maps never produce `[section]` headers. Every leaf becomes one
//! `dotted.key = value` line, so a nested record such as
//! `Config { server: Server { port: 8080 } }` is written as
//! `server.port = 8080`. TOML has no null, so `None` fields are left out.

use crate::ser::{checked_i64, format_f32, format_f64, key_to_string, timestamp_of, write_quoted};
use crate::{timestamp, Error, Result};
use serde::ser::{self, Impossible, Serialize};

/// Renders one key segment, quoting it unless it is a safe bare key.
pub(crate) fn write_key_segment(output: &mut String, key: &str) {
    let bare = key
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && key != "true"
        && key != "false";
    if bare {
        output.push_str(key);
    } else {
        write_quoted(output, key);
    }
}

fn render_key(path: &[String]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        write_key_segment(&mut out, segment);
    }
    out
}

fn table_in_array() -> Error {
    Error::unsupported_type("TOML arrays cannot hold tables or records")
}

fn null_in_array() -> Error {
    Error::unsupported_type("TOML has no null; arrays cannot hold None or unit values")
}

/// Serializer writing the value found at `path` as flattened `key = value`
/// lines. An empty path is the document root.
pub struct Serializer<'a> {
    lines: &'a mut Vec<String>,
    path: Vec<String>,
}

impl<'a> Serializer<'a> {
    pub fn new(lines: &'a mut Vec<String>) -> Self {
        Serializer {
            lines,
            path: Vec::new(),
        }
    }

    fn push(self, text: String) -> Result<()> {
        if self.path.is_empty() {
            self.lines.push(text);
        } else {
            self.lines
                .push(format!("{} = {}", render_key(&self.path), text));
        }
        Ok(())
    }

    fn child(&mut self, key: String) -> Serializer<'_> {
        let mut path = self.path.clone();
        path.push(key);
        Serializer {
            lines: &mut *self.lines,
            path,
        }
    }
}

macro_rules! forward_scalar {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<()> {
                let text = ser::Serializer::$method(InlineSerializer, v)?;
                self.push(text)
            }
        )*
    };
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = ArrayLine<'a>;
    type SerializeTuple = ArrayLine<'a>;
    type SerializeTupleStruct = ArrayLine<'a>;
    type SerializeTupleVariant = ArrayLine<'a>;
    type SerializeMap = TableLines<'a>;
    type SerializeStruct = TableLines<'a>;
    type SerializeStructVariant = TableLines<'a>;

    forward_scalar! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    }

    fn serialize_none(self) -> Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if name == timestamp::NAME {
            let text = ser::Serializer::serialize_newtype_struct(InlineSerializer, name, value)?;
            return self.push(text);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        mut self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.path.push(variant.to_string());
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ArrayLine<'a>> {
        Ok(ArrayLine {
            target: self,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<ArrayLine<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<ArrayLine<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        mut self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<ArrayLine<'a>> {
        self.path.push(variant.to_string());
        self.serialize_seq(Some(len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<TableLines<'a>> {
        Ok(TableLines {
            target: self,
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<TableLines<'a>> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        mut self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TableLines<'a>> {
        self.path.push(variant.to_string());
        self.serialize_map(Some(len))
    }
}

/// Collects array elements and writes them as one `key = [a, b]` line.
pub struct ArrayLine<'a> {
    target: Serializer<'a>,
    items: Vec<String>,
}

impl ArrayLine<'_> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(InlineSerializer)?);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        let text = format!("[{}]", self.items.join(", "));
        self.target.push(text)
    }
}

impl ser::SerializeSeq for ArrayLine<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTuple for ArrayLine<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for ArrayLine<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for ArrayLine<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// Writes each field of a record or map under its own extended path.
pub struct TableLines<'a> {
    target: Serializer<'a>,
    pending_key: Option<String>,
}

impl TableLines<'_> {
    fn field<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.target.child(key))
    }
}

impl ser::SerializeMap for TableLines<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key_to_string(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for TableLines<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key.to_string(), value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for TableLines<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key.to_string(), value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Renders a value that sits inside an array: scalars and nested arrays only.
struct InlineSerializer;

impl ser::Serializer for InlineSerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = InlineArray;
    type SerializeTuple = InlineArray;
    type SerializeTupleStruct = InlineArray;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String> {
        checked_i64(v).map(|v| v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        checked_i64(v).map(|v| v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String> {
        checked_i64(v).map(|v| v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        format_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        format_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<String> {
        let mut buf = [0; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        let mut out = String::with_capacity(v.len() + 2);
        write_quoted(&mut out, v);
        Ok(out)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<String> {
        let items: Vec<String> = v.iter().map(u8::to_string).collect();
        Ok(format!("[{}]", items.join(", ")))
    }

    fn serialize_none(self) -> Result<String> {
        Err(null_in_array())
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(null_in_array())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(null_in_array())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        // Offset date-times are written bare, as TOML literals.
        if name == timestamp::NAME {
            return timestamp_of(value).map(|ts| ts.to_rfc3339());
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(table_in_array())
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<InlineArray> {
        Ok(InlineArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<InlineArray> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<InlineArray> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Impossible<String, Error>> {
        Err(table_in_array())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Impossible<String, Error>> {
        Err(table_in_array())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Impossible<String, Error>> {
        Err(table_in_array())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Impossible<String, Error>> {
        Err(table_in_array())
    }
}

struct InlineArray {
    items: Vec<String>,
}

impl InlineArray {
    fn finish(self) -> String {
        format!("[{}]", self.items.join(", "))
    }
}

impl ser::SerializeSeq for InlineArray {
    type Ok = String;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(InlineSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<String> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for InlineArray {
    type Ok = String;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<String> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for InlineArray {
    type Ok = String;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<String> {
        Ok(self.finish())
    }
}

//! Decode mapper: turns a parsed [`Value`] into native data.
//!
//! Both codecs parse their input into a [`Value`] first and then hand it to
//! [`ValueDeserializer`]. The mapping rules are shared by JSON and TOML:
//!
//! - scalars must match the target kind; integers are range-checked, and a
//!   float never narrows into an integer target;
//! - `null` becomes the target's zero value (`0`, `false`, `""`, an empty
//!   collection, `None`, or a record with every field zeroed);
//! - sequences and maps are rebuilt from the source;
//! - record fields missing from the source keep the value they had in the
//!   destination, or their zero value when there is no destination.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_textual::json;
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Server { host: String, port: u16 }
//!
//! let mut server = Server { host: "localhost".to_string(), port: 80 };
//! json::decode_into(r#"{"port": 8080}"#, &mut server).unwrap();
//! assert_eq!(server, Server { host: "localhost".to_string(), port: 8080 });
//! ```

use crate::{Error, Result, Table, Value};
use serde::de::{self, DeserializeOwned, DeserializeSeed, Expected, Visitor};
use serde::Serialize;

/// Decodes `value` over an existing destination.
///
/// The destination's current state supplies record fields the source does not
/// mention. A destination that cannot be represented as a [`Value`] is an
/// error rather than a silent reset of those fields.
///
/// The source is first decoded into a scratch value; `dest` is touched only
/// once that succeeds. The second pass writes record fields in place, so
/// `#[serde(skip)]` fields keep whatever the destination held.
pub(crate) fn decode_value_into<T>(value: Value, dest: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let current = crate::to_value(&*dest)?;
    T::deserialize(ValueDeserializer::with_current(
        value.clone(),
        Some(current.clone()),
    ))?;
    T::deserialize_in_place(ValueDeserializer::with_current(value, Some(current)), dest)
}

fn invalid_type(value: &Value, exp: &dyn Expected) -> Error {
    de::Error::invalid_type(value.unexpected(), exp)
}

/// Deserializer over an owned [`Value`].
///
/// Optionally carries the destination's current value, which is consulted only
/// for record fields absent from the source.
pub struct ValueDeserializer {
    value: Value,
    current: Option<Value>,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer {
            value,
            current: None,
        }
    }

    pub(crate) fn with_current(value: Value, current: Option<Value>) -> Self {
        ValueDeserializer { value, current }
    }
}

macro_rules! deserialize_integer {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.value {
                    Value::Null => visitor.visit_i64(0),
                    Value::Integer(i) => visitor.visit_i64(i),
                    other => Err(invalid_type(&other, &visitor)),
                }
            }
        )*
    };
}

macro_rules! deserialize_float {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.value {
                    Value::Null => visitor.visit_f64(0.0),
                    Value::Integer(i) => visitor.visit_f64(i as f64),
                    Value::Float(f) => visitor.visit_f64(f),
                    other => Err(invalid_type(&other, &visitor)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Timestamp(ts) => visitor.visit_string(ts.to_rfc3339()),
            Value::Array(arr) => visit_array(arr, visitor),
            Value::Table(table) => visit_table(MapDeserializer::new(table), visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_bool(false),
            Value::Boolean(b) => visitor.visit_bool(b),
            other => Err(invalid_type(&other, &visitor)),
        }
    }

    deserialize_integer! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
    }

    deserialize_float! { deserialize_f32 deserialize_f64 }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_char('\0'),
            Value::String(s) => visitor.visit_string(s),
            other => Err(invalid_type(&other, &visitor)),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_str(""),
            Value::String(s) => visitor.visit_string(s),
            Value::Timestamp(ts) => visitor.visit_string(ts.to_rfc3339()),
            other => Err(invalid_type(&other, &visitor)),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    // Byte buffers are written as arrays of integers.
    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            value => visitor.visit_some(ValueDeserializer {
                value,
                current: self.current.filter(|current| !current.is_null()),
            }),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            other => Err(invalid_type(&other, &visitor)),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visit_array(Vec::new(), visitor),
            Value::Array(arr) => visit_array(arr, visitor),
            other => Err(invalid_type(&other, &visitor)),
        }
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visit_array(vec![Value::Null; len], visitor),
            Value::Array(arr) => visit_array(arr, visitor),
            other => Err(invalid_type(&other, &visitor)),
        }
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visit_table(MapDeserializer::new(Table::new()), visitor),
            Value::Table(table) => visit_table(MapDeserializer::new(table), visitor),
            other => Err(invalid_type(&other, &visitor)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            // Zeroing a record zeroes each of its fields.
            Value::Null => visit_table(
                MapDeserializer::for_struct(Table::new(), None, fields),
                visitor,
            ),
            Value::Table(table) => visit_table(
                MapDeserializer::for_struct(table, self.current, fields),
                visitor,
            ),
            other => Err(invalid_type(&other, &visitor)),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Value::Table(table) if table.len() == 1 => {
                let mut entries = table.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    }),
                    None => Err(Error::custom("enum table lost its only entry")),
                }
            }
            other => Err(invalid_type(&other, &"a string or a single-key table")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

fn visit_array<'de, V>(array: Vec<Value>, visitor: V) -> Result<V::Value>
where
    V: Visitor<'de>,
{
    let len = array.len();
    let mut seq = SeqDeserializer::new(array);
    let value = visitor.visit_seq(&mut seq)?;
    if seq.iter.len() == 0 {
        Ok(value)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in array"))
    }
}

fn visit_table<'de, V>(mut map: MapDeserializer, visitor: V) -> Result<V::Value>
where
    V: Visitor<'de>,
{
    let len = map.iter.len();
    let value = visitor.visit_map(&mut map)?;
    if map.iter.len() == 0 {
        Ok(value)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in table"))
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
    index: usize,
}

impl SeqDeserializer {
    fn new(array: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: array.into_iter(),
            index: 0,
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => {
                let index = self.index;
                self.index += 1;
                seed.deserialize(ValueDeserializer::new(value))
                    .map(Some)
                    .map_err(|e| e.at_index(index))
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// One table entry waiting to be decoded.
struct Entry {
    key: String,
    value: Value,
    current: Option<Value>,
}

struct MapDeserializer {
    iter: std::vec::IntoIter<Entry>,
    pending: Option<Entry>,
}

impl MapDeserializer {
    fn new(table: Table) -> Self {
        let entries: Vec<Entry> = table
            .into_iter()
            .map(|(key, value)| Entry {
                key,
                value,
                current: None,
            })
            .collect();
        MapDeserializer {
            iter: entries.into_iter(),
            pending: None,
        }
    }

    /// Pairs each source entry with the destination's value for the same
    /// field, then appends the declared fields the source left out.
    fn for_struct(source: Table, current: Option<Value>, fields: &[&str]) -> Self {
        let mut current = match current {
            Some(Value::Table(table)) => table,
            _ => Table::new(),
        };

        let missing: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|field| !source.contains_key(field))
            .collect();

        let mut entries = Vec::with_capacity(source.len() + missing.len());
        for (key, value) in source {
            let existing = current.remove(&key);
            entries.push(Entry {
                key,
                value,
                current: existing,
            });
        }
        for field in missing {
            // Absent fields decode from their current value, or from null
            // (the zero value) when the destination has none.
            let value = current.remove(field).unwrap_or(Value::Null);
            entries.push(Entry {
                key: field.to_string(),
                value,
                current: None,
            });
        }

        MapDeserializer {
            iter: entries.into_iter(),
            pending: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(entry) => {
                let key = seed
                    .deserialize(ValueDeserializer::new(Value::String(entry.key.clone())))
                    .map_err(|e| e.at_key(&entry.key))?;
                self.pending = Some(entry);
                Ok(Some(key))
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let entry = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("value requested before key"))?;
        seed.deserialize(ValueDeserializer::with_current(entry.value, entry.current))
            .map_err(|e| e.at_key(&entry.key))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, VariantDeserializer)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(invalid_type(&other, &"unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(de::Error::invalid_type(
                de::Unexpected::UnitVariant,
                &"newtype variant",
            )),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visit_array(arr, visitor),
            Some(other) => Err(invalid_type(&other, &"tuple variant")),
            None => Err(de::Error::invalid_type(
                de::Unexpected::UnitVariant,
                &"tuple variant",
            )),
        }
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(value) => de::Deserializer::deserialize_struct(
                ValueDeserializer::new(value),
                "",
                fields,
                visitor,
            ),
            None => Err(de::Error::invalid_type(
                de::Unexpected::UnitVariant,
                &"struct variant",
            )),
        }
    }
}

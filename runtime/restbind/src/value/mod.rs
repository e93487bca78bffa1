//! The output of the decoding engine.
use std::collections::BTreeMap;

pub use de::{from_value, ConversionError};

mod de;

#[derive(Debug, Clone, PartialEq)]
/// A value decoded from request data.
///
/// Convert it into your own types with [`from_value`], or into a JSON value via
/// [`serde_json::Value::from`].
pub enum DecodedValue {
    /// Nothing: the value of an absent optional field.
    Null,
    /// A number. Integers and floats alike are decoded as 64-bit floats.
    Number(f64),
    Bool(bool),
    Text(String),
    Sequence(Vec<DecodedValue>),
    /// Entries keyed by the keys found in the data.
    Mapping(BTreeMap<String, DecodedValue>),
    /// Fields keyed by their declared names, in declaration order.
    Record(Vec<(String, DecodedValue)>),
}

impl DecodedValue {
    /// The field named `name`, if `self` is a record that has one.
    pub fn field(&self, name: &str) -> Option<&DecodedValue> {
        match self {
            DecodedValue::Record(fields) => fields
                .iter()
                .find_map(|(field, value)| (field == name).then_some(value)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DecodedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DecodedValue::Null)
    }

    /// A short name for the kind of value, used in error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            DecodedValue::Null => "null",
            DecodedValue::Number(_) => "number",
            DecodedValue::Bool(_) => "boolean",
            DecodedValue::Text(_) => "text",
            DecodedValue::Sequence(_) => "sequence",
            DecodedValue::Mapping(_) => "mapping",
            DecodedValue::Record(_) => "record",
        }
    }
}

impl From<DecodedValue> for serde_json::Value {
    fn from(value: DecodedValue) -> Self {
        match value {
            DecodedValue::Null => serde_json::Value::Null,
            DecodedValue::Number(n) => serde_json::Number::from_f64(n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            DecodedValue::Bool(b) => serde_json::Value::Bool(b),
            DecodedValue::Text(s) => serde_json::Value::String(s),
            DecodedValue::Sequence(elements) => {
                serde_json::Value::Array(elements.into_iter().map(Into::into).collect())
            }
            DecodedValue::Mapping(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
            DecodedValue::Record(fields) => serde_json::Value::Object(
                fields.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

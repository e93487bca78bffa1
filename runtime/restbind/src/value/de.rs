//! Convert a [`DecodedValue`] into any type that implements [`serde::Deserialize`].
use std::fmt;

use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Unexpected, Visitor};
use serde::{forward_to_deserialize_any, Deserializer};

use super::DecodedValue;

/// Convert a [`DecodedValue`] into a `T`.
///
/// The error reports the path of the value that couldn't be converted.
///
/// ```rust
/// use restbind::value::from_value;
/// use restbind::DecodedValue;
///
/// #[derive(serde::Deserialize)]
/// struct Home {
///     id: u32,
///     tags: Vec<String>,
///     owner: Option<String>,
/// }
///
/// let value = DecodedValue::Record(vec![
///     ("id".into(), DecodedValue::Number(7.0)),
///     ("tags".into(), DecodedValue::Sequence(vec![DecodedValue::Text("cozy".into())])),
///     ("owner".into(), DecodedValue::Null),
/// ]);
/// let home: Home = from_value(value).unwrap();
/// assert_eq!(home.id, 7);
/// assert_eq!(home.tags, vec!["cozy"]);
/// assert_eq!(home.owner, None);
/// ```
pub fn from_value<T>(value: DecodedValue) -> Result<T, serde_path_to_error::Error<ConversionError>>
where
    T: DeserializeOwned,
{
    serde_path_to_error::deserialize(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A [`DecodedValue`] doesn't fit the type it is being converted into.
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl de::Error for ConversionError {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self {
            message: msg.to_string(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConversionError {}

macro_rules! deserialize_integer {
    ($($trait_fn:ident),+ $(,)?) => {
        $(
            fn $trait_fn<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                self.deserialize_integer(visitor)
            }
        )+
    };
}

impl DecodedValue {
    // Numbers are decoded as floats: narrow them if they are whole, reject them otherwise.
    fn deserialize_integer<'de, V>(self, visitor: V) -> Result<V::Value, ConversionError>
    where
        V: Visitor<'de>,
    {
        match self {
            DecodedValue::Number(n) if n.fract() == 0.0 && n < 0.0 && n >= i64::MIN as f64 => {
                visitor.visit_i64(n as i64)
            }
            // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
            DecodedValue::Number(n) if n.fract() == 0.0 && n >= 0.0 && n < u64::MAX as f64 => {
                visitor.visit_u64(n as u64)
            }
            DecodedValue::Number(n) => Err(de::Error::invalid_type(Unexpected::Float(n), &visitor)),
            other => other.deserialize_any(visitor),
        }
    }
}

impl<'de> Deserializer<'de> for DecodedValue {
    type Error = ConversionError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self {
            DecodedValue::Null => visitor.visit_unit(),
            DecodedValue::Number(n) => visitor.visit_f64(n),
            DecodedValue::Bool(b) => visitor.visit_bool(b),
            DecodedValue::Text(s) => visitor.visit_string(s),
            DecodedValue::Sequence(elements) => {
                let mut seq = SeqDeserializer::<_, ConversionError>::new(elements.into_iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            DecodedValue::Mapping(entries) => {
                let mut map = MapDeserializer::<_, ConversionError>::new(entries.into_iter());
                let value = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(value)
            }
            DecodedValue::Record(fields) => {
                let mut map = MapDeserializer::<_, ConversionError>::new(fields.into_iter());
                let value = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(value)
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self {
            DecodedValue::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self {
            // Only unit variants can be spelled out in request parameters.
            DecodedValue::Text(s) => {
                let variant: StringDeserializer<ConversionError> = s.into_deserializer();
                visitor.visit_enum(variant)
            }
            other => Err(de::Error::invalid_type(
                Unexpected::Other(other.kind()),
                &"a unit variant",
            )),
        }
    }

    deserialize_integer!(
        deserialize_i8,
        deserialize_i16,
        deserialize_i32,
        deserialize_i64,
        deserialize_i128,
        deserialize_u8,
        deserialize_u16,
        deserialize_u32,
        deserialize_u64,
        deserialize_u128,
    );

    forward_to_deserialize_any! {
        bool f32 f64 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, ConversionError> for DecodedValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

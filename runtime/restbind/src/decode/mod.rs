//! Decode raw request data into a [`DecodedValue`], guided by a [`TypeDescriptor`].
//!
//! The entrypoint is [`decode`].
use std::collections::BTreeMap;

use crate::descriptor::{OpaqueDescriptor, RecordDescriptor, TypeDescriptor};
use crate::reader::PathReader;
use crate::value::DecodedValue;

pub use errors::{DecodeError, ScalarKind};

pub mod errors;

/// The capability of decoding oneself.
///
/// Attach it to an opaque type via [`TypeDescriptor::self_decoding`]:
/// the engine defers entirely to the hook for that type, without looking further.
///
/// ```rust
/// use restbind::decode::{decode, DecodeError, SelfDecode};
/// use restbind::descriptor::TypeDescriptor;
/// use restbind::reader::{PathReader, QueryMap};
/// use restbind::DecodedValue;
///
/// /// A `#rrggbb` color, decoded as a sequence of three numbers.
/// struct Rgb;
///
/// impl SelfDecode for Rgb {
///     fn decode(&self, reader: &dyn PathReader) -> Result<Option<DecodedValue>, DecodeError> {
///         let Some(raw) = reader.get()?.into_iter().next() else {
///             return Ok(None);
///         };
///         let hex = raw.strip_prefix('#').filter(|h| h.len() == 6);
///         let channels = hex
///             .and_then(|h| {
///                 (0..3)
///                     .map(|i| u8::from_str_radix(&h[2 * i..2 * i + 2], 16).ok())
///                     .collect::<Option<Vec<_>>>()
///             })
///             .ok_or_else(|| DecodeError::custom(reader.path(), "expected a `#rrggbb` color"))?;
///         Ok(Some(DecodedValue::Sequence(
///             channels.into_iter().map(|c| DecodedValue::Number(c.into())).collect(),
///         )))
///     }
/// }
///
/// let query = QueryMap::from_query_str("color=%23ff8000");
/// let root = query.reader();
/// let color = decode(
///     root.reader("color").as_ref(),
///     &TypeDescriptor::self_decoding("Rgb", Rgb),
/// )
/// .unwrap();
/// assert_eq!(
///     color,
///     Some(DecodedValue::Sequence(vec![
///         DecodedValue::Number(255.0),
///         DecodedValue::Number(128.0),
///         DecodedValue::Number(0.0),
///     ]))
/// );
/// ```
pub trait SelfDecode: Send + Sync {
    /// Decode a value from `reader`.
    ///
    /// Return `Ok(None)` if there is nothing to decode at the reader's path.
    fn decode(&self, reader: &dyn PathReader) -> Result<Option<DecodedValue>, DecodeError>;

    /// The value taken by an optional field of this type when nothing was found for it.
    fn zero_value(&self) -> DecodedValue {
        DecodedValue::Null
    }
}

/// Decode the data found by `reader` into the shape described by `descriptor`.
///
/// It returns `Ok(None)` if no data was found at all.
/// The first error encountered aborts the whole decoding.
///
/// ```rust
/// use restbind::decode::decode;
/// use restbind::descriptor::{FieldDescriptor, FieldMetadata, TypeDescriptor};
/// use restbind::reader::QueryMap;
/// use restbind::DecodedValue;
///
/// let descriptor = TypeDescriptor::record(
///     "Home",
///     vec![FieldDescriptor::new("Id", TypeDescriptor::Integer, FieldMetadata::required())],
/// );
/// let query = QueryMap::from_query_str("id=42");
/// let home = decode(&query.reader(), &descriptor).unwrap().unwrap();
/// assert_eq!(home.field("Id"), Some(&DecodedValue::Number(42.0)));
/// ```
#[tracing::instrument(level = "trace", name = "decode_parameters", skip_all, fields(path = %reader.path(), target = %descriptor.type_name()))]
pub fn decode(
    reader: &dyn PathReader,
    descriptor: &TypeDescriptor,
) -> Result<Option<DecodedValue>, DecodeError> {
    Ok(decode_all(reader, descriptor)?.into_iter().next())
}

/// Decode every value found by `reader` into the shape described by `descriptor`.
///
/// Scalars yield one value per raw value found at the reader's path (e.g. a repeated
/// query parameter). Records always yield exactly one value. Sequences and mappings
/// yield one value, or none if nothing was found for them.
pub fn decode_all(
    reader: &dyn PathReader,
    descriptor: &TypeDescriptor,
) -> Result<Vec<DecodedValue>, DecodeError> {
    match descriptor {
        TypeDescriptor::Integer | TypeDescriptor::Float => decode_numbers(reader),
        TypeDescriptor::Boolean => decode_booleans(reader),
        TypeDescriptor::Text => Ok(reader.get()?.into_iter().map(DecodedValue::Text).collect()),
        TypeDescriptor::Sequence(element) => decode_sequence(reader, element),
        TypeDescriptor::Mapping { key, value } => decode_mapping(reader, key, value),
        TypeDescriptor::Record(record) => decode_record(reader, record),
        TypeDescriptor::Optional(inner) => decode_all(reader, inner),
        TypeDescriptor::Opaque(opaque) => decode_opaque(reader, opaque),
    }
}

fn decode_numbers(reader: &dyn PathReader) -> Result<Vec<DecodedValue>, DecodeError> {
    reader
        .get()?
        .into_iter()
        .map(|raw| match raw.parse::<f64>() {
            Ok(n) => Ok(DecodedValue::Number(n)),
            Err(_) => Err(DecodeError::ParseError {
                path: reader.path().to_string(),
                raw,
                expected: ScalarKind::Number,
            }),
        })
        .collect()
}

fn decode_booleans(reader: &dyn PathReader) -> Result<Vec<DecodedValue>, DecodeError> {
    reader
        .get()?
        .into_iter()
        .map(|raw| {
            let boolean = match raw.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            };
            boolean
                .map(DecodedValue::Bool)
                .ok_or_else(|| DecodeError::ParseError {
                    path: reader.path().to_string(),
                    raw,
                    expected: ScalarKind::Boolean,
                })
        })
        .collect()
}

// Elements are read at the sequence's own path: no indexed sub-paths are synthesized.
fn decode_sequence(
    reader: &dyn PathReader,
    element: &TypeDescriptor,
) -> Result<Vec<DecodedValue>, DecodeError> {
    let elements = decode_all(reader, element)?;
    if elements.is_empty() {
        return Ok(vec![]);
    }
    Ok(vec![DecodedValue::Sequence(elements)])
}

fn decode_mapping(
    reader: &dyn PathReader,
    key: &TypeDescriptor,
    value: &TypeDescriptor,
) -> Result<Vec<DecodedValue>, DecodeError> {
    if *key != TypeDescriptor::Text {
        return Err(DecodeError::NonStringKey {
            path: reader.path().to_string(),
            key_type: key.type_name().into_owned(),
        });
    }
    let mut entries = BTreeMap::new();
    reader.range(&mut |entry_key, child| {
        let Some(decoded) = decode_all(child, value)?.into_iter().next() else {
            return Err(DecodeError::MissingRequired {
                path: child.path().to_string(),
            });
        };
        entries.insert(entry_key.to_owned(), decoded);
        Ok(())
    })?;
    if entries.is_empty() {
        return Ok(vec![]);
    }
    Ok(vec![DecodedValue::Mapping(entries)])
}

fn decode_record(
    reader: &dyn PathReader,
    record: &RecordDescriptor,
) -> Result<Vec<DecodedValue>, DecodeError> {
    let mut fields = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        let field_reader = reader.reader(field.lookup_name());
        // Extra raw values are ignored: a non-sequence field takes the first one.
        let decoded = decode_all(field_reader.as_ref(), &field.ty)?.into_iter().next();
        let value = match decoded {
            Some(value) => value,
            None if field.metadata.required => {
                return Err(DecodeError::MissingRequired {
                    path: field_reader.path().to_string(),
                });
            }
            None => {
                tracing::trace!(
                    path = %field_reader.path(),
                    "No value found for optional field `{}`, using its zero value",
                    field.name
                );
                field.ty.zero_value()
            }
        };
        fields.push((field.name.clone(), value));
    }
    Ok(vec![DecodedValue::Record(fields)])
}

fn decode_opaque(
    reader: &dyn PathReader,
    opaque: &OpaqueDescriptor,
) -> Result<Vec<DecodedValue>, DecodeError> {
    match opaque.hook() {
        Some(hook) => Ok(hook.decode(reader)?.into_iter().collect()),
        None => Err(DecodeError::InvalidType {
            path: reader.path().to_string(),
            type_name: opaque.name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_all, DecodeError, ScalarKind, SelfDecode};
    use crate::descriptor::{FieldDescriptor, FieldMetadata, TypeDescriptor};
    use crate::reader::{JsonDocument, PathReader, QueryMap};
    use crate::value::DecodedValue;

    fn field(name: &str, ty: TypeDescriptor, tag: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, ty, FieldMetadata::parse(tag))
    }

    fn query(raw: &str) -> QueryMap {
        QueryMap::from_query_str(raw)
    }

    /// `{A: {a: Text required, b: Text required} required, Number: Float, C: Float required}`
    fn test_b() -> TypeDescriptor {
        let test_a = TypeDescriptor::record(
            "TestA",
            vec![
                field("a", TypeDescriptor::Text, "required"),
                field("b", TypeDescriptor::Text, "required"),
            ],
        );
        TypeDescriptor::record(
            "TestB",
            vec![
                field("A", test_a, "required"),
                field("Number", TypeDescriptor::Float, ""),
                field("C", TypeDescriptor::Float, "required"),
            ],
        )
    }

    #[test]
    fn scalars() {
        let q = query("n=42&f=-1.5&b=true&t=hello%20world");
        let root = q.reader();
        let scalar = |key: &str, descriptor: TypeDescriptor| {
            decode(root.reader(key).as_ref(), &descriptor).unwrap()
        };
        assert_eq!(scalar("n", TypeDescriptor::Integer), Some(DecodedValue::Number(42.0)));
        assert_eq!(scalar("f", TypeDescriptor::Float), Some(DecodedValue::Number(-1.5)));
        assert_eq!(scalar("b", TypeDescriptor::Boolean), Some(DecodedValue::Bool(true)));
        assert_eq!(
            scalar("t", TypeDescriptor::Text),
            Some(DecodedValue::Text("hello world".into()))
        );
        assert_eq!(scalar("missing", TypeDescriptor::Text), None);
    }

    #[test]
    fn invalid_number() {
        let q = query("n=forty-two");
        let err = decode(q.reader().reader("n").as_ref(), &TypeDescriptor::Integer).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"`forty-two` is not a valid number (found at `n`)");
        assert!(matches!(
            err,
            DecodeError::ParseError { expected: ScalarKind::Number, .. }
        ));
    }

    #[test]
    fn booleans_are_strict() {
        let q = query("b=True");
        let err = decode(q.reader().reader("b").as_ref(), &TypeDescriptor::Boolean).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"`True` is not a valid boolean (found at `b`)");
    }

    #[test]
    fn repeated_values_decode_one_by_one() {
        let q = query("n=1&n=2");
        let values = decode_all(q.reader().reader("n").as_ref(), &TypeDescriptor::Integer).unwrap();
        assert_eq!(values, vec![DecodedValue::Number(1.0), DecodedValue::Number(2.0)]);
    }

    #[test]
    fn nested_records_from_query() {
        let q = query("a.a=hello&a.b=world&c=1.9");
        let decoded = decode(&q.reader(), &test_b()).unwrap().unwrap();
        let expected = DecodedValue::Record(vec![
            (
                "A".into(),
                DecodedValue::Record(vec![
                    ("a".into(), DecodedValue::Text("hello".into())),
                    ("b".into(), DecodedValue::Text("world".into())),
                ]),
            ),
            ("Number".into(), DecodedValue::Number(0.0)),
            ("C".into(), DecodedValue::Number(1.9)),
        ]);
        assert_eq!(decoded, expected);
    }

    #[test]
    fn missing_required_field() {
        let q = query("a.a=hello&a.b=world");
        let err = decode(&q.reader(), &test_b()).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"`c` is required, but no value was provided for it");
        assert_eq!(err.path(), "c");
    }

    #[test]
    fn missing_required_nested_field() {
        let q = query("a.a=hello&c=1");
        let err = decode(&q.reader(), &test_b()).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequired { ref path } if path == "a.b"));
    }

    #[test]
    fn optional_field_without_required_tag() {
        let descriptor = TypeDescriptor::record("R", vec![field("C", TypeDescriptor::Float, "")]);
        let decoded = decode(&query("").reader(), &descriptor).unwrap().unwrap();
        assert_eq!(decoded.field("C"), Some(&DecodedValue::Number(0.0)));
    }

    #[test]
    fn override_name_wins() {
        let descriptor =
            TypeDescriptor::record("R", vec![field("Name", TypeDescriptor::Text, "x")]);
        let q = query("name=declared&x=override");
        let decoded = decode(&q.reader(), &descriptor).unwrap().unwrap();
        assert_eq!(decoded.field("Name"), Some(&DecodedValue::Text("override".into())));
    }

    #[test]
    fn first_value_wins_for_scalar_fields() {
        let descriptor = TypeDescriptor::record("R", vec![field("n", TypeDescriptor::Integer, "")]);
        let q = query("n=1&n=2");
        let decoded = decode(&q.reader(), &descriptor).unwrap().unwrap();
        assert_eq!(decoded.field("n"), Some(&DecodedValue::Number(1.0)));
    }

    #[test]
    fn sequences_collect_every_value_at_their_own_path() {
        let descriptor = TypeDescriptor::record(
            "R",
            vec![field("ids", TypeDescriptor::sequence(TypeDescriptor::Integer), "")],
        );
        let q = query("ids=1&ids=2");
        let decoded = decode(&q.reader(), &descriptor).unwrap().unwrap();
        assert_eq!(
            decoded.field("ids"),
            Some(&DecodedValue::Sequence(vec![
                DecodedValue::Number(1.0),
                DecodedValue::Number(2.0)
            ]))
        );
    }

    #[test]
    fn empty_sequence_is_absent() {
        let descriptor = TypeDescriptor::record(
            "R",
            vec![field("ids", TypeDescriptor::sequence(TypeDescriptor::Integer), "required")],
        );
        let err = decode(&query("").reader(), &descriptor).unwrap_err();
        assert_eq!(err.path(), "ids");
    }

    #[test]
    fn mapping_from_json() {
        let doc = JsonDocument::new(&br#"{"a":"1","b":"2"}"#[..]);
        let descriptor = TypeDescriptor::mapping(TypeDescriptor::Text, TypeDescriptor::Text);
        let decoded = decode(&doc.reader(), &descriptor).unwrap().unwrap();
        let expected = DecodedValue::Mapping(
            [("a", "1"), ("b", "2")]
                .into_iter()
                .map(|(k, v)| (k.to_owned(), DecodedValue::Text(v.to_owned())))
                .collect(),
        );
        assert_eq!(decoded, expected);
    }

    #[test]
    fn mapping_from_query() {
        let descriptor = TypeDescriptor::record(
            "R",
            vec![field(
                "m",
                TypeDescriptor::mapping(TypeDescriptor::Text, TypeDescriptor::Integer),
                "",
            )],
        );
        let q = query("m.x=1&m.y=2&other=3");
        let decoded = decode(&q.reader(), &descriptor).unwrap().unwrap();
        let DecodedValue::Mapping(m) = decoded.field("m").unwrap() else {
            panic!("Expected a mapping");
        };
        assert_eq!(m.len(), 2);
        assert_eq!(m["x"], DecodedValue::Number(1.0));
        assert_eq!(m["y"], DecodedValue::Number(2.0));
    }

    #[test]
    fn nested_query_keys_below_a_mapping_entry() {
        let q = query("m.a.b=1");
        // Scalar entries are read at `m.a` only: nested keys don't provide a value for it.
        let flat = TypeDescriptor::mapping(TypeDescriptor::Text, TypeDescriptor::Text);
        let err = decode(q.reader().reader("m").as_ref(), &flat).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"`m.a` is required, but no value was provided for it");

        // Nested keys are decoded by a nested mapping.
        let nested = TypeDescriptor::mapping(TypeDescriptor::Text, flat);
        let decoded = decode(q.reader().reader("m").as_ref(), &nested).unwrap().unwrap();
        let DecodedValue::Mapping(outer) = decoded else {
            panic!("Expected a mapping");
        };
        let DecodedValue::Mapping(inner) = &outer["a"] else {
            panic!("Expected a nested mapping");
        };
        assert_eq!(inner["b"], DecodedValue::Text("1".into()));
    }

    #[test]
    fn empty_mapping_is_absent() {
        let descriptor = TypeDescriptor::record(
            "R",
            vec![field(
                "m",
                TypeDescriptor::mapping(TypeDescriptor::Text, TypeDescriptor::Text),
                "required",
            )],
        );
        let err = decode(&query("n.x=1").reader(), &descriptor).unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequired { ref path } if path == "m"));
    }

    #[test]
    fn mapping_keys_must_be_text() {
        let descriptor = TypeDescriptor::mapping(TypeDescriptor::Integer, TypeDescriptor::Text);
        let err = decode(&query("1=a").reader(), &descriptor).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Mappings must be keyed by text, but the mapping at `` is keyed by `integer`");
        assert!(err.is_programmer_error());
    }

    #[test]
    fn mapping_over_a_json_scalar() {
        let doc = JsonDocument::new(&br#"{"m": [1, 2]}"#[..]);
        let descriptor = TypeDescriptor::record(
            "R",
            vec![field(
                "m",
                TypeDescriptor::mapping(TypeDescriptor::Text, TypeDescriptor::Integer),
                "",
            )],
        );
        let err = decode(&doc.reader(), &descriptor).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Expected an object at `m`");
    }

    #[test]
    fn mapping_missing_from_a_json_body() {
        let descriptor = TypeDescriptor::record(
            "R",
            vec![
                field("a", TypeDescriptor::Integer, ""),
                field(
                    "m",
                    TypeDescriptor::mapping(TypeDescriptor::Text, TypeDescriptor::Text),
                    "",
                ),
            ],
        );
        for body in [&br#"{"a": 1}"#[..], &br#"{"a": 1, "m": null}"#[..]] {
            let doc = JsonDocument::new(body);
            let err = decode(&doc.reader(), &descriptor).unwrap_err();
            assert!(matches!(err, DecodeError::NotAnObject { ref path } if path == "m"));
        }

        // An empty object is absent: the optional mapping takes its zero value.
        let doc = JsonDocument::new(&br#"{"a": 1, "m": {}}"#[..]);
        let decoded = decode(&doc.reader(), &descriptor).unwrap().unwrap();
        assert_eq!(decoded.field("m"), Some(&DecodedValue::Mapping(Default::default())));
    }

    #[test]
    fn optional_is_transparent_but_null_when_absent() {
        let descriptor = TypeDescriptor::record(
            "R",
            vec![
                field("a", TypeDescriptor::optional(TypeDescriptor::Integer), ""),
                field("b", TypeDescriptor::optional(TypeDescriptor::Integer), ""),
            ],
        );
        let q = query("a=3");
        let decoded = decode(&q.reader(), &descriptor).unwrap().unwrap();
        assert_eq!(decoded.field("a"), Some(&DecodedValue::Number(3.0)));
        assert_eq!(decoded.field("b"), Some(&DecodedValue::Null));
    }

    #[test]
    fn opaque_without_hook_is_an_invalid_type() {
        let descriptor = TypeDescriptor::record(
            "R",
            vec![field("when", TypeDescriptor::unsupported("Instant"), "")],
        );
        let err = decode(&query("when=now").reader(), &descriptor).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"`Instant`, the expected type of `when`, is not supported");
        assert!(err.is_programmer_error());
    }

    #[test]
    fn opaque_with_hook_decodes_itself() {
        struct Upper;

        impl SelfDecode for Upper {
            fn decode(
                &self,
                reader: &dyn PathReader,
            ) -> Result<Option<DecodedValue>, DecodeError> {
                Ok(reader
                    .get()?
                    .into_iter()
                    .next()
                    .map(|raw| DecodedValue::Text(raw.to_uppercase())))
            }

            fn zero_value(&self) -> DecodedValue {
                DecodedValue::Text("NONE".into())
            }
        }

        let descriptor = TypeDescriptor::record(
            "R",
            vec![
                field("a", TypeDescriptor::self_decoding("Upper", Upper), ""),
                field("b", TypeDescriptor::self_decoding("Upper", Upper), ""),
            ],
        );
        let decoded = decode(&query("a=shout").reader(), &descriptor).unwrap().unwrap();
        assert_eq!(decoded.field("a"), Some(&DecodedValue::Text("SHOUT".into())));
        assert_eq!(decoded.field("b"), Some(&DecodedValue::Text("NONE".into())));
    }

    #[test]
    fn decoding_is_idempotent() {
        let doc = JsonDocument::new(&br#"{"a":{"a":"x","b":"y"},"c":2}"#[..]);
        let first = decode(&doc.reader(), &test_b()).unwrap();
        let second = decode(&doc.reader(), &test_b()).unwrap();
        assert_eq!(first, second);
    }
}

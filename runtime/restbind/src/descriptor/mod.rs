//! Describe the shape of the values you want to decode.
//!
//! [`TypeDescriptor`] is a closed description of a decoding target.
//! Descriptors are meant to be built once (e.g. at startup, via [`Describe`])
//! and then reused, read-only, across many decoding calls.
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::decode::SelfDecode;
use crate::value::DecodedValue;

pub use describe::Describe;
pub use metadata::{FieldMetadata, METADATA_TAG};

mod describe;
mod metadata;

#[derive(Debug, Clone, PartialEq)]
/// The shape of a decoding target.
pub enum TypeDescriptor {
    /// A whole number. Parsed as a 64-bit float, like [`TypeDescriptor::Float`].
    Integer,
    /// A floating point number.
    Float,
    /// `true` or `false`.
    Boolean,
    /// A string, passed through verbatim.
    Text,
    /// A sequence of elements sharing the same shape.
    Sequence(Box<TypeDescriptor>),
    /// A string-keyed mapping.
    ///
    /// The key descriptor must be [`TypeDescriptor::Text`]. Any other key shape is
    /// accepted here and rejected when decoding.
    Mapping {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// A record with named fields.
    Record(RecordDescriptor),
    /// A value that may be missing altogether.
    ///
    /// It decodes exactly like its inner shape, but it is null when absent.
    Optional(Box<TypeDescriptor>),
    /// A type that doesn't fit any of the shapes above.
    ///
    /// It can only be decoded if it provides its own [`SelfDecode`] hook.
    Opaque(OpaqueDescriptor),
}

impl TypeDescriptor {
    /// A [`TypeDescriptor::Sequence`] of `element`.
    pub fn sequence(element: TypeDescriptor) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// A [`TypeDescriptor::Mapping`] from `key` to `value`.
    pub fn mapping(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Mapping {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// A [`TypeDescriptor::Optional`] wrapping `inner`.
    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// A [`TypeDescriptor::Record`] with the given fields, in declaration order.
    pub fn record(name: impl Into<Cow<'static, str>>, fields: Vec<FieldDescriptor>) -> Self {
        Self::Record(RecordDescriptor::new(name, fields))
    }

    /// A [`TypeDescriptor::Opaque`] without a decoding hook.
    ///
    /// Decoding it always fails with [`DecodeError::InvalidType`](crate::decode::DecodeError::InvalidType).
    pub fn unsupported(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Opaque(OpaqueDescriptor {
            name: name.into(),
            hook: None,
        })
    }

    /// A [`TypeDescriptor::Opaque`] that decodes itself via `hook`.
    pub fn self_decoding<H>(name: impl Into<Cow<'static, str>>, hook: H) -> Self
    where
        H: SelfDecode + 'static,
    {
        Self::Opaque(OpaqueDescriptor {
            name: name.into(),
            hook: Some(Arc::new(hook)),
        })
    }

    /// The value taken by an optional field when nothing was found for it.
    pub fn zero_value(&self) -> DecodedValue {
        match self {
            Self::Integer | Self::Float => DecodedValue::Number(0.0),
            Self::Boolean => DecodedValue::Bool(false),
            Self::Text => DecodedValue::Text(String::new()),
            Self::Sequence(_) => DecodedValue::Sequence(Vec::new()),
            Self::Mapping { .. } => DecodedValue::Mapping(Default::default()),
            Self::Record(record) => DecodedValue::Record(
                record
                    .fields
                    .iter()
                    .map(|f| (f.name.clone(), f.ty.zero_value()))
                    .collect(),
            ),
            Self::Optional(_) => DecodedValue::Null,
            Self::Opaque(opaque) => opaque
                .hook
                .as_ref()
                .map_or(DecodedValue::Null, |hook| hook.zero_value()),
        }
    }

    /// A human-readable name for this shape, used in errors and logs.
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Self::Integer => "integer".into(),
            Self::Float => "float".into(),
            Self::Boolean => "boolean".into(),
            Self::Text => "text".into(),
            Self::Sequence(element) => format!("sequence<{}>", element.type_name()).into(),
            Self::Mapping { key, value } => {
                format!("mapping<{}, {}>", key.type_name(), value.type_name()).into()
            }
            Self::Optional(inner) => format!("optional<{}>", inner.type_name()).into(),
            Self::Record(record) => Cow::Borrowed(&*record.name),
            Self::Opaque(opaque) => Cow::Borrowed(&*opaque.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The fields of a record, in declaration order.
pub struct RecordDescriptor {
    pub name: Cow<'static, str>,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<Cow<'static, str>>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A single field of a [`RecordDescriptor`].
pub struct FieldDescriptor {
    /// The declared name of the field.
    ///
    /// It is used as key in [`DecodedValue::Record`].
    pub name: String,
    /// The shape of the field.
    pub ty: TypeDescriptor,
    /// Decoding hints for this field.
    pub metadata: FieldMetadata,
    lookup_name: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor, metadata: FieldMetadata) -> Self {
        let name = name.into();
        let lookup_name = match &metadata.override_name {
            Some(name) => name.clone(),
            None => name.to_lowercase(),
        };
        Self {
            name,
            ty,
            metadata,
            lookup_name,
        }
    }

    /// The path segment this field is read from.
    ///
    /// It's the override name, if one was provided, or the lower-cased declared name otherwise.
    pub fn lookup_name(&self) -> &str {
        &self.lookup_name
    }
}

#[derive(Clone)]
/// A type that the generic engine can't decode on its own.
pub struct OpaqueDescriptor {
    pub name: Cow<'static, str>,
    pub(crate) hook: Option<Arc<dyn SelfDecode>>,
}

impl OpaqueDescriptor {
    /// The decoding hook, if the type decodes itself.
    pub fn hook(&self) -> Option<&dyn SelfDecode> {
        self.hook.as_deref()
    }
}

impl fmt::Debug for OpaqueDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueDescriptor")
            .field("name", &self.name)
            .field("self_decoding", &self.hook.is_some())
            .finish()
    }
}

impl PartialEq for OpaqueDescriptor {
    fn eq(&self, other: &Self) -> bool {
        let same_hook = match (&self.hook, &other.hook) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        };
        self.name == other.name && same_hook
    }
}

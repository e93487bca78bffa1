//! Errors that can happen when decoding request parameters.
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`decode`](super::decode) when the data doesn't fit the
/// target [`TypeDescriptor`](crate::descriptor::TypeDescriptor).
///
/// Every variant carries the dotted path at which the failure occurred.
/// The root path is the empty string.
pub enum DecodeError {
    /// The target shape can't be decoded: it is opaque and it doesn't decode itself.
    ///
    /// This is a programmer error, rather than a problem with the incoming data.
    #[error("`{type_name}`, the expected type of `{path}`, is not supported")]
    InvalidType { path: String, type_name: String },
    /// A raw value could not be parsed as the expected scalar.
    #[error("`{raw}` is not a valid {expected} (found at `{path}`)")]
    ParseError {
        path: String,
        raw: String,
        expected: ScalarKind,
    },
    /// A required field has no value.
    #[error("`{path}` is required, but no value was provided for it")]
    MissingRequired { path: String },
    /// A mapping was expected at a path that holds something else.
    #[error("Expected an object at `{path}`")]
    NotAnObject { path: String },
    /// The raw input can't be parsed.
    #[error("The input is not a well-formed JSON document")]
    MalformedInput {
        path: String,
        #[source]
        source: Arc<serde_json::Error>,
    },
    /// A mapping was declared with a key type other than text.
    ///
    /// This is a programmer error, rather than a problem with the incoming data.
    #[error("Mappings must be keyed by text, but the mapping at `{path}` is keyed by `{key_type}`")]
    NonStringKey { path: String, key_type: String },
    /// A self-decoding type rejected the data at `path`.
    #[error("Invalid value at `{path}`: {message}")]
    Custom { path: String, message: String },
}

impl DecodeError {
    /// Build a [`DecodeError::Custom`], for use in [`SelfDecode`](super::SelfDecode) implementations.
    pub fn custom(path: impl ToString, message: impl fmt::Display) -> Self {
        Self::Custom {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// The dotted path at which the failure occurred.
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidType { path, .. }
            | Self::ParseError { path, .. }
            | Self::MissingRequired { path }
            | Self::NotAnObject { path }
            | Self::MalformedInput { path, .. }
            | Self::NonStringKey { path, .. }
            | Self::Custom { path, .. } => path,
        }
    }

    /// `true` if the failure is caused by a misconfigured target type,
    /// rather than by the incoming data.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::InvalidType { .. } | Self::NonStringKey { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The kind of scalar a raw value was expected to be.
pub enum ScalarKind {
    Number,
    Boolean,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Number => f.write_str("number"),
            ScalarKind::Boolean => f.write_str("boolean"),
        }
    }
}

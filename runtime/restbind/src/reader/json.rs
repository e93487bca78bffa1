use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use serde_json::Value;

use crate::decode::DecodeError;

use super::{PathReader, RangeCallback, ReaderPath};

#[derive(Debug)]
/// A raw JSON document, parsed the first time it is accessed.
///
/// The parsed tree is memoized and shared, read-only, by every [`JsonReader`]
/// derived from this document.
pub struct JsonDocument {
    raw: Bytes,
    parsed: OnceLock<Result<Value, Arc<serde_json::Error>>>,
}

impl JsonDocument {
    pub fn new(raw: impl Into<Bytes>) -> Self {
        Self {
            raw: raw.into(),
            parsed: OnceLock::new(),
        }
    }

    /// The raw bytes of the document.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Parse the document, if it hasn't been parsed yet, and return its root.
    ///
    /// It fails with [`DecodeError::MalformedInput`] if the document is not valid JSON.
    pub fn parse(&self) -> Result<&Value, DecodeError> {
        let parsed = self.parsed.get_or_init(|| {
            tracing::trace!(n_bytes = self.raw.len(), "Parsing JSON document");
            serde_json::from_slice(&self.raw).map_err(Arc::new)
        });
        parsed
            .as_ref()
            .map_err(|source| DecodeError::MalformedInput {
                path: String::new(),
                source: source.clone(),
            })
    }

    /// A reader positioned at the root of this document.
    pub fn reader(&self) -> JsonReader<'_> {
        JsonReader {
            path: ReaderPath::root(),
            document: self,
        }
    }
}

#[derive(Debug, Clone)]
/// A [`PathReader`] over a [`JsonDocument`].
///
/// Path segments select object members by key and array elements by index.
pub struct JsonReader<'a> {
    path: ReaderPath,
    document: &'a JsonDocument,
}

impl JsonReader<'_> {
    /// The value found at `path`, if any.
    fn resolve<'v>(root: &'v Value, path: &ReaderPath) -> Option<&'v Value> {
        path.segments()
            .iter()
            .try_fold(root, |node, segment| match node {
                Value::Object(members) => members.get(segment),
                Value::Array(elements) => elements.get(segment.parse::<usize>().ok()?),
                _ => None,
            })
    }

    fn values_at(&self, path: &ReaderPath) -> Result<Vec<String>, DecodeError> {
        let root = self.document.parse()?;
        Ok(Self::resolve(root, path).map(stringify).unwrap_or_default())
    }
}

impl PathReader for JsonReader<'_> {
    fn get(&self) -> Result<Vec<String>, DecodeError> {
        self.values_at(&self.path)
    }

    fn search(&self, key: &str) -> Result<Vec<String>, DecodeError> {
        self.values_at(&self.path.child(key))
    }

    fn range(&self, f: &mut RangeCallback<'_>) -> Result<(), DecodeError> {
        let root = self.document.parse()?;
        // Missing members and `null` don't resolve to an object either.
        let Some(Value::Object(members)) = Self::resolve(root, &self.path) else {
            return Err(DecodeError::NotAnObject {
                path: self.path.to_string(),
            });
        };
        for key in members.keys() {
            let reader = JsonReader {
                path: self.path.child(key),
                document: self.document,
            };
            f(key, &reader)?;
        }
        Ok(())
    }

    fn path(&self) -> &ReaderPath {
        &self.path
    }

    fn reader(&self, key: &str) -> Box<dyn PathReader + '_> {
        Box::new(JsonReader {
            path: self.path.child(key),
            document: self.document,
        })
    }
}

/// Render a JSON value as a list of raw values.
///
/// Arrays are flattened one level, so that `[1, 2]` reads like a repeated query parameter.
fn stringify(value: &Value) -> Vec<String> {
    match value {
        Value::Array(elements) => elements.iter().filter_map(stringify_scalar).collect(),
        other => stringify_scalar(other).into_iter().collect(),
    }
}

fn stringify_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        composite => Some(composite.to_string()),
    }
}

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::decode::DecodeError;

use super::{PathReader, RangeCallback, ReaderPath};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The key/values pairs of a URL query string.
///
/// Repeated keys accumulate their values, in the order they appear.
///
/// ```rust
/// use restbind::reader::QueryMap;
///
/// let query = QueryMap::from_query_str("home.id=1&tag=a&tag=b&name=Hi%20there");
/// assert_eq!(query.get("home.id"), Some(&["1".to_string()][..]));
/// assert_eq!(query.get("tag").map(<[String]>::len), Some(2));
/// assert_eq!(query.get("name"), Some(&["Hi there".to_string()][..]));
/// ```
pub struct QueryMap {
    values: IndexMap<String, Vec<String>>,
}

impl QueryMap {
    /// Percent-decode a raw query string (without the leading `?`).
    pub fn from_query_str(query: &str) -> Self {
        form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// All the values stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Store `value` under `key`, after the values already stored there.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A reader positioned at the root of this query.
    pub fn reader(&self) -> QueryReader<'_> {
        QueryReader {
            path: ReaderPath::root(),
            values: self,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = QueryMap::default();
        for (key, value) in iter {
            map.append(key, value);
        }
        map
    }
}

impl From<HashMap<String, Vec<String>>> for QueryMap {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl From<IndexMap<String, Vec<String>>> for QueryMap {
    fn from(values: IndexMap<String, Vec<String>>) -> Self {
        Self { values }
    }
}

#[derive(Debug, Clone)]
/// A [`PathReader`] over a [`QueryMap`].
///
/// Dotted keys are interpreted as paths: `home.address=...` is found by the reader
/// positioned at `home`, under the key `address`.
pub struct QueryReader<'a> {
    path: ReaderPath,
    values: &'a QueryMap,
}

impl QueryReader<'_> {
    fn lookup(&self, key: &str) -> Vec<String> {
        self.values.get(key).map(<[String]>::to_vec).unwrap_or_default()
    }
}

impl PathReader for QueryReader<'_> {
    fn get(&self) -> Result<Vec<String>, DecodeError> {
        Ok(self.lookup(&self.path.to_string()))
    }

    fn search(&self, key: &str) -> Result<Vec<String>, DecodeError> {
        Ok(self.lookup(&self.path.child(key).to_string()))
    }

    fn range(&self, f: &mut RangeCallback<'_>) -> Result<(), DecodeError> {
        let prefix = if self.path.is_root() {
            String::new()
        } else {
            format!("{}.", self.path)
        };
        // Keys sharing the same direct child (e.g. `m.a.x` and `m.a.y`) collapse into one entry.
        let children: IndexSet<&str> = self
            .values
            .keys()
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .filter_map(|rest| rest.split('.').next())
            .filter(|child| !child.is_empty())
            .collect();
        for child in children {
            let reader = QueryReader {
                path: self.path.child(child),
                values: self.values,
            };
            f(child, &reader)?;
        }
        Ok(())
    }

    fn path(&self) -> &ReaderPath {
        &self.path
    }

    fn reader(&self, key: &str) -> Box<dyn PathReader + '_> {
        Box::new(QueryReader {
            path: self.path.child(key),
            values: self.values,
        })
    }
}

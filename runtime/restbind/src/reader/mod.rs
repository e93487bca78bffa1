//! Path-addressable views over raw request data.
//!
//! A [`PathReader`] is positioned at a dotted path (e.g. `home.address.city`)
//! inside a data source that it shares, read-only, with every reader derived from it.
//! Two data sources are supported:
//!
//! - [`QueryMap`], the key/values pairs of a URL query string ([`QueryReader`]);
//! - [`JsonDocument`], a JSON document parsed on first access ([`JsonReader`]).
use std::fmt;

use smallvec::SmallVec;

use crate::decode::DecodeError;

pub use json::{JsonDocument, JsonReader};
pub use query::{QueryMap, QueryReader};

mod json;
mod query;

/// The callback invoked by [`PathReader::range`] for each child key.
pub type RangeCallback<'a> =
    dyn FnMut(&str, &dyn PathReader) -> Result<(), DecodeError> + 'a;

/// A view over a data source, positioned at a path.
pub trait PathReader {
    /// All the raw values stored at the current path.
    ///
    /// An empty vector means that nothing was found: it is not an error.
    fn get(&self) -> Result<Vec<String>, DecodeError>;

    /// All the raw values stored at `<current path>.<key>`.
    fn search(&self, key: &str) -> Result<Vec<String>, DecodeError>;

    /// Invoke `f` for each distinct key directly below the current path,
    /// passing along a reader positioned at that key.
    ///
    /// The first error returned by `f` interrupts the enumeration and is returned.
    fn range(&self, f: &mut RangeCallback<'_>) -> Result<(), DecodeError>;

    /// The current path.
    fn path(&self) -> &ReaderPath;

    /// A new reader over the same data source, positioned at `<current path>.<key>`.
    fn reader(&self, key: &str) -> Box<dyn PathReader + '_>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// An ordered sequence of path segments, rendered with `.` as separator.
///
/// The root path has no segments and renders as an empty string.
pub struct ReaderPath {
    segments: SmallVec<[String; 4]>,
}

impl ReaderPath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Split a dotted key into a path.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self {
            segments: dotted.split('.').map(ToOwned::to_owned).collect(),
        }
    }

    /// This path, with `key` appended.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_owned());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ReaderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

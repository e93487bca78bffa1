//! Configure how request parameters are extracted.
use serde::{Deserialize, Serialize};
use ubyte::{ByteUnit, ToByteUnit};

/// Configure how [`Parameters`](super::Parameters) are extracted from incoming requests.
///
/// # Defaults
///
/// Bodies larger than 2 MB are rejected and only `application/json` is accepted
/// as a JSON content type:
///
/// ```rust
/// use restbind::request::config::{BodySizeLimit, ParamsConfig};
///
/// let config: ParamsConfig = serde_json::from_str("{}").unwrap();
/// assert!(!config.accept_json_suffix);
/// assert!(matches!(config.body_size_limit, BodySizeLimit::Enabled { .. }));
/// ```
///
/// # Overriding the default configuration
///
/// It's enough to specify the fields you want to override:
///
/// ```rust
/// use restbind::request::config::{BodySizeLimit, ParamsConfig};
///
/// let config: ParamsConfig = serde_json::from_str(r#"{
///     "body_size_limit": { "enabled": { "max_size": "10 KiB" } },
///     "accept_json_suffix": true
/// }"#).unwrap();
/// assert!(config.accept_json_suffix);
/// ```
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
#[non_exhaustive]
pub struct ParamsConfig {
    /// The upper limit on the size of JSON bodies.
    #[serde(default)]
    pub body_size_limit: BodySizeLimit,
    /// Accept `application/*+json` MIME types (e.g. `application/hal+json`)
    /// on top of `application/json`.
    #[serde(default)]
    pub accept_json_suffix: bool,
}

impl ParamsConfig {
    /// Initialize a new [`ParamsConfig`] using its default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upper limit on the size of JSON bodies.
    pub fn body_size_limit(mut self, limit: BodySizeLimit) -> Self {
        self.body_size_limit = limit;
        self
    }

    /// Accept `application/*+json` MIME types if `accept` is `true`.
    pub fn accept_json_suffix(mut self, accept: bool) -> Self {
        self.accept_json_suffix = accept;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
/// An upper limit on the size of incoming request bodies.
pub enum BodySizeLimit {
    /// There is an active limit on the size of incoming request bodies.
    Enabled {
        /// The maximum size of incoming request bodies, in bytes.
        max_size: ByteUnit,
    },
    /// There is no limit on the size of incoming request bodies.
    Disabled,
}

impl BodySizeLimit {
    /// The maximum accepted size, if the limit is enabled.
    pub fn max_size(&self) -> Option<ByteUnit> {
        match self {
            BodySizeLimit::Enabled { max_size } => Some(*max_size),
            BodySizeLimit::Disabled => None,
        }
    }
}

impl Default for BodySizeLimit {
    fn default() -> Self {
        Self::Enabled {
            max_size: 2.megabytes(),
        }
    }
}

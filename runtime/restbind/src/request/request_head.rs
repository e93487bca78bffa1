use http::{HeaderMap, Method, Uri, Version};

#[non_exhaustive]
#[derive(Debug, Clone)]
/// All the information that is transmitted as part of an HTTP request ahead of the body.
///
/// It includes the [method](Method), the [URI](Uri),
/// the [HTTP version](Version), and the [headers](HeaderMap).
pub struct RequestHead {
    pub method: Method,
    pub target: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestHead {
    /// The raw query string of the request target, without the leading `?`.
    ///
    /// It's empty if the target has no query.
    pub fn query(&self) -> &str {
        self.target.query().unwrap_or_default()
    }
}

impl From<http::request::Parts> for RequestHead {
    fn from(parts: http::request::Parts) -> Self {
        Self {
            method: parts.method,
            target: parts.uri,
            version: parts.version,
            headers: parts.headers,
        }
    }
}

//! Extract request parameters from incoming requests and bind them to typed values.
use std::marker::PhantomData;

use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use tracing_log_error::log_error;

use crate::decode::{self, DecodeError};
use crate::descriptor::{Describe, TypeDescriptor};
use crate::reader::{JsonDocument, PathReader, QueryMap};
use crate::value::{self, DecodedValue};

pub use config::{BodySizeLimit, ParamsConfig};
pub use request_head::RequestHead;

pub mod config;
pub mod errors;
mod request_head;

use errors::{
    ExtractParamsError, JsonContentTypeMismatch, MissingJsonContentType, ParamsConversionError,
    SizeLimitExceeded,
};

#[derive(Debug)]
/// The parameters carried by a single request.
///
/// Requests whose method doesn't carry a body (`GET`, `HEAD` and `DELETE`) carry
/// their parameters in the URL query. Every other request carries them in its JSON body.
pub enum Parameters {
    Query(QueryMap),
    Json(JsonDocument),
}

impl Parameters {
    /// Pick the data source for the request and prepare it for decoding.
    ///
    /// The extraction fails if:
    ///
    /// - the request should carry a JSON body, but the `Content-Type` header is missing
    ///   or is not set to `application/json`
    /// - the body is larger than the limit set in `config`
    /// - the body is not a well-formed JSON document
    pub fn extract(
        head: &RequestHead,
        body: &[u8],
        config: &ParamsConfig,
    ) -> Result<Self, ExtractParamsError> {
        if reads_query(&head.method) {
            return Ok(Parameters::Query(QueryMap::from_query_str(head.query())));
        }

        check_json_content_type(&head.headers, config.accept_json_suffix)?;
        if let Some(max_size) = config.body_size_limit.max_size() {
            if body.len() as u64 > max_size.as_u64() {
                return Err(SizeLimitExceeded {
                    max_size,
                    actual: body.len(),
                }
                .into());
            }
        }
        let document = JsonDocument::new(bytes::Bytes::copy_from_slice(body));
        document.parse()?;
        Ok(Parameters::Json(document))
    }

    /// A reader positioned at the root of the parameters.
    pub fn reader(&self) -> Box<dyn PathReader + '_> {
        match self {
            Parameters::Query(query) => Box::new(query.reader()),
            Parameters::Json(document) => Box::new(document.reader()),
        }
    }

    /// Decode the parameters into the shape described by `descriptor`.
    ///
    /// If nothing is found, the zero value of `descriptor` is returned.
    pub fn decode(&self, descriptor: &TypeDescriptor) -> Result<DecodedValue, DecodeError> {
        let reader = self.reader();
        Ok(decode::decode(reader.as_ref(), descriptor)?.unwrap_or_else(|| descriptor.zero_value()))
    }
}

fn reads_query(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::DELETE
}

/// Check that the `Content-Type` header is set to `application/json`, or to another
/// `application/*+json` MIME type if `accept_suffix` is `true`.
///
/// Return an error otherwise.
fn check_json_content_type(
    headers: &HeaderMap,
    accept_suffix: bool,
) -> Result<(), ExtractParamsError> {
    let Some(content_type) = headers.get(http::header::CONTENT_TYPE) else {
        return Err(MissingJsonContentType.into());
    };
    let Ok(content_type) = content_type.to_str() else {
        return Err(MissingJsonContentType.into());
    };

    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return Err(JsonContentTypeMismatch {
            actual: content_type.to_string(),
        }
        .into());
    };

    let is_json_content_type = mime.type_() == mime::APPLICATION
        && (mime.subtype() == mime::JSON
            || (accept_suffix && mime.suffix().is_some_and(|name| name == mime::JSON)));
    if !is_json_content_type {
        return Err(JsonContentTypeMismatch {
            actual: content_type.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Bind the parameters of incoming requests to values of type `T`.
///
/// The descriptor of `T` is built once, when the binder is created,
/// and reused for every request.
///
/// ```rust
/// use restbind::{Describe, request::{Binder, RequestHead}};
///
/// #[derive(Describe, serde::Deserialize)]
/// pub struct NewHome {
///     #[rest = "required"]
///     address: String,
///     price: u64,
/// }
///
/// let request = http::Request::post("/homes")
///     .header("content-type", "application/json")
///     .body(())
///     .unwrap();
/// let head = RequestHead::from(request.into_parts().0);
/// let body = br#"{ "address": "1 Main St", "price": 250000 }"#;
///
/// let home = Binder::<NewHome>::new().bind(&head, body).unwrap();
/// assert_eq!(home.address, "1 Main St");
/// assert_eq!(home.price, 250_000);
/// ```
pub struct Binder<T> {
    descriptor: TypeDescriptor,
    config: ParamsConfig,
    _target: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for Binder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("descriptor", &self.descriptor)
            .field("config", &self.config)
            .finish()
    }
}

impl<T> Default for Binder<T>
where
    T: Describe + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Binder<T>
where
    T: Describe + DeserializeOwned,
{
    /// Create a binder with the default [`ParamsConfig`].
    pub fn new() -> Self {
        Self::with_config(ParamsConfig::default())
    }

    pub fn with_config(config: ParamsConfig) -> Self {
        Self {
            descriptor: T::descriptor(),
            config,
            _target: PhantomData,
        }
    }

    /// The descriptor used to decode the parameters.
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Extract the parameters of a request, decode them and convert them into a `T`.
    pub fn bind(&self, head: &RequestHead, body: &[u8]) -> Result<T, ExtractParamsError> {
        self._bind(head, body).inspect_err(|e| {
            if e.status_code().is_server_error() {
                log_error!(e, "Failed to bind the request parameters");
            } else {
                log_error!(
                    e,
                    level: tracing::Level::DEBUG,
                    "The request parameters are invalid"
                );
            }
        })
    }

    fn _bind(&self, head: &RequestHead, body: &[u8]) -> Result<T, ExtractParamsError> {
        let parameters = Parameters::extract(head, body, &self.config)?;
        let decoded = parameters.decode(&self.descriptor)?;
        value::from_value(decoded).map_err(|source| ParamsConversionError { source }.into())
    }
}

//! Errors that can happen when binding request parameters.
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use ubyte::ByteUnit;

use crate::decode::DecodeError;
use crate::value::ConversionError;

/// The error returned by [`Binder::bind`] and [`Parameters::extract`] when the extraction fails.
///
/// See the documentation of each error variant for more details.
///
/// [`ExtractParamsError::into_response`] converts it into an HTTP response.
///
/// [`Binder::bind`]: super::Binder::bind
/// [`Parameters::extract`]: super::Parameters::extract
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractParamsError {
    #[error(transparent)]
    /// See [`MissingJsonContentType`] for details.
    MissingContentType(#[from] MissingJsonContentType),
    #[error(transparent)]
    /// See [`JsonContentTypeMismatch`] for details.
    UnsupportedContentType(#[from] JsonContentTypeMismatch),
    #[error(transparent)]
    /// See [`SizeLimitExceeded`] for details.
    SizeLimitExceeded(#[from] SizeLimitExceeded),
    #[error(transparent)]
    /// See [`DecodeError`] for details.
    Decode(#[from] DecodeError),
    #[error(transparent)]
    /// See [`ParamsConversionError`] for details.
    Conversion(#[from] ParamsConversionError),
}

impl ExtractParamsError {
    /// Convert an [`ExtractParamsError`] into an HTTP response.
    ///
    /// It returns a `500 Internal Server Error` to the caller if the failure was caused by a
    /// programmer error (e.g. the target type contains a field that can't be decoded).
    /// Content type and size problems get `415 Unsupported Media Type` and
    /// `413 Payload Too Large` respectively.
    /// It returns a `400 Bad Request` for all other cases.
    pub fn into_response(&self) -> http::Response<String> {
        let status = self.status_code();
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Something went wrong when trying to process the request".to_owned()
        } else {
            format!("Invalid request parameters.\n{self}")
        };
        let mut response = http::Response::new(body);
        *response.status_mut() = status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }

    /// The status code that [`into_response`](Self::into_response) uses for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractParamsError::MissingContentType(_)
            | ExtractParamsError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ExtractParamsError::SizeLimitExceeded(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractParamsError::Decode(e) if e.is_programmer_error() => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ExtractParamsError::Decode(_) | ExtractParamsError::Conversion(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error(
    "The `Content-Type` header is missing. This endpoint expects requests with a `Content-Type` header set to `application/json`"
)]
#[non_exhaustive]
/// The `Content-Type` header is missing, while we expected it to be set to `application/json`.
pub struct MissingJsonContentType;

#[derive(Debug, thiserror::Error)]
#[error(
    "The `Content-Type` header was set to `{actual}`. This endpoint expects requests with a `Content-Type` header set to `application/json`"
)]
#[non_exhaustive]
/// The `Content-Type` header is not set to `application/json`.
pub struct JsonContentTypeMismatch {
    /// The actual value of the `Content-Type` header for this request.
    pub actual: String,
}

#[derive(Debug, thiserror::Error)]
#[error("The request body is larger than the maximum size limit enforced by this server.")]
#[non_exhaustive]
/// The request body is larger than the maximum size limit enforced by this server.
pub struct SizeLimitExceeded {
    /// The maximum size limit enforced by this server.
    pub max_size: ByteUnit,
    /// The size of the body that breached the limit, in bytes.
    pub actual: usize,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to convert the request parameters into the target type.\n{source}")]
#[non_exhaustive]
/// The decoded parameters don't fit the Rust type they are being converted into.
pub struct ParamsConversionError {
    #[source]
    pub(crate) source: serde_path_to_error::Error<ConversionError>,
}

impl ParamsConversionError {
    /// The path of the value that couldn't be converted.
    pub fn path(&self) -> &serde_path_to_error::Path {
        self.source.path()
    }
}

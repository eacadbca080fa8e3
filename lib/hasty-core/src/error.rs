//! Error types for hasty.
//!
//! Every call fails with exactly one [`Error`], tagged with the pipeline
//! stage that failed: encoding the request, sending it, or decoding the
//! response. [`Error::Http`] is only produced by an opt-in [`ErrorHandler`].

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::Response;

// ============================================================================
// Error Handler Trait
// ============================================================================

/// Classifies non-2xx responses into application errors.
///
/// The client consults the handler only when the response status is not
/// 2xx, before any decoding happens. Returning `None` lets the call proceed
/// and hands the status code back to the caller.
///
/// Any `Fn(&Response) -> Option<Error>` closure is a handler.
///
/// # Example
///
/// ```
/// use hasty_core::{Error, ErrorHandler, Response};
///
/// struct NotFoundIsError;
///
/// impl ErrorHandler for NotFoundIsError {
///     fn handle(&self, response: &Response) -> Option<Error> {
///         (response.status() == 404).then(|| Error::http(404, "missing"))
///     }
/// }
/// ```
pub trait ErrorHandler: Send + Sync + 'static {
    /// Returns `Some(error)` to fail the call with that error.
    fn handle(&self, response: &Response) -> Option<Error>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&Response) -> Option<Error> + Send + Sync + 'static,
{
    fn handle(&self, response: &Response) -> Option<Error> {
        self(response)
    }
}

/// Error handler that never classifies a response as an error.
///
/// This is the default: callers inspect the returned status code themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, _response: &Response) -> Option<Error> {
        None
    }
}

/// Error handler that turns every non-2xx response into [`Error::Http`].
///
/// The response body is attached so callers can decode API error payloads
/// with [`Error::decode_body`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusErrorHandler;

impl ErrorHandler for StatusErrorHandler {
    fn handle(&self, response: &Response) -> Option<Error> {
        if response.is_success() {
            return None;
        }
        let reason = http::StatusCode::from_u16(response.status())
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("unknown status");
        Some(Error::http_with_body(
            response.status(),
            reason,
            response.body().clone(),
        ))
    }
}

// ============================================================================
// Stage Errors
// ============================================================================

/// The request input could not be serialized.
#[derive(Debug, Display, Error, From)]
pub enum EncodeError {
    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    Json(serde_json::Error),

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    Form(serde_urlencoded::ser::Error),
}

/// The transport failed to complete the exchange.
#[derive(Debug, Display, Error, From)]
pub enum SendError {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// A read or write timeout elapsed.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// URI parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),
}

/// The response body could not be parsed into the requested shape.
#[derive(Debug, Display, Error, From)]
pub enum DecodeError {
    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    Json {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// The body does not fit the output target.
    #[display("text deserialization error: {_0}")]
    #[from]
    Text(serde::de::value::Error),

    /// The body is not valid UTF-8.
    #[display("invalid UTF-8 body: {_0}")]
    #[from]
    Utf8(std::string::FromUtf8Error),
}

impl DecodeError {
    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Json {
            path: path.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for hasty calls.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Encoding the input failed; nothing was sent.
    #[display("encode request: {_0}")]
    #[from]
    Encode(EncodeError),

    /// The transport failed.
    #[display("send request: {_0}")]
    #[from]
    Send(SendError),

    /// Decoding the response body failed.
    #[display("decode response: {_0}")]
    #[from]
    Decode(DecodeError),

    /// Response classified as an error by an [`ErrorHandler`].
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<Bytes>,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Status code reported alongside this error.
    ///
    /// Encode, send and decode failures report `0`, even when a response was
    /// received before decoding failed. Only [`Error::Http`] carries the
    /// real status.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Http { status, .. } => *status,
            Self::Encode(_) | Self::Send(_) | Self::Decode(_) => 0,
        }
    }

    /// Returns `true` if the input could not be encoded.
    #[must_use]
    pub const fn is_encode(&self) -> bool {
        matches!(self, Self::Encode(_))
    }

    /// Returns `true` if the transport failed.
    #[must_use]
    pub const fn is_send(&self) -> bool {
        matches!(self, Self::Send(_))
    }

    /// Returns `true` if the response could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns `true` if a transport timeout elapsed.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Send(SendError::Timeout))
    }

    /// Returns `true` if the transport could not connect.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Send(SendError::Connection(_)))
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `None` if there is no body or this is not an HTTP error.
    pub fn decode_body<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<std::result::Result<T, DecodeError>> {
        self.body().map(|body| crate::from_json(body))
    }
}

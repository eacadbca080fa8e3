//! Request encoders and response decoders.
//!
//! An encoder serializes a call's input into the request body and sets the
//! matching `Content-Type`. A decoder parses the response body into the
//! caller's output target. The client picks one of each at construction
//! time; [`JsonEncoder`] and [`JsonDecoder`] are the defaults.

use serde::Serialize;
use serde::de::value::StringDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};

use crate::{DecodeError, EncodeError, Request, Response};

/// Content type set by the provided encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Capability Traits
// ============================================================================

/// Writes a call's input into the request body.
///
/// Implementations must set a `Content-Type` header and a body. On error
/// the request is discarded and never sent.
pub trait RequestEncoder: Send + Sync + 'static {
    /// Serialize `input` into `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` cannot be represented in this encoding.
    fn encode<T>(&self, request: &mut Request, input: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized;
}

/// Reads the response body into a call's output target.
///
/// `out` is replaced on success and left untouched on error.
pub trait ResponseDecoder: Send + Sync + 'static {
    /// Parse the body of `response` into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is malformed or does not match `T`.
    fn decode<T>(&self, response: &Response, out: &mut T) -> Result<(), DecodeError>
    where
        T: DeserializeOwned;
}

// ============================================================================
// Provided Codecs
// ============================================================================

/// Encodes the input as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl RequestEncoder for JsonEncoder {
    fn encode<T>(&self, request: &mut Request, input: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(input)?;
        request.set_content_type(ContentType::Json.as_str());
        request.set_body(body);
        Ok(())
    }
}

/// Encodes a flat string-keyed map (or flat struct) as `key=value&...`.
///
/// Nested values cannot be form-encoded and fail with [`EncodeError::Form`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormEncoder;

impl RequestEncoder for FormEncoder {
    fn encode<T>(&self, request: &mut Request, input: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_urlencoded::to_string(input)?;
        request.set_content_type(ContentType::FormUrlEncoded.as_str());
        request.set_body(body);
        Ok(())
    }
}

/// Decodes a JSON body, reporting the path of the field that failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    fn decode<T>(&self, response: &Response, out: &mut T) -> Result<(), DecodeError>
    where
        T: DeserializeOwned,
    {
        *out = from_json(response.body())?;
        Ok(())
    }
}

/// Copies the raw body into a string target.
///
/// The body must be valid UTF-8, and the target must deserialize from a
/// string (`String`, `Box<str>`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDecoder;

impl ResponseDecoder for TextDecoder {
    fn decode<T>(&self, response: &Response, out: &mut T) -> Result<(), DecodeError>
    where
        T: DeserializeOwned,
    {
        let text = String::from_utf8(response.body().to_vec())?;
        let deserializer: StringDeserializer<serde::de::value::Error> = text.into_deserializer();
        *out = T::deserialize(deserializer)?;
        Ok(())
    }
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
///
/// # Example
///
/// ```
/// use hasty_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let user: User = from_json(br#"{"name":"Alice"}"#).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| DecodeError::json(e.path().to_string(), e.inner().to_string()))
}

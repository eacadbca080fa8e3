//! Core types and traits for the hasty HTTP client.
//!
//! This crate provides the transport-agnostic pieces of the
//! encode/send/decode pipeline:
//! - [`Method`] - HTTP method enum
//! - [`Request`], [`Response`] and [`Header`] - per-call HTTP values
//! - [`RequestEncoder`] and [`ResponseDecoder`] - pluggable body codecs
//! - [`JsonEncoder`], [`FormEncoder`], [`JsonDecoder`], [`TextDecoder`] - provided codecs
//! - [`Transport`] - the network seam
//! - [`ErrorHandler`] - opt-in classification of non-2xx responses
//! - [`Error`] and [`Result`] - Error handling

mod codec;
mod error;
mod method;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use codec::{
    ContentType, FormEncoder, JsonDecoder, JsonEncoder, RequestEncoder, ResponseDecoder,
    TextDecoder, from_json,
};
pub use error::{
    DecodeError, DefaultErrorHandler, EncodeError, Error, ErrorHandler, Result, SendError,
    StatusErrorHandler,
};
pub use method::Method;
pub use request::{Header, Request};
pub use response::Response;
pub use transport::Transport;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};

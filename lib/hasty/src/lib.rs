//! Verb-oriented HTTP client for Rust.
//!
//! `hasty` wraps hyper-util's pooled client with one async method per HTTP
//! verb, pluggable request encoders and response decoders, and per-call
//! headers. Every call goes through the same pipeline: build the request,
//! apply headers, encode the input, send, decode the output.
//!
//! # Example
//!
//! ```ignore
//! use hasty::prelude::*;
//!
//! #[derive(Debug, Default, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = Client::new();
//!
//! let mut user = User::default();
//! let status = client
//!     .get("https://api.example.com/users/42", Some(&mut user), None)
//!     .await?;
//!
//! // Form posts swap in the URL encoder for one call.
//! let form = HashMap::from([("foo".to_string(), "bar".to_string())]);
//! let status = client
//!     .post_form::<()>("https://api.example.com/login", &form, None, None)
//!     .await?;
//! ```
//!
//! Calls return the status code; non-2xx responses are only errors when a
//! classifying [`ErrorHandler`] such as [`StatusErrorHandler`] is configured.

mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
mod transport;

pub use client::Client;
pub use config::{
    Config, ConfigBuilder, DEFAULT_USER_AGENT, TransportConfig, TransportConfigBuilder,
};
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use hasty_core::{
    ContentType, DecodeError, DefaultErrorHandler, EncodeError, Error, ErrorHandler, FormEncoder,
    Header, JsonDecoder, JsonEncoder, Method, Request, RequestEncoder, Response, ResponseDecoder,
    Result, SendError, StatusErrorHandler, TextDecoder, Transport, from_json,
};

// Re-export http types for status codes and headers
pub use hasty_core::{StatusCode, header};

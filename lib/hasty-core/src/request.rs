//! Outgoing HTTP request.
//!
//! A [`Request`] is built by the client for a single call, handed to the
//! encoder for body serialization, then consumed by the transport.
//!
//! # Example
//!
//! ```
//! use hasty_core::{Method, Request};
//!
//! let mut request = Request::new(Method::Get, "https://api.example.com/users");
//! request.set_header("Accept", "application/json");
//!
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::Method;

/// Per-call header overrides, applied verbatim to the request.
pub type Header = HashMap<String, String>;

/// An HTTP request with method, URI, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: String,
    headers: Header,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Header::new(),
            body: None,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URI, as given by the caller.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &Header {
        &self.headers
    }

    /// Single header value by name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets a header, replacing any value stored under the same name in any case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Applies every entry of `headers`, overriding existing values.
    pub fn apply_headers(&mut self, headers: &Header) {
        for (name, value) in headers {
            self.set_header(name.as_str(), value.as_str());
        }
    }

    /// Sets the `Content-Type` header.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.set_header(http::header::CONTENT_TYPE.as_str(), content_type);
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Sets the request body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }

    /// Consume into (method, uri, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, String, Header, Option<Bytes>) {
        (self.method, self.uri, self.headers, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_is_empty() {
        let request = Request::new(Method::Get, "https://api.example.com/users");

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.uri(), "https://api.example.com/users");
        assert!(request.headers().is_empty());
        assert!(request.body().is_none());
    }

    #[test]
    fn set_header_replaces_any_case() {
        let mut request = Request::new(Method::Post, "http://example.com/");
        request.set_header("content-type", "text/plain");
        request.set_content_type("application/json");

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn apply_headers_copies_all_entries() {
        let mut headers = Header::new();
        headers.insert("X-Request-Id".to_string(), "abc".to_string());
        headers.insert("foo".to_string(), "bar".to_string());

        let mut request = Request::new(Method::Get, "http://example.com/");
        request.set_header("FOO", "old");
        request.apply_headers(&headers);

        assert_eq!(request.header("foo"), Some("bar"));
        assert_eq!(request.header("x-request-id"), Some("abc"));
        assert_eq!(request.headers().len(), 2);
    }

    #[test]
    fn into_parts_returns_body() {
        let mut request = Request::new(Method::Put, "http://example.com/items/1");
        request.set_body(r#"{"id":1}"#);

        let (method, uri, headers, body) = request.into_parts();
        assert_eq!(method, Method::Put);
        assert_eq!(uri, "http://example.com/items/1");
        assert!(headers.is_empty());
        assert_eq!(body, Some(Bytes::from(r#"{"id":1}"#)));
    }
}

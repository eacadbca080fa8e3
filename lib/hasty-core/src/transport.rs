//! Transport trait.
//!
//! A [`Transport`] performs the byte-level HTTP exchange. The client builds
//! and encodes the request, hands it over, and decodes whatever comes back;
//! connection pooling, TLS and timeouts all live behind this trait.

use std::future::Future;

use crate::{Request, Response, SendError};

/// Executes HTTP requests.
///
/// Implementations are shared by every clone of a client and called from
/// many tasks at once, so they must be `Send + Sync` and keep any per-call
/// state inside the returned future.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use hasty_core::{Request, Response, SendError, Transport};
///
/// /// Answers every request with its own body.
/// struct Echo;
///
/// impl Transport for Echo {
///     async fn send(&self, request: Request) -> Result<Response, SendError> {
///         let body = request.body().cloned().unwrap_or_default();
///         Ok(Response::new(200, HashMap::new(), body))
///     }
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Send `request` and wait for the full response.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails for any reason:
    /// - Invalid URI
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, SendError>> + Send;
}


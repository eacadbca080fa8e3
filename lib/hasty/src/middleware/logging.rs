//! Exchange logging for the hyper transport.
//!
//! Each exchange runs inside a `hasty.exchange` span carrying the method,
//! URI, content type and body length of the encoded request. The status and
//! the elapsed time are recorded on the same span when the exchange ends.

use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::field::Empty;
use tracing::{Instrument, Span, debug, info_span, warn};

use crate::{Request, Response, SendError, ServiceFuture};

/// Layer that records every exchange with `tracing`.
///
/// # Example
///
/// ```ignore
/// use hasty::HyperTransport;
/// use hasty::middleware::LoggingLayer;
///
/// let transport = HyperTransport::builder()
///     .layer(LoggingLayer::new().with_headers())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    headers: bool,
}

impl LoggingLayer {
    /// Span and outcome only.
    #[must_use]
    pub const fn new() -> Self {
        Self { headers: false }
    }

    /// Also emit the request headers at debug level.
    ///
    /// Headers may hold credentials; keep this for local debugging.
    #[must_use]
    pub const fn with_headers(mut self) -> Self {
        self.headers = true;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            headers: self.headers,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    headers: bool,
}

fn exchange_span(request: &Request) -> Span {
    info_span!(
        "hasty.exchange",
        method = %request.method(),
        uri = request.uri(),
        content_type = request.header(http::header::CONTENT_TYPE.as_str()),
        body_len = request.body().map_or(0, bytes::Bytes::len),
        status = Empty,
        elapsed_ms = Empty,
    )
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = SendError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = SendError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), SendError>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let span = exchange_span(&request);
        if self.headers {
            span.in_scope(|| debug!(headers = ?request.headers(), "request headers"));
        }

        // `self.inner` is the instance `poll_ready` prepared; it serves this call.
        let fresh = self.inner.clone();
        let mut ready = std::mem::replace(&mut self.inner, fresh);

        let recorder = span.clone();
        let started = Instant::now();
        Box::pin(
            async move {
                let result = ready.call(request).await;
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                recorder.record("elapsed_ms", elapsed_ms);

                match &result {
                    Ok(response) => {
                        recorder.record("status", response.status());
                        if response.is_server_error() {
                            warn!("server error");
                        } else {
                            debug!("exchange completed");
                        }
                    }
                    Err(err) => warn!(error = %err, "exchange failed"),
                }
                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;

    use hasty_core::Method;
    use tower::ServiceExt;
    use tower::limit::ConcurrencyLimitLayer;

    use super::*;

    fn ok_service() -> impl Service<
        Request,
        Response = Response,
        Error = SendError,
        Future = impl Future<Output = Result<Response, SendError>> + Send,
    > + Clone
    + Send
    + 'static {
        tower::service_fn(|request: Request| async move {
            let status = if request.body().is_some() { 201 } else { 200 };
            Ok::<_, SendError>(Response::new(status, HashMap::new(), ""))
        })
    }

    #[test]
    fn headers_are_opt_in() {
        assert!(!LoggingLayer::new().headers);
        assert!(LoggingLayer::new().with_headers().headers);
    }

    #[tokio::test]
    async fn passes_responses_through() {
        let mut request = Request::new(Method::Post, "http://example.com/items");
        request.set_content_type("application/json");
        request.set_body("{}");

        let response = LoggingLayer::new()
            .with_headers()
            .layer(ok_service())
            .oneshot(request)
            .await
            .expect("response");

        assert_eq!(response.status(), 201);
    }

    #[tokio::test]
    async fn calls_the_readied_inner_service() {
        let limited = ConcurrencyLimitLayer::new(1).layer(ok_service());
        let mut service = LoggingLayer::new().layer(limited);

        for _ in 0..3 {
            let response = service
                .ready()
                .await
                .expect("ready")
                .call(Request::new(Method::Get, "http://example.com/"))
                .await
                .expect("response");
            assert_eq!(response.status(), 200);
        }
    }
}

//! HTTP transport implementation using hyper-util.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::sync::oneshot;
use tower::util::BoxCloneService;
use tower::{Layer, ServiceExt};
use tower_service::Service;

use crate::{
    Request, Response, SendError, Transport,
    config::{TransportConfig, TransportConfigBuilder},
    connector::https_connector,
    middleware::LoggingLayer,
};

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased service for middleware composition.
pub type BoxedService = BoxCloneService<Request, Response, SendError>;

/// Future returned by transport services.
pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response, SendError>> + Send + 'static>>;

/// Makes a `BoxedService` shareable between tasks.
///
/// The lock only guards cloning the service; it is released before the
/// clone is driven to readiness and called.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> ServiceFuture {
        let service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(service.oneshot(request))
    }
}

// ============================================================================
// Raw Transport
// ============================================================================

/// Request body handed to hyper. Dropping it marks the request as written.
type RequestBody = BoxBody<Bytes, Infallible>;

/// Pooled hyper client without middleware.
#[derive(Clone)]
struct RawTransport {
    inner: Client<HttpsConnector<HttpConnector>, RequestBody>,
    user_agent: Option<Arc<str>>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl RawTransport {
    fn new(config: &TransportConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self {
            inner,
            user_agent: config.user_agent().map(Arc::from),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        }
    }

    /// Build a hyper request, adding the default User-Agent when missing.
    fn build_hyper_request(
        &self,
        request: Request,
    ) -> Result<http::Request<Full<Bytes>>, SendError> {
        let (method, uri, headers, body) = request.into_parts();
        let url = url::Url::parse(&uri)?;

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(user_agent) = &self.user_agent {
            let has_user_agent = headers
                .keys()
                .any(|name| name.eq_ignore_ascii_case(http::header::USER_AGENT.as_str()));
            if !has_user_agent {
                builder = builder.header(http::header::USER_AGENT, &**user_agent);
            }
        }

        let body = body.map_or_else(Full::default, Full::new);
        builder
            .body(body)
            .map_err(|e| SendError::InvalidRequest(e.to_string()))
    }

    /// Extract response headers as a `HashMap`.
    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Run one exchange under the write and read deadlines.
    ///
    /// The write phase lasts until hyper releases the request body, which
    /// happens once the request is on the wire. The read phase starts there
    /// and covers the response head and the whole body.
    async fn execute(&self, request: Request) -> Result<Response, SendError> {
        let (written_tx, written_rx) = oneshot::channel::<()>();
        let hyper_request = self
            .build_hyper_request(request)?
            .map(|body| release_signal(body, written_tx));

        let exchange = async {
            let response = self
                .inner
                .request(hyper_request)
                .await
                .map_err(Self::map_hyper_error)?;

            let status = response.status().as_u16();
            let response_headers = Self::extract_headers(response.headers());
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| SendError::Connection(e.to_string()))?
                .to_bytes();

            Ok::<_, SendError>(Response::new(status, response_headers, body))
        };

        tokio::select! {
            result = exchange => result,
            elapsed = deadlines(self.write_timeout, self.read_timeout, written_rx) => Err(elapsed),
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> SendError {
        let msg = err.to_string();

        if err.is_connect() {
            return SendError::Connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return SendError::Tls(msg);
        }

        SendError::Connection(msg)
    }
}

/// Wrap `body` so that `written` resolves once hyper drops it.
fn release_signal(body: Full<Bytes>, written: oneshot::Sender<()>) -> RequestBody {
    body.map_frame(move |frame| {
        let _held = &written;
        frame
    })
    .boxed()
}

/// Resolves with [`SendError::Timeout`] once the write or read phase
/// outlives its limit, and never otherwise.
async fn deadlines(
    write: Option<Duration>,
    read: Option<Duration>,
    written: oneshot::Receiver<()>,
) -> SendError {
    // The sender is never used, so completion is always a `RecvError`.
    let written_in_time = match write {
        Some(limit) => tokio::time::timeout(limit, written).await.is_ok(),
        None => {
            let _ = written.await;
            true
        }
    };
    if !written_in_time {
        return SendError::Timeout;
    }

    match read {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending::<()>().await,
    }
    SendError::Timeout
}

impl Service<Request> for RawTransport {
    type Response = Response;
    type Error = SendError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), SendError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

// ============================================================================
// Public Transport
// ============================================================================

/// HTTP transport using hyper-util with connection pooling, TLS, and
/// optional tower middleware.
///
/// # Example
///
/// ```ignore
/// use hasty::HyperTransport;
/// use std::time::Duration;
///
/// let transport = HyperTransport::builder()
///     .read_timeout(Duration::from_secs(10))
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    service: SyncService,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a new transport with custom configuration (no middleware).
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let raw = RawTransport::new(&config);
        Self {
            service: SyncService::new(BoxCloneService::new(raw)),
            config,
        }
    }

    /// Create a new transport builder.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn send(&self, request: Request) -> Result<Response, SendError> {
        self.service.call(request).await
    }
}

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```ignore
/// use hasty::HyperTransport;
/// use hasty::middleware::LoggingLayer;
///
/// let transport = HyperTransport::builder()
///     .name("inventory")
///     .layer(LoggingLayer::new().with_headers())
///     .build();
/// ```
#[derive(Default)]
pub struct HyperTransportBuilder {
    config: TransportConfigBuilder,
    layers: Vec<Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>>,
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperTransportBuilder {
    // ========================================================================
    // Core Configuration
    // ========================================================================

    /// Set the client name, sent as the User-Agent.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.name(name);
        self
    }

    /// Send no User-Agent when the transport has no name.
    #[must_use]
    pub fn no_default_user_agent(mut self, suppress: bool) -> Self {
        self.config = self.config.no_default_user_agent(suppress);
        self
    }

    /// Set the response read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.read_timeout(timeout);
        self
    }

    /// Set the request write timeout.
    #[must_use]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.write_timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    // ========================================================================
    // Middleware
    // ========================================================================

    /// Add a Tower layer around the transport.
    ///
    /// Layers are applied in order: first added = innermost.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service:
            Service<Request, Response = Response, Error = SendError> + Clone + Send + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Record each exchange in a `hasty.exchange` span.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Like [`with_logging`](Self::with_logging), also logging request
    /// headers at debug level.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::new().with_headers())
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the transport with all configured middleware.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        let config = self.config.build();
        let mut service: BoxedService = BoxCloneService::new(RawTransport::new(&config));

        for layer_fn in self.layers {
            service = layer_fn(service);
        }

        HyperTransport {
            service: SyncService::new(service),
            config,
        }
    }
}

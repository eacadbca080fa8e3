//! Client configuration types.
//!
//! [`TransportConfig`] tunes the hyper transport; [`Config`] adds the codec
//! and error-handler choices on top. Both are built with defaults for every
//! field left unset and are immutable once a client exists.

use std::time::Duration;

use hasty_core::{
    DefaultErrorHandler, ErrorHandler, JsonDecoder, JsonEncoder, RequestEncoder, ResponseDecoder,
};

/// User-Agent sent when the client has no name.
pub const DEFAULT_USER_AGENT: &str = concat!("hasty/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Transport Configuration
// ============================================================================

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Client name, sent as the User-Agent.
    pub name: String,
    /// Without a `name`, send no User-Agent instead of [`DEFAULT_USER_AGENT`].
    pub no_default_user_agent: bool,
    /// Bound on reading the response, head and body, once the request is
    /// written. `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// Bound on writing the request, including waiting for a pooled
    /// connection. `None` waits forever.
    pub write_timeout: Option<Duration>,
    /// Bound on establishing a TCP connection. `None` waits forever.
    pub connect_timeout: Option<Duration>,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            no_default_user_agent: false,
            read_timeout: None,
            write_timeout: None,
            connect_timeout: None,
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }

    /// User-Agent added to outgoing requests, if any.
    ///
    /// A non-empty client name always wins. Otherwise this is
    /// [`DEFAULT_USER_AGENT`], unless default user agents are turned off.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        if !self.name.is_empty() {
            Some(&self.name)
        } else if self.no_default_user_agent {
            None
        } else {
            Some(DEFAULT_USER_AGENT)
        }
    }
}

/// Builder for [`TransportConfig`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfigBuilder {
    name: Option<String>,
    no_default_user_agent: Option<bool>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl TransportConfigBuilder {
    /// Set the client name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Send no User-Agent when the client has no name.
    #[must_use]
    pub const fn no_default_user_agent(mut self, suppress: bool) -> Self {
        self.no_default_user_agent = Some(suppress);
        self
    }

    /// Set the response read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the request write timeout.
    #[must_use]
    pub const fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> TransportConfig {
        let defaults = TransportConfig::default();
        TransportConfig {
            name: self.name.unwrap_or(defaults.name),
            no_default_user_agent: self
                .no_default_user_agent
                .unwrap_or(defaults.no_default_user_agent),
            read_timeout: self.read_timeout.or(defaults.read_timeout),
            write_timeout: self.write_timeout.or(defaults.write_timeout),
            connect_timeout: self.connect_timeout.or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
        }
    }
}

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for a [`Client`](crate::Client).
///
/// The codec and error-handler choices are type parameters, so a client
/// built from `Config<FormEncoder, TextDecoder>` encodes forms and decodes
/// text without any runtime dispatch.
///
/// # Example
///
/// ```ignore
/// use hasty::{Config, FormEncoder, TextDecoder};
/// use std::time::Duration;
///
/// let config = Config::builder()
///     .name("billing-sync")
///     .read_timeout(Duration::from_secs(5))
///     .request_encoder(FormEncoder)
///     .response_decoder(TextDecoder)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config<E = JsonEncoder, D = JsonDecoder, H = DefaultErrorHandler> {
    /// Settings for the hyper transport.
    pub transport: TransportConfig,
    /// Encoder applied to every call input.
    pub request_encoder: E,
    /// Decoder applied to every call output.
    pub response_decoder: D,
    /// Classifier for non-2xx responses.
    pub error_handler: H,
}

impl Config {
    /// The default configuration: JSON codecs, no status classification.
    ///
    /// Unlike `Config::default()`, this names its type, so it can be passed
    /// straight to [`Client::with_transport`](crate::Client::with_transport).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new configuration builder with the JSON codecs.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder<E = JsonEncoder, D = JsonDecoder, H = DefaultErrorHandler> {
    transport: TransportConfigBuilder,
    request_encoder: E,
    response_decoder: D,
    error_handler: H,
}

impl<E, D, H> ConfigBuilder<E, D, H> {
    /// Set the client name, sent as the User-Agent.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.transport = self.transport.name(name);
        self
    }

    /// Send no User-Agent when the client has no name.
    #[must_use]
    pub fn no_default_user_agent(mut self, suppress: bool) -> Self {
        self.transport = self.transport.no_default_user_agent(suppress);
        self
    }

    /// Set the response read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.read_timeout(timeout);
        self
    }

    /// Set the request write timeout.
    #[must_use]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.write_timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.transport = self.transport.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.pool_idle_timeout(timeout);
        self
    }

    /// Use `encoder` for call inputs.
    #[must_use]
    pub fn request_encoder<E2: RequestEncoder>(self, encoder: E2) -> ConfigBuilder<E2, D, H> {
        ConfigBuilder {
            transport: self.transport,
            request_encoder: encoder,
            response_decoder: self.response_decoder,
            error_handler: self.error_handler,
        }
    }

    /// Use `decoder` for call outputs.
    #[must_use]
    pub fn response_decoder<D2: ResponseDecoder>(self, decoder: D2) -> ConfigBuilder<E, D2, H> {
        ConfigBuilder {
            transport: self.transport,
            request_encoder: self.request_encoder,
            response_decoder: decoder,
            error_handler: self.error_handler,
        }
    }

    /// Use `handler` to classify non-2xx responses.
    #[must_use]
    pub fn error_handler<H2: ErrorHandler>(self, handler: H2) -> ConfigBuilder<E, D, H2> {
        ConfigBuilder {
            transport: self.transport,
            request_encoder: self.request_encoder,
            response_decoder: self.response_decoder,
            error_handler: handler,
        }
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> Config<E, D, H> {
        Config {
            transport: self.transport.build(),
            request_encoder: self.request_encoder,
            response_decoder: self.response_decoder,
            error_handler: self.error_handler,
        }
    }
}

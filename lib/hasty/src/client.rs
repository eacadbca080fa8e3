//! Verb-oriented client over a [`Transport`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    Config, DefaultErrorHandler, ErrorHandler, FormEncoder, Header, HyperTransport, JsonDecoder,
    JsonEncoder, Method, Request, RequestEncoder, ResponseDecoder, Result, Transport,
};

/// HTTP client with one method per verb and pluggable body codecs.
///
/// Every call returns the response status code, or an error tagged with
/// the stage that failed. Non-2xx statuses are not errors unless the
/// configured [`ErrorHandler`] says so.
///
/// Cloning is cheap: clones share the transport and its connection pool,
/// and a single client can serve many concurrent tasks.
///
/// # Example
///
/// ```ignore
/// use hasty::{Client, Header};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct NewUser { name: String }
///
/// #[derive(Debug, Default, Deserialize)]
/// struct User { id: u64, name: String }
///
/// let client = Client::new();
///
/// let mut user = User::default();
/// let status = client
///     .post(
///         "https://api.example.com/users",
///         Some(&NewUser { name: "Alice".into() }),
///         Some(&mut user),
///         None,
///     )
///     .await?;
/// ```
pub struct Client<
    T = HyperTransport,
    E = JsonEncoder,
    D = JsonDecoder,
    H = DefaultErrorHandler,
> {
    transport: Arc<T>,
    encoder: Arc<E>,
    decoder: Arc<D>,
    error_handler: Arc<H>,
}

impl<T, E, D, H> Clone for Client<T, E, D, H> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            encoder: Arc::clone(&self.encoder),
            decoder: Arc::clone(&self.decoder),
            error_handler: Arc::clone(&self.error_handler),
        }
    }
}

impl<T: std::fmt::Debug, E, D, H> std::fmt::Debug for Client<T, E, D, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport)
            .field("encoder", &std::any::type_name::<E>())
            .field("decoder", &std::any::type_name::<D>())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with the default configuration: hyper transport,
    /// JSON in both directions, no status classification.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, D, H> Client<HyperTransport, E, D, H>
where
    E: RequestEncoder,
    D: ResponseDecoder,
    H: ErrorHandler,
{
    /// Create a client on a new [`HyperTransport`] built from `config`.
    #[must_use]
    pub fn with_config(config: Config<E, D, H>) -> Self {
        let transport = HyperTransport::with_config(config.transport.clone());
        Self::with_transport(transport, config)
    }
}

impl<T, E, D, H> Client<T, E, D, H>
where
    T: Transport,
    E: RequestEncoder,
    D: ResponseDecoder,
    H: ErrorHandler,
{
    /// Create a client on an existing transport.
    ///
    /// The transport is used as-is; `config.transport` is ignored.
    #[must_use]
    pub fn with_transport(transport: T, config: Config<E, D, H>) -> Self {
        Self {
            transport: Arc::new(transport),
            encoder: Arc::new(config.request_encoder),
            decoder: Arc::new(config.response_decoder),
            error_handler: Arc::new(config.error_handler),
        }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A client sharing this one's transport, decoder and error handler,
    /// encoding inputs with `encoder` instead.
    #[must_use]
    pub fn with_encoder<E2: RequestEncoder>(&self, encoder: E2) -> Client<T, E2, D, H> {
        Client {
            transport: Arc::clone(&self.transport),
            encoder: Arc::new(encoder),
            decoder: Arc::clone(&self.decoder),
            error_handler: Arc::clone(&self.error_handler),
        }
    }

    /// A client sharing this one's transport, encoder and error handler,
    /// decoding outputs with `decoder` instead.
    #[must_use]
    pub fn with_decoder<D2: ResponseDecoder>(&self, decoder: D2) -> Client<T, E, D2, H> {
        Client {
            transport: Arc::clone(&self.transport),
            encoder: Arc::clone(&self.encoder),
            decoder: Arc::new(decoder),
            error_handler: Arc::clone(&self.error_handler),
        }
    }

    /// A client sharing this one's transport and codecs, classifying
    /// non-2xx responses with `handler` instead.
    #[must_use]
    pub fn with_error_handler<H2: ErrorHandler>(&self, handler: H2) -> Client<T, E, D, H2> {
        Client {
            transport: Arc::clone(&self.transport),
            encoder: Arc::clone(&self.encoder),
            decoder: Arc::clone(&self.decoder),
            error_handler: Arc::new(handler),
        }
    }

    // ========================================================================
    // Verbs
    // ========================================================================

    /// Send a GET request, decoding the body into `out` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if sending or decoding fails.
    pub async fn get<O>(
        &self,
        uri: &str,
        out: Option<&mut O>,
        headers: Option<&Header>,
    ) -> Result<u16>
    where
        O: DeserializeOwned,
    {
        self.dispatch::<(), O>(Method::Get, uri, None, out, headers)
            .await
    }

    /// Send a POST request with `input` as the encoded body.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, sending or decoding fails.
    pub async fn post<I, O>(
        &self,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        headers: Option<&Header>,
    ) -> Result<u16>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.dispatch(Method::Post, uri, input, out, headers).await
    }

    /// Send a POST request with `form` as an URL-encoded body.
    ///
    /// The form encoder replaces the configured encoder for this call only;
    /// the transport, decoder and error handler are this client's.
    ///
    /// # Errors
    ///
    /// Returns an error if sending or decoding fails.
    pub async fn post_form<O>(
        &self,
        uri: &str,
        form: &HashMap<String, String>,
        out: Option<&mut O>,
        headers: Option<&Header>,
    ) -> Result<u16>
    where
        O: DeserializeOwned,
    {
        self.with_encoder(FormEncoder)
            .dispatch(Method::Post, uri, Some(form), out, headers)
            .await
    }

    /// Send a PUT request with `input` as the encoded body.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, sending or decoding fails.
    pub async fn put<I, O>(
        &self,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        headers: Option<&Header>,
    ) -> Result<u16>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.dispatch(Method::Put, uri, input, out, headers).await
    }

    /// Send a PATCH request with `input` as the encoded body.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, sending or decoding fails.
    pub async fn patch<I, O>(
        &self,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        headers: Option<&Header>,
    ) -> Result<u16>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.dispatch(Method::Patch, uri, input, out, headers).await
    }

    /// Send a DELETE request, with `input` as the encoded body when given.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, sending or decoding fails.
    pub async fn delete<I, O>(
        &self,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        headers: Option<&Header>,
    ) -> Result<u16>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.dispatch(Method::Delete, uri, input, out, headers).await
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Build, encode, send and decode one request.
    ///
    /// The request is owned by this call and dropped on every return path.
    /// A decode failure discards the received status: callers see `0` via
    /// [`Error::status_code`](crate::Error::status_code).
    async fn dispatch<I, O>(
        &self,
        method: Method,
        uri: &str,
        input: Option<&I>,
        out: Option<&mut O>,
        headers: Option<&Header>,
    ) -> Result<u16>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        debug!(%method, uri, "dispatching request");

        let mut request = Request::new(method, uri);
        if let Some(headers) = headers {
            request.apply_headers(headers);
        }

        if let Some(input) = input {
            self.encoder.encode(&mut request, input)?;
        }

        let response = self.transport.send(request).await?;
        let status = response.status();

        if !response.is_success()
            && let Some(err) = self.error_handler.handle(&response)
        {
            return Err(err);
        }

        if let Some(out) = out {
            self.decoder.decode(&response, out)?;
        }

        debug!(%method, uri, status, "request completed");
        Ok(status)
    }
}

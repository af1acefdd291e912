//! Network transport using hyper-util.

use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::{BodyStream, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};

use crate::{
    Body, Error, Request, Response, Result, Transport, config::TransportConfig,
    connector::https_connector,
};

/// HTTP(S) transport with connection pooling and rustls TLS.
///
/// The response body is handed back as a stream; it is not read until the
/// caller consumes it. The request's [`Context`](crate::Context) bounds the
/// wait for the response head.
///
/// # Example
///
/// ```ignore
/// use courier::{HyperTransport, TransportConfig};
/// use std::time::Duration;
///
/// let transport = HyperTransport::with_config(
///     TransportConfig::builder().timeout(Duration::from_secs(5)).build(),
/// );
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
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

    /// Create a new transport with custom configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Build a hyper request from a courier request.
    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body, _context) = request.into_parts();

        let body = body.map_or_else(Full::default, Full::new);
        let mut hyper_request = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))?;

        *hyper_request.headers_mut() = headers;

        Ok(hyper_request)
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let context = request.context().clone();
        let hyper_request = Self::build_hyper_request(request)?;

        let response = context
            .run(async {
                tokio::time::timeout(self.config.timeout, self.inner.request(hyper_request))
                    .await
                    .map_err(|_| Error::Timeout)?
                    .map_err(Self::map_hyper_error)
            })
            .await?;

        let (parts, body) = response.into_parts();
        let chunks = BodyStream::new(body)
            .map_ok(|frame| frame.into_data().unwrap_or_default())
            .map_err(|e| Error::connection(e.to_string()));

        Ok(Response::new(
            parts.status.as_u16(),
            parts.headers,
            Body::from_stream(chunks),
        ))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        self.execute(request).await
    }
}

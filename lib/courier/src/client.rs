//! The client façade.
//!
//! A [`Client`] owns one composed transport stack, built once at construction
//! and never changed. Each call is independent, so a client can be cloned or
//! shared across tasks freely.

use bytes::Bytes;
use tower::ServiceExt;
use tracing::{debug, warn};

use crate::middleware::{ApiKeyLayer, BasicAuthLayer, LoggingLayer, loggable_url};
use crate::service::{self, BoxedTransport, Middleware};
use crate::{Context, Error, Method, Request, Response, Result, Transport};

/// HTTP client built from a base transport and a list of middlewares.
///
/// # Example
///
/// ```ignore
/// use courier::{Client, Context, HyperTransport};
/// use courier::middleware::{ApiKeyLayer, Middleware};
///
/// let middlewares: Vec<Box<dyn Middleware>> = vec![Box::new(ApiKeyLayer::new("my-key"))];
/// let client = Client::new(HyperTransport::new(), middlewares);
///
/// let body = client.get(&Context::background(), "https://api.example.com").await?;
/// ```
#[derive(Clone)]
pub struct Client {
    transport: BoxedTransport,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client by applying `middlewares` to `base`, in order.
    ///
    /// The last middleware is the outermost and sees requests first.
    pub fn new<T, I>(base: T, middlewares: I) -> Self
    where
        T: Transport + 'static,
        I: IntoIterator<Item = Box<dyn Middleware>>,
    {
        Self {
            transport: service::compose(service::boxed(base), middlewares),
        }
    }

    /// Create a client builder around `base`.
    #[must_use]
    pub fn builder<T>(base: T) -> ClientBuilder
    where
        T: Transport + 'static,
    {
        ClientBuilder {
            base: service::boxed(base),
            middlewares: Vec::new(),
        }
    }

    /// Fetch `url` and return the whole response body.
    ///
    /// The status code is not inspected: the body of a 404 is returned like
    /// the body of a 200. The send and read stages are both abandoned as soon
    /// as `ctx` is cancelled or its deadline passes.
    ///
    /// # Errors
    ///
    /// - [`Error::Construction`] if `url` cannot be parsed
    /// - [`Error::Transport`] if the transport chain fails
    /// - [`Error::Read`] if the body stream fails before its end
    pub async fn get(&self, ctx: &Context, url: &str) -> Result<Bytes> {
        let request = url::Url::parse(url)
            .map_err(Error::from)
            .and_then(|url| Request::builder(Method::GET, url).context(ctx.clone()).build())
            .map_err(Error::construction)?;

        debug!(url = %loggable_url(request.url()), "sending GET request");
        let response = ctx.run(self.dispatch(request)).await.map_err(|err| {
            warn!(error = %err, "GET request failed");
            Error::transport(err)
        })?;

        let status = response.status();
        let body = ctx
            .run(response.into_body().collect())
            .await
            .map_err(|err| {
                warn!(status, error = %err, "failed to read response body");
                Error::read(err)
            })?;

        debug!(status, bytes = body.len(), "response body read");
        Ok(body)
    }

    async fn dispatch(&self, request: Request) -> Result<Response> {
        self.transport.clone().oneshot(request).await
    }
}

impl Transport for Client {
    async fn send(&self, request: Request) -> Result<Response> {
        self.dispatch(request).await
    }
}

/// Builder for [`Client`].
///
/// Middlewares are applied in the order they are added: the last one added
/// is the outermost and processes requests first.
///
/// # Example
///
/// ```ignore
/// use courier::{Client, HyperTransport};
///
/// let client = Client::builder(HyperTransport::new())
///     .with_api_key("my-key")
///     .with_logging()
///     .build();
/// ```
pub struct ClientBuilder {
    base: BoxedTransport,
    middlewares: Vec<Box<dyn Middleware>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("middlewares_count", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Add a middleware.
    #[must_use]
    pub fn layer<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Alias for [`Self::layer`].
    #[must_use]
    pub fn with<M>(self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.layer(middleware)
    }

    /// Add basic authentication.
    #[must_use]
    pub fn with_basic_auth(self, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        self.layer(BasicAuthLayer::new(username, password))
    }

    /// Add API key authentication (`Authorization: Bearer <key>`).
    #[must_use]
    pub fn with_api_key(self, api_key: impl AsRef<str>) -> Self {
        self.layer(ApiKeyLayer::new(api_key))
    }

    /// Add request/response logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add debug-level logging (includes headers, with credentials redacted).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client {
        Client {
            transport: service::compose(self.base, self.middlewares),
        }
    }
}

impl From<BoxedTransport> for Client {
    fn from(transport: BoxedTransport) -> Self {
        Self { transport }
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;

    use super::*;
    use crate::transport_fn;

    #[tokio::test]
    async fn client_is_clone_and_debug() {
        let client = Client::new(
            transport_fn(|_| async { Ok(Response::new(200, HeaderMap::new(), "")) }),
            Vec::new(),
        );
        let cloned = client.clone();
        assert!(format!("{cloned:?}").contains("Client"));
    }

    #[test]
    fn builder_counts_middlewares() {
        let builder = Client::builder(transport_fn(|_| async {
            Ok(Response::new(200, HeaderMap::new(), ""))
        }))
        .with_api_key("key")
        .with_logging();

        assert!(format!("{builder:?}").contains("middlewares_count: 2"));
    }
}

//! API key authentication middleware.
//!
//! This middleware sets an `Authorization: Bearer <key>` header on all
//! outgoing requests.

use std::future::ready;
use std::task::{Context, Poll};

use http::HeaderValue;
use http::header::AUTHORIZATION;
use tower::{Layer, Service};

use super::{authorization, unusable_credentials};
use crate::{Error, Request, Response, Result, ServiceFuture};

/// Layer that sends an API key as a bearer token.
///
/// A key that cannot be carried in a header (for instance one containing a
/// newline) makes every request fail with [`Error::InvalidRequest`] without
/// reaching the inner transport.
///
/// # Example
///
/// ```ignore
/// use courier::middleware::ApiKeyLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(ApiKeyLayer::new("my-secret-key"))
///     .service(transport);
/// ```
#[derive(Debug, Clone)]
pub struct ApiKeyLayer {
    token: Option<HeaderValue>,
}

impl ApiKeyLayer {
    /// Create a new API key layer.
    pub fn new(api_key: impl AsRef<str>) -> Self {
        Self {
            token: authorization(&format!("Bearer {}", api_key.as_ref())),
        }
    }

    /// The `Authorization` value sent with every request.
    #[must_use]
    pub const fn header_value(&self) -> Option<&HeaderValue> {
        self.token.as_ref()
    }
}

impl<S> Layer<S> for ApiKeyLayer {
    type Service = ApiKey<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKey {
            inner,
            token: self.token.clone(),
        }
    }
}

/// Service that sends an API key as a bearer token.
#[derive(Debug, Clone)]
pub struct ApiKey<S> {
    inner: S,
    token: Option<HeaderValue>,
}

impl<S> ApiKey<S> {
    /// Create a new API key service wrapping the given service.
    pub fn new(inner: S, api_key: impl AsRef<str>) -> Self {
        ApiKeyLayer::new(api_key).layer(inner)
    }
}

impl<S> Service<Request> for ApiKey<S>
where
    S: Service<Request, Response = Response, Error = Error>,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let Some(token) = self.token.clone() else {
            return Box::pin(ready(Err::<Response, _>(unusable_credentials("API key"))));
        };

        request.headers_mut().insert(AUTHORIZATION, token);
        Box::pin(self.inner.call(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_header_is_exact() {
        let layer = ApiKeyLayer::new("your-api-key-here");
        let value = layer.header_value().expect("valid key");
        assert_eq!(value.as_bytes(), b"Bearer your-api-key-here");
        assert!(value.is_sensitive());
    }

    #[test]
    fn api_key_with_newline_is_unusable() {
        let layer = ApiKeyLayer::new("abc\r\nX-Injected: 1");
        assert!(layer.header_value().is_none());
    }

    #[test]
    fn api_key_layer_clone() {
        let layer = ApiKeyLayer::new("test-key");
        let cloned = layer.clone();
        assert_eq!(cloned.header_value(), layer.header_value());
    }
}

//! Basic authentication middleware.
//!
//! This middleware sets an `Authorization: Basic <base64(user:pass)>` header
//! on all outgoing requests.

use std::future::ready;
use std::task::{Context, Poll};

use base64::Engine;
use http::HeaderValue;
use http::header::AUTHORIZATION;
use tower::{Layer, Service};

use super::{authorization, unusable_credentials};
use crate::{Error, Request, Response, Result, ServiceFuture};

/// Layer that adds basic authentication to requests.
///
/// # Example
///
/// ```ignore
/// use courier::middleware::BasicAuthLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(BasicAuthLayer::new("username", "password"))
///     .service(transport);
/// ```
#[derive(Debug, Clone)]
pub struct BasicAuthLayer {
    /// `Basic <base64(username:password)>`, or `None` if unusable.
    credentials: Option<HeaderValue>,
}

impl BasicAuthLayer {
    /// Create a new basic auth layer with the given username and password.
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Self {
            credentials: encode(username.as_ref(), password.as_ref()),
        }
    }

    /// The `Authorization` value sent with every request.
    #[must_use]
    pub const fn header_value(&self) -> Option<&HeaderValue> {
        self.credentials.as_ref()
    }
}

fn encode(username: &str, password: &str) -> Option<HeaderValue> {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    authorization(&format!("Basic {token}"))
}

impl<S> Layer<S> for BasicAuthLayer {
    type Service = BasicAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BasicAuth {
            inner,
            credentials: self.credentials.clone(),
        }
    }
}

/// Service that adds basic authentication to requests.
#[derive(Debug, Clone)]
pub struct BasicAuth<S> {
    inner: S,
    credentials: Option<HeaderValue>,
}

impl<S> BasicAuth<S> {
    /// Create a new basic auth service wrapping the given service.
    pub fn new(inner: S, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        BasicAuthLayer::new(username, password).layer(inner)
    }
}

impl<S> Service<Request> for BasicAuth<S>
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
        let Some(credentials) = self.credentials.clone() else {
            return Box::pin(ready(Err::<Response, _>(unusable_credentials("basic auth"))));
        };

        request.headers_mut().insert(AUTHORIZATION, credentials);
        Box::pin(self.inner.call(request))
    }
}

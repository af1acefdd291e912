//! The transport capability.
//!
//! A [`Transport`] executes one request and yields one response or error.
//! Network clients, middleware chains, and test doubles all implement it.
//! Plain async closures can be used through [`transport_fn`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Executes a single HTTP request.
pub trait Transport: Send + Sync {
    /// Send the request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent or no response arrived:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts and cancellation
    /// - Malformed requests
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request)
    }
}

/// A [`Transport`] backed by a function. Created by [`transport_fn`].
#[derive(Clone, Copy)]
pub struct TransportFn<F> {
    f: F,
}

impl<F> fmt::Debug for TransportFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportFn").finish_non_exhaustive()
    }
}

/// Use a function returning a future as a [`Transport`].
///
/// # Example
///
/// ```
/// use courier_core::{Response, http::HeaderMap, transport_fn};
///
/// let transport = transport_fn(|_request| async {
///     Ok(Response::new(200, HeaderMap::new(), "hello"))
/// });
/// ```
pub fn transport_fn<F, Fut>(f: F) -> TransportFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    TransportFn { f }
}

impl<F, Fut> Transport for TransportFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (self.f)(request)
    }
}

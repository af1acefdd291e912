//! Glue between [`Transport`] and Tower.
//!
//! Middleware layers are Tower services, so the base transport is lifted into
//! a [`tower::Service`] with [`TransportService`] and the composed stack is
//! stored type-erased as a [`BoxedTransport`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Layer;
use tower::util::BoxCloneSyncService;
use tower_service::Service;

use crate::{Error, Request, Response, Result, Transport};

/// Type-erased transport stack.
///
/// Cloning is cheap and every clone can be used from any thread.
pub type BoxedTransport = BoxCloneSyncService<Request, Response, Error>;

/// Future type for Tower Service implementations.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

/// Adapts a [`Transport`] into a [`tower::Service`].
pub struct TransportService<T> {
    transport: Arc<T>,
}

impl<T> TransportService<T> {
    /// Wrap `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }
}

impl<T> Clone for TransportService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> fmt::Debug for TransportService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportService").finish_non_exhaustive()
    }
}

impl<T> Service<Request> for TransportService<T>
where
    T: Transport + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = Arc::clone(&self.transport);
        Box::pin(async move { transport.send(request).await })
    }
}

/// Lift a transport into a boxed stack with no middleware.
pub(crate) fn boxed<T>(transport: T) -> BoxedTransport
where
    T: Transport + 'static,
{
    BoxCloneSyncService::new(TransportService::new(transport))
}

// ============================================================================
// Middleware
// ============================================================================

/// A transport decorator.
///
/// Implemented for every Tower [`Layer`] whose service speaks
/// [`Request`]/[`Response`], so middleware of different types can be listed
/// together as `Box<dyn Middleware>`.
pub trait Middleware: Send + Sync {
    /// Wrap `inner`, returning the decorated transport.
    fn wrap(&self, inner: BoxedTransport) -> BoxedTransport;
}

impl<L> Middleware for L
where
    L: Layer<BoxedTransport> + Send + Sync,
    L::Service: Service<Request, Response = Response, Error = Error> + Clone + Send + Sync + 'static,
    <L::Service as Service<Request>>::Future: Send + 'static,
{
    fn wrap(&self, inner: BoxedTransport) -> BoxedTransport {
        BoxCloneSyncService::new(self.layer(inner))
    }
}

/// Apply `middlewares` to `base` in order: the last one ends up outermost.
pub(crate) fn compose<I>(base: BoxedTransport, middlewares: I) -> BoxedTransport
where
    I: IntoIterator<Item = Box<dyn Middleware>>,
{
    middlewares
        .into_iter()
        .fold(base, |inner, middleware| middleware.wrap(inner))
}

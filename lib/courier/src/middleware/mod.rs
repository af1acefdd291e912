//! Tower middleware layers for the courier client.
//!
//! Each middleware is a typed struct holding its configuration that
//! implements Tower's [`Layer`]. Given a base transport and middlewares
//! `[m1, m2, ..., mN]`, the client builds `mN(...m2(m1(base)))`: the last
//! middleware is the outermost and sees outgoing requests first.
//!
//! Authentication layers *set* the `Authorization` header, replacing any
//! existing value. When two of them are stacked, the one listed first runs
//! last, so its credentials are the ones that reach the base transport.
//!
//! # Available Layers
//!
//! - [`BasicAuthLayer`] - Sets `Authorization: Basic <base64(user:pass)>`
//! - [`ApiKeyLayer`] - Sets `Authorization: Bearer <key>`
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Any other Tower layer over [`Request`](crate::Request) and
//! [`Response`](crate::Response) works too, including closures built with
//! [`layer_fn`].
//!
//! # Example
//!
//! ```ignore
//! use courier::{Client, HyperTransport};
//! use courier::middleware::{ApiKeyLayer, BasicAuthLayer, Middleware};
//!
//! let middlewares: Vec<Box<dyn Middleware>> = vec![
//!     Box::new(BasicAuthLayer::new("user", "pass")),
//!     Box::new(ApiKeyLayer::new("my-key")),
//! ];
//! let client = Client::new(HyperTransport::new(), middlewares);
//! ```

mod api_key;
mod basic_auth;
mod logging;

pub use api_key::{ApiKey, ApiKeyLayer};
pub use basic_auth::{BasicAuth, BasicAuthLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

pub use crate::service::Middleware;

// Re-export tower types for convenience
pub use tower::Layer;
pub use tower::layer::layer_fn;

use http::HeaderValue;
use url::Url;

use crate::Error;

/// Build a sensitive `Authorization` header value.
///
/// Returns `None` when `value` is not a valid header value.
fn authorization(value: &str) -> Option<HeaderValue> {
    let mut header = HeaderValue::from_str(value).ok()?;
    header.set_sensitive(true);
    Some(header)
}

/// Render `url` for logs with any userinfo password masked.
pub(crate) fn loggable_url(url: &Url) -> String {
    if url.password().is_none() {
        return url.to_string();
    }
    let mut masked = url.clone();
    match masked.set_password(Some("redacted")) {
        Ok(()) => masked.to_string(),
        Err(()) => url.origin().ascii_serialization(),
    }
}

/// Error returned by an auth layer holding credentials that cannot be sent.
fn unusable_credentials(scheme: &str) -> Error {
    Error::invalid_request(format!(
        "{scheme} credentials are not a valid Authorization header value"
    ))
}

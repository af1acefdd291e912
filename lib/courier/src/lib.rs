//! HTTP client with composable authentication middleware.
//!
//! A [`Client`] wraps a base [`Transport`] in an ordered list of middlewares
//! and exposes a single [`Client::get`] operation that returns the raw
//! response body.
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! let client = Client::builder(HyperTransport::new())
//!     .with_basic_auth("user", "pass")
//!     .build();
//!
//! let ctx = Context::background().with_timeout(std::time::Duration::from_secs(10));
//! let body = client.get(&ctx, "https://api.example.com/status").await?;
//! ```

mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
mod service;
mod transport;

// Re-export client types
pub use client::{Client, ClientBuilder};
pub use config::{TransportConfig, TransportConfigBuilder};
pub use service::{BoxedTransport, ServiceFuture, TransportService};
pub use transport::HyperTransport;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use courier_core::{
    Body, BodyStream, CancelHandle, Context, Error, Method, Request, RequestBuilder, Response,
    Result, Stage, Transport, TransportFn, header, transport_fn,
};
pub use url;

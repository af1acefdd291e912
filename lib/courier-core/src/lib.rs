//! Core types and traits for the courier HTTP client.
//!
//! This crate provides the foundational types used by courier:
//! - [`Transport`] - The one-method capability that executes a request
//! - [`transport_fn`] - Adapter turning an async function into a [`Transport`]
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] and [`Body`] - HTTP response with a streaming body
//! - [`Context`] and [`CancelHandle`] - Cancellation and deadlines
//! - [`Error`], [`Stage`] and [`Result`] - Error handling
//! - [`Method`] and [`header`] - Re-exported from the `http` crate

mod body;
mod context;
mod error;
mod request;
mod response;
mod transport;

pub use body::{Body, BodyStream};
pub use context::{CancelHandle, Context};
pub use error::{Error, Result, Stage};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use transport::{Transport, TransportFn, transport_fn};

// Re-export http crate types for methods and headers
pub use http;
pub use http::{Method, header};

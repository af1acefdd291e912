//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::middleware::{ApiKeyLayer, BasicAuthLayer, LoggingLayer, Middleware};
pub use crate::{
    Client, ClientBuilder, Context, Error, HyperTransport, Request, Response, Result, Transport,
    TransportConfig, transport_fn,
};

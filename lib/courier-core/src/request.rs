//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers, query parameters, and bodies.
//! Invalid header names or values are reported by [`RequestBuilder::build`].
//!
//! # Example
//!
//! ```
//! use courier_core::{Method, Request};
//!
//! let request = Request::builder(Method::GET, "https://api.example.com".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{Context, Error, Method, Result};

/// An HTTP request with method, URL, headers, optional body, and context.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    context: Context,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub const fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// First value of a header, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Cancellation context the request is bound to.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Consume into (method, url, headers, body, context).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HeaderMap, Option<Bytes>, Context) {
        (
            self.method,
            self.url,
            self.headers,
            self.body,
            self.context,
        )
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    context: Context,
    error: Option<Error>,
}

impl RequestBuilder {
    /// Creates a new builder bound to a background context.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            context: Context::background(),
            error: None,
        }
    }

    /// Appends a header value.
    ///
    /// The first invalid name or value is kept and returned by [`Self::build`].
    #[must_use]
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: std::fmt::Display,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: std::fmt::Display,
    {
        if self.error.is_some() {
            return self;
        }

        let name = match HeaderName::try_from(name) {
            Ok(name) => name,
            Err(err) => {
                self.error = Some(Error::invalid_request(format!("invalid header name: {err}")));
                return self;
            }
        };
        match HeaderValue::try_from(value) {
            Ok(value) => {
                self.headers.append(name, value);
            }
            Err(err) => {
                self.error = Some(Error::invalid_request(format!(
                    "invalid value for header {name}: {err}"
                )));
            }
        }
        self
    }

    /// Extends the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Binds the request to a cancellation context.
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Builds the [`Request`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if a header name or value was invalid.
    pub fn build(self) -> Result<Request> {
        if let Some(err) = self.error {
            return Err(err);
        }

        Ok(Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            context: self.context,
        })
    }
}

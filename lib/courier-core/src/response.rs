//! HTTP response handling.
//!
//! A [`Response`] owns its [`Body`] stream. Consume it with
//! [`Response::into_body`] and [`Body::collect`]; dropping the response at any
//! point releases the stream.

use http::HeaderMap;

use crate::Body;

/// HTTP response with status, headers, and a streaming body.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Body>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Consume into the body stream.
    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HeaderMap, Body) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}

//! Error types for courier.
//!
//! A call to the client can fail at three stages: building the request,
//! sending it, and reading the response body. Each stage wraps the error
//! that caused it, so the message tells which stage failed and
//! [`std::error::Error::source`] tells why.

use derive_more::{Display, Error, From};

/// The stage of a client call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Stage {
    /// The request could not be built.
    #[display("construction")]
    Construction,
    /// The transport failed to produce a response.
    #[display("transport")]
    Transport,
    /// The response body could not be fully read.
    #[display("read")]
    Read,
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for courier operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The request could not be built (invalid method, URL, or header).
    #[display("failed to create request: {_0}")]
    #[from(skip)]
    Construction(Box<Error>),

    /// The transport chain returned an error instead of a response.
    #[display("request failed: {_0}")]
    #[from(skip)]
    Transport(Box<Error>),

    /// The response body stream failed before it was fully read.
    #[display("failed to read response body: {_0}")]
    #[from(skip)]
    Read(Box<Error>),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout configured on the transport.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The caller's context was cancelled.
    #[display("context cancelled")]
    #[from(skip)]
    Cancelled,

    /// The caller's context deadline passed.
    #[display("context deadline exceeded")]
    #[from(skip)]
    DeadlineExceeded,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap `cause` as a request construction failure.
    #[must_use]
    pub fn construction(cause: impl Into<Self>) -> Self {
        Self::Construction(Box::new(cause.into()))
    }

    /// Wrap `cause` as a transport failure.
    #[must_use]
    pub fn transport(cause: impl Into<Self>) -> Self {
        Self::Transport(Box::new(cause.into()))
    }

    /// Wrap `cause` as a body read failure.
    #[must_use]
    pub fn read(cause: impl Into<Self>) -> Self {
        Self::Read(Box::new(cause.into()))
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// The stage this error was reported at, if it has been wrapped.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Construction(_) => Some(Stage::Construction),
            Self::Transport(_) => Some(Stage::Transport),
            Self::Read(_) => Some(Stage::Read),
            _ => None,
        }
    }

    /// The innermost error, looking through stage wrappers.
    #[must_use]
    pub fn cause(&self) -> &Self {
        match self {
            Self::Construction(inner) | Self::Transport(inner) | Self::Read(inner) => {
                inner.cause()
            }
            other => other,
        }
    }

    /// Returns `true` if the transport timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.cause(), Self::Timeout)
    }

    /// Returns `true` if the caller's context was cancelled or its deadline passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.cause(), Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self.cause(), Self::Connection(_))
    }
}

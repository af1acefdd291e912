//! Response body stream.
//!
//! A [`Body`] is a stream of byte chunks. It is released when dropped, so
//! owning it by value is enough to guarantee it is closed exactly once, on
//! every exit path.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use futures_util::{StreamExt, stream};

use crate::Result;

/// Boxed stream of body chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A readable response body.
pub struct Body {
    stream: BodyStream,
}

impl Body {
    /// An empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_stream(stream::empty())
    }

    /// A body holding a single in-memory chunk.
    #[must_use]
    pub fn full(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::from_stream(stream::once(async move { Ok(bytes) }))
    }

    /// A body backed by an arbitrary chunk stream.
    #[must_use]
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Read the whole stream into memory.
    ///
    /// Either every chunk is returned, or the first error is. The stream is
    /// dropped before this returns in both cases.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the stream.
    pub async fn collect(mut self) -> Result<Bytes> {
        let mut collected = Vec::new();

        while let Some(chunk) = self.stream.next().await {
            collected.extend_from_slice(&chunk?);
        }

        Ok(Bytes::from(collected))
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

impl Stream for Body {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::full(bytes)
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::full(text)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::full(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::full(bytes)
    }
}

//! Cancellation and deadline context bound to a request.
//!
//! A [`Context`] carries any number of cancellation signals and an optional
//! deadline. Derived contexts inherit everything from their parent: cancelling
//! a parent cancels every context derived from it, and a child deadline can
//! only be earlier than the parent's.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use courier_core::Context;
//!
//! let (ctx, handle) = Context::background()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_cancel();
//!
//! assert!(ctx.err().is_none());
//! handle.cancel();
//! assert!(ctx.err().is_some());
//! ```

use std::future::{Future, pending};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::select_all;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::{Error, Result};

/// Cancellation signals and deadline for a request.
#[derive(Debug, Clone, Default)]
pub struct Context {
    signals: Vec<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Handle that cancels the context it was created with.
///
/// Dropping the handle without calling [`CancelHandle::cancel`] leaves the
/// context running.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Cancel the associated context and every context derived from it.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` once [`CancelHandle::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that can be cancelled through the returned handle.
    #[must_use]
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        let mut child = self.clone();
        child.signals.push(receiver);
        (
            child,
            CancelHandle {
                sender: Arc::new(sender),
            },
        )
    }

    /// Derive a context whose deadline is `deadline`, or the parent's if earlier.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let mut child = self.clone();
        child.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        child
    }

    /// Derive a context that expires `timeout` from now.
    ///
    /// A timeout too large to represent as an instant never expires, so the
    /// parent's deadline (if any) is kept.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// The effective deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` while it is still live.
    #[must_use]
    pub fn err(&self) -> Option<Error> {
        if self.signals.iter().any(|signal| *signal.borrow()) {
            return Some(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolve once the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a context without signals or deadline.
    pub async fn done(&self) -> Error {
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        let cancelled = async {
            if self.signals.is_empty() {
                return pending::<()>().await;
            }
            let waits = self.signals.iter().cloned().map(|mut signal| {
                Box::pin(async move {
                    // A dropped handle can no longer cancel.
                    if signal.wait_for(|cancelled| *cancelled).await.is_err() {
                        pending::<()>().await;
                    }
                })
            });
            select_all(waits).await;
        };

        tokio::select! {
            biased;
            () = cancelled => Error::Cancelled,
            () = expired => Error::DeadlineExceeded,
        }
    }

    /// Drive `future` to completion unless the context finishes first.
    ///
    /// A context that is already done fails immediately, without polling `future`.
    pub async fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        tokio::select! {
            biased;
            err = self.done() => Err(err),
            result = future => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn background_is_never_done() {
        let ctx = Context::background();
        check!(ctx.err().is_none());
        check!(ctx.deadline().is_none());
    }

    #[tokio::test]
    async fn unrepresentable_timeout_never_expires() {
        let ctx = Context::background().with_timeout(Duration::MAX);
        check!(ctx.err().is_none());
        check!(ctx.deadline().is_none());

        let parent = Context::background().with_timeout(Duration::from_secs(5));
        let child = parent.with_timeout(Duration::MAX);
        check!(child.deadline() == parent.deadline());
    }

    #[test]
    fn cancelling_parent_cancels_child() {
        let (parent, handle) = Context::background().with_cancel();
        let (child, _child_handle) = parent.with_cancel();

        handle.cancel();

        check!(handle.is_cancelled());
        let_assert!(Some(Error::Cancelled) = child.err());
    }

    #[test]
    fn cancelling_child_leaves_parent_live() {
        let (parent, _handle) = Context::background().with_cancel();
        let (child, child_handle) = parent.with_cancel();

        child_handle.cancel();

        check!(parent.err().is_none());
        check!(child.err().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn child_deadline_never_extends_parent() {
        let parent = Context::background().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::from_secs(60));

        check!(child.deadline() == parent.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn done_resolves_on_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(50));

        let err = ctx.done().await;

        let_assert!(Error::DeadlineExceeded = err);
        let_assert!(Some(Error::DeadlineExceeded) = ctx.err());
    }

    #[tokio::test]
    async fn done_resolves_on_cancel() {
        let (ctx, handle) = Context::background().with_cancel();

        let waiter = tokio::spawn(async move { ctx.done().await });
        handle.cancel();

        let err = waiter.await.expect("task");
        let_assert!(Error::Cancelled = err);
    }

    #[tokio::test]
    async fn run_fails_fast_when_already_cancelled() {
        let (ctx, handle) = Context::background().with_cancel();
        handle.cancel();

        let polled = std::cell::Cell::new(false);
        let result = ctx
            .run(async {
                polled.set(true);
                Ok(())
            })
            .await;

        let_assert!(Err(Error::Cancelled) = result);
        check!(!polled.get());
    }

    #[tokio::test]
    async fn run_returns_future_output() {
        let ctx = Context::background();
        let result = ctx.run(async { Ok(7) }).await;
        let_assert!(Ok(7) = result);
    }

    #[tokio::test(start_paused = true)]
    async fn run_aborts_pending_future_at_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(10));

        let result: Result<()> = ctx.run(pending()).await;

        let_assert!(Err(Error::DeadlineExceeded) = result);
    }

    #[tokio::test]
    async fn dropped_handle_does_not_cancel() {
        let (ctx, handle) = Context::background().with_cancel();
        drop(handle);

        let result = tokio::time::timeout(Duration::from_millis(20), ctx.done()).await;
        check!(result.is_err());
    }
}

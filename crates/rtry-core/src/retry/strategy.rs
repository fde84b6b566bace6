//! The capability every retry strategy exposes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::cancel::CancelSignal;
use super::error::RetryError;
use super::observer::{NoOpObserver, RetryObserver};
use super::outcome::Outcome;
use super::run::run;

/// A backoff calculator paired with a continuation predicate.
///
/// Strategies are immutable once built, so one instance can drive any number
/// of concurrent sessions. The trait is object safe: `Box<dyn Strategy>` and
/// `Arc<dyn Strategy>` are strategies too, which lets callers swap strategies
/// at runtime.
pub trait Strategy: Send + Sync {
    /// Wait before the next attempt, given the zero-based number of waits
    /// already issued in this session.
    fn wait(&self, waits: u64) -> Duration;

    /// Whether to try again after `attempted` retryable failures (1-based).
    fn should_continue(&self, attempted: u64) -> bool;

    /// When true the operation is never invoked and the session succeeds.
    fn skips(&self) -> bool {
        false
    }

    /// Run `op` until it succeeds, fails terminally, this strategy gives up,
    /// or `signal` fires.
    ///
    /// The returned future is `Send` so it can be spawned; use
    /// [`run`](super::run::run) directly for operations that are not.
    fn retry<'a, E, F, Fut>(
        &'a self,
        signal: &'a CancelSignal,
        op: F,
    ) -> impl Future<Output = Result<(), RetryError<E>>> + Send + 'a
    where
        Self: Sized,
        E: Send + 'a,
        F: FnMut() -> Fut + Send + 'a,
        Fut: Future<Output = Outcome<E>> + Send + 'a,
    {
        run(self, signal, op, &NoOpObserver)
    }

    /// Like [`retry`](Self::retry), reporting every transition to `observer`.
    fn retry_observed<'a, E, F, Fut, O>(
        &'a self,
        signal: &'a CancelSignal,
        op: F,
        observer: &'a O,
    ) -> impl Future<Output = Result<(), RetryError<E>>> + Send + 'a
    where
        Self: Sized,
        E: Send + 'a,
        F: FnMut() -> Fut + Send + 'a,
        Fut: Future<Output = Outcome<E>> + Send + 'a,
        O: RetryObserver<E> + Sync + ?Sized,
    {
        run(self, signal, op, observer)
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn wait(&self, waits: u64) -> Duration {
        (**self).wait(waits)
    }

    fn should_continue(&self, attempted: u64) -> bool {
        (**self).should_continue(attempted)
    }

    fn skips(&self) -> bool {
        (**self).skips()
    }
}

impl<S: Strategy + ?Sized> Strategy for Arc<S> {
    fn wait(&self, waits: u64) -> Duration {
        (**self).wait(waits)
    }

    fn should_continue(&self, attempted: u64) -> bool {
        (**self).should_continue(attempted)
    }

    fn skips(&self) -> bool {
        (**self).skips()
    }
}

impl<S: Strategy + ?Sized> Strategy for &S {
    fn wait(&self, waits: u64) -> Duration {
        (**self).wait(waits)
    }

    fn should_continue(&self, attempted: u64) -> bool {
        (**self).should_continue(attempted)
    }

    fn skips(&self) -> bool {
        (**self).skips()
    }
}

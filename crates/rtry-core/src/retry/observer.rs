//! Observation hooks for retry sessions.
//!
//! The retry loop never logs on its own. Callers that want logs or counters
//! pass an observer; observers see every state transition but cannot change
//! the loop's decisions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::Cancelled;

/// Receives callbacks as a retry session moves through its states.
///
/// `E` is the operation's cause type. Every method has an empty default so
/// implementations only override what they need.
pub trait RetryObserver<E: ?Sized> {
    /// An invocation is about to start. `invocation` is 1-based.
    fn on_attempt_start(&self, invocation: u64) {
        let _ = invocation;
    }

    /// A retryable failure was reported and the loop will wait `wait` before
    /// trying again. `attempted` counts retryable failures so far (saturating).
    fn on_retry(&self, attempted: u64, cause: &E, wait: Duration) {
        let _ = (attempted, cause, wait);
    }

    /// The operation succeeded on invocation number `invocations`.
    fn on_success(&self, invocations: u64, elapsed: Duration) {
        let _ = (invocations, elapsed);
    }

    /// The strategy declined another attempt after a retryable failure.
    fn on_exhausted(&self, attempted: u64, cause: &E) {
        let _ = (attempted, cause);
    }

    /// The operation reported a terminal failure.
    fn on_terminal(&self, invocation: u64, cause: &E) {
        let _ = (invocation, cause);
    }

    /// The cancellation signal fired before invocation `invocations + 1`.
    fn on_cancelled(&self, cause: Cancelled, invocations: u64) {
        let _ = (cause, invocations);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl<E: ?Sized> RetryObserver<E> for NoOpObserver {}

/// Logs retry events through `tracing`.
///
/// Levels: attempt start DEBUG, retry WARN, success INFO after a retry (DEBUG
/// on the first invocation), exhaustion ERROR, terminal failure and
/// cancellation WARN.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    operation: String,
}

impl TracingObserver {
    /// `operation` names the retried action in every event.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl<E: fmt::Display + ?Sized> RetryObserver<E> for TracingObserver {
    fn on_attempt_start(&self, invocation: u64) {
        tracing::debug!(operation = %self.operation, invocation, "starting attempt");
    }

    fn on_retry(&self, attempted: u64, cause: &E, wait: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempted,
            error = %cause,
            wait_ms = millis(wait),
            "attempt failed, will retry"
        );
    }

    fn on_success(&self, invocations: u64, elapsed: Duration) {
        if invocations > 1 {
            tracing::info!(
                operation = %self.operation,
                invocations,
                elapsed_ms = millis(elapsed),
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                elapsed_ms = millis(elapsed),
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempted: u64, cause: &E) {
        tracing::error!(
            operation = %self.operation,
            attempted,
            error = %cause,
            "retry attempts exhausted"
        );
    }

    fn on_terminal(&self, invocation: u64, cause: &E) {
        tracing::warn!(
            operation = %self.operation,
            invocation,
            error = %cause,
            "non-retryable failure"
        );
    }

    fn on_cancelled(&self, cause: Cancelled, invocations: u64) {
        tracing::warn!(
            operation = %self.operation,
            invocations,
            cause = %cause,
            "retry cancelled"
        );
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Counts events. Useful in tests and for simple metrics.
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU64,
    retries: AtomicU64,
    successes: AtomicU64,
    exhaustions: AtomicU64,
    terminals: AtomicU64,
    cancellations: AtomicU64,
    total_wait_ns: AtomicU64,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u64 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u64 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    pub fn terminals(&self) -> u64 {
        self.terminals.load(Ordering::SeqCst)
    }

    pub fn cancellations(&self) -> u64 {
        self.cancellations.load(Ordering::SeqCst)
    }

    /// Sum of the waits requested so far (not time actually slept).
    pub fn total_wait(&self) -> Duration {
        Duration::from_nanos(self.total_wait_ns.load(Ordering::SeqCst))
    }
}

impl<E: ?Sized> RetryObserver<E> for StatsObserver {
    fn on_attempt_start(&self, _invocation: u64) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_retry(&self, _attempted: u64, _cause: &E, wait: Duration) {
        self.retries.fetch_add(1, Ordering::SeqCst);
        let ns = u64::try_from(wait.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .total_wait_ns
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(ns))
            });
    }

    fn on_success(&self, _invocations: u64, _elapsed: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempted: u64, _cause: &E) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }

    fn on_terminal(&self, _invocation: u64, _cause: &E) {
        self.terminals.fetch_add(1, Ordering::SeqCst);
    }

    fn on_cancelled(&self, _cause: Cancelled, _invocations: u64) {
        self.cancellations.fetch_add(1, Ordering::SeqCst);
    }
}

impl<E: ?Sized, T: RetryObserver<E> + ?Sized> RetryObserver<E> for Arc<T> {
    fn on_attempt_start(&self, invocation: u64) {
        (**self).on_attempt_start(invocation)
    }

    fn on_retry(&self, attempted: u64, cause: &E, wait: Duration) {
        (**self).on_retry(attempted, cause, wait)
    }

    fn on_success(&self, invocations: u64, elapsed: Duration) {
        (**self).on_success(invocations, elapsed)
    }

    fn on_exhausted(&self, attempted: u64, cause: &E) {
        (**self).on_exhausted(attempted, cause)
    }

    fn on_terminal(&self, invocation: u64, cause: &E) {
        (**self).on_terminal(invocation, cause)
    }

    fn on_cancelled(&self, cause: Cancelled, invocations: u64) {
        (**self).on_cancelled(cause, invocations)
    }
}

impl<E: ?Sized, T: RetryObserver<E> + ?Sized> RetryObserver<E> for &T {
    fn on_attempt_start(&self, invocation: u64) {
        (**self).on_attempt_start(invocation)
    }

    fn on_retry(&self, attempted: u64, cause: &E, wait: Duration) {
        (**self).on_retry(attempted, cause, wait)
    }

    fn on_success(&self, invocations: u64, elapsed: Duration) {
        (**self).on_success(invocations, elapsed)
    }

    fn on_exhausted(&self, attempted: u64, cause: &E) {
        (**self).on_exhausted(attempted, cause)
    }

    fn on_terminal(&self, invocation: u64, cause: &E) {
        (**self).on_terminal(invocation, cause)
    }

    fn on_cancelled(&self, cause: Cancelled, invocations: u64) {
        (**self).on_cancelled(cause, invocations)
    }
}

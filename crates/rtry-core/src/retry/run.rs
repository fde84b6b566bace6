//! Retry loop: invoke an operation until it succeeds, fails terminally, the
//! continuation predicate says stop, or the cancellation signal fires.
//!
//! Each iteration checks the signal, invokes the operation once, and
//! classifies the outcome. A retryable failure bumps the attempt counter
//! (saturating at `u64::MAX`, after which the loop keeps going with the
//! saturated value), asks the predicate whether to continue, and then waits
//! for the backoff duration. Cancellation is only observed between
//! invocations; an invocation in flight always runs to completion.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::cancel::CancelSignal;
use super::error::RetryError;
use super::observer::{NoOpObserver, RetryObserver};
use super::outcome::Outcome;
use super::sleep::sleep;
use super::strategy::Strategy;

/// Built-in continuation predicates, parameterized by the number of retryable
/// failures seen so far (1 on the first call).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    /// Keep retrying until success, terminal failure, or cancellation.
    #[default]
    Forever,
    /// Continue while `attempted < max`. `UpTo(0)` and `UpTo(1)` both stop on
    /// the first retryable failure.
    UpTo(u64),
}

impl Continuation {
    pub fn should_continue(&self, attempted: u64) -> bool {
        match *self {
            Continuation::Forever => true,
            Continuation::UpTo(max) => attempted < max,
        }
    }

    /// Builds `UpTo(max)` when a limit is given, `Forever` otherwise.
    pub fn from_max_attempts(max_attempts: Option<u64>) -> Self {
        max_attempts.map_or(Continuation::Forever, Continuation::UpTo)
    }
}

/// Bump the retryable-failure counter, sticking at `u64::MAX`.
fn next_attempt(attempted: u64) -> u64 {
    attempted.saturating_add(1)
}

/// Core loop with a custom wait calculator and continuation predicate.
///
/// `wait` receives the zero-based number of waits issued so far;
/// `should_continue` receives the 1-based count of retryable failures.
pub async fn run_until<E, F, Fut, W, C, O>(
    signal: &CancelSignal,
    mut op: F,
    mut wait: W,
    mut should_continue: C,
    observer: &O,
) -> Result<(), RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<E>>,
    W: FnMut(u64) -> Duration,
    C: FnMut(u64) -> bool,
    O: RetryObserver<E> + ?Sized,
{
    let start = Instant::now();
    let mut attempted: u64 = 0;
    let mut invocations: u64 = 0;

    loop {
        if let Some(cause) = signal.cause() {
            observer.on_cancelled(cause, invocations);
            return Err(RetryError::Cancelled(cause));
        }

        invocations = invocations.saturating_add(1);
        observer.on_attempt_start(invocations);

        match op().await {
            Outcome::Success => {
                observer.on_success(invocations, start.elapsed());
                return Ok(());
            }
            Outcome::Stop(cause) => {
                observer.on_terminal(invocations, &cause);
                return Err(RetryError::Operation(cause));
            }
            Outcome::Retry(cause) => {
                attempted = next_attempt(attempted);
                if !should_continue(attempted) {
                    observer.on_exhausted(attempted, &cause);
                    return Err(RetryError::Operation(cause));
                }
                let delay = wait(attempted - 1);
                observer.on_retry(attempted, &cause, delay);
                // Cut short on cancellation; the next iteration reports it.
                sleep(signal, delay).await;
            }
        }
    }
}

/// Retry until success, terminal failure, or cancellation.
pub async fn run_forever<E, F, Fut, W>(
    signal: &CancelSignal,
    op: F,
    wait: W,
) -> Result<(), RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<E>>,
    W: FnMut(u64) -> Duration,
{
    run_until(signal, op, wait, |_| true, &NoOpObserver).await
}

/// Retry at most `max_attempts` times before surfacing the last cause.
pub async fn run_up_to<E, F, Fut, W>(
    signal: &CancelSignal,
    op: F,
    wait: W,
    max_attempts: u64,
) -> Result<(), RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<E>>,
    W: FnMut(u64) -> Duration,
{
    let limit = Continuation::UpTo(max_attempts);
    run_until(signal, op, wait, |n| limit.should_continue(n), &NoOpObserver).await
}

/// Drive `op` with the waits and limits of `strategy`.
///
/// A strategy that [skips](Strategy::skips) returns success without invoking
/// the operation or consulting the signal.
pub async fn run<S, E, F, Fut, O>(
    strategy: &S,
    signal: &CancelSignal,
    op: F,
    observer: &O,
) -> Result<(), RetryError<E>>
where
    S: Strategy + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<E>>,
    O: RetryObserver<E> + ?Sized,
{
    if strategy.skips() {
        return Ok(());
    }
    run_until(
        signal,
        op,
        |waits| strategy.wait(waits),
        |attempted| strategy.should_continue(attempted),
        observer,
    )
    .await
}
